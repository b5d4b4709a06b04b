use hyper::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::UploadedFile;

#[derive(Debug, Error)]
pub enum ToolkitError {
    #[error("body exceeds the maximum allowed size of {limit} bytes")]
    SizeExceeded { limit: u64 },

    #[error("uploaded file type '{mime_type}' is not permitted")]
    DisallowedFileType { mime_type: String },

    #[error("could not create directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    PersistenceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid multipart body: {reason}")]
    InvalidMultipart { reason: String },

    #[error("expected exactly one uploaded file, found {found}")]
    UnexpectedFileCount { found: usize },

    #[error("body contains badly-formed JSON (at line {line} column {column})")]
    MalformedJson { line: usize, column: usize },

    #[error(
        "body contains an incorrect JSON type{} (at line {} column {}): {}",
        for_field(.field), .line, .column, .detail
    )]
    JsonTypeMismatch {
        detail: String,
        /// Dotted path of the offending value, e.g. `inner.foo`
        field: Option<String>,
        line: usize,
        column: usize,
    },

    #[error("body must not be empty")]
    EmptyBody,

    #[error("body contains unknown key '{field}'")]
    UnknownJsonField { field: String },

    #[error("body must contain only one JSON value")]
    MultipleJsonValues,

    #[error("could not decode JSON body: {0}")]
    JsonDecode(String),

    #[error("could not serialize JSON: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("empty string not permitted")]
    EmptyInput,

    #[error("after removing characters, slug is zero length")]
    EmptySlugResult,

    #[error("invalid file path '{path}'")]
    InvalidPath { path: String },

    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    #[error("remote request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn for_field(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|f| format!(" for field '{}'", f))
        .unwrap_or_default()
}

/// Stable machine-readable codes, one per [`ToolkitError`] variant.
pub mod codes {
    pub const SIZE_EXCEEDED: &str = "TOOLKIT_SIZE_EXCEEDED";
    pub const DISALLOWED_FILE_TYPE: &str = "TOOLKIT_UPLOAD_DISALLOWED_FILE_TYPE";
    pub const DIRECTORY_CREATE_FAILED: &str = "TOOLKIT_FS_DIRECTORY_CREATE_FAILED";
    pub const PERSISTENCE_FAILED: &str = "TOOLKIT_FS_PERSISTENCE_FAILED";
    pub const INVALID_MULTIPART: &str = "TOOLKIT_UPLOAD_INVALID_MULTIPART";
    pub const UNEXPECTED_FILE_COUNT: &str = "TOOLKIT_UPLOAD_UNEXPECTED_FILE_COUNT";
    pub const MALFORMED_JSON: &str = "TOOLKIT_JSON_MALFORMED";
    pub const JSON_TYPE_MISMATCH: &str = "TOOLKIT_JSON_TYPE_MISMATCH";
    pub const EMPTY_BODY: &str = "TOOLKIT_JSON_EMPTY_BODY";
    pub const UNKNOWN_JSON_FIELD: &str = "TOOLKIT_JSON_UNKNOWN_FIELD";
    pub const MULTIPLE_JSON_VALUES: &str = "TOOLKIT_JSON_MULTIPLE_VALUES";
    pub const JSON_DECODE: &str = "TOOLKIT_JSON_DECODE";
    pub const SERIALIZATION: &str = "TOOLKIT_JSON_SERIALIZATION";
    pub const EMPTY_INPUT: &str = "TOOLKIT_SLUG_EMPTY_INPUT";
    pub const EMPTY_SLUG_RESULT: &str = "TOOLKIT_SLUG_EMPTY_RESULT";
    pub const INVALID_PATH: &str = "TOOLKIT_FS_INVALID_PATH";
    pub const FILE_NOT_FOUND: &str = "TOOLKIT_FS_FILE_NOT_FOUND";
    pub const INVALID_HEADER: &str = "TOOLKIT_HTTP_INVALID_HEADER";
    pub const REMOTE: &str = "TOOLKIT_HTTP_REMOTE";
    pub const IO: &str = "TOOLKIT_IO";
}

impl ToolkitError {
    pub fn code(&self) -> &'static str {
        match self {
            ToolkitError::SizeExceeded { .. } => codes::SIZE_EXCEEDED,
            ToolkitError::DisallowedFileType { .. } => codes::DISALLOWED_FILE_TYPE,
            ToolkitError::DirectoryCreateFailed { .. } => codes::DIRECTORY_CREATE_FAILED,
            ToolkitError::PersistenceFailed { .. } => codes::PERSISTENCE_FAILED,
            ToolkitError::InvalidMultipart { .. } => codes::INVALID_MULTIPART,
            ToolkitError::UnexpectedFileCount { .. } => codes::UNEXPECTED_FILE_COUNT,
            ToolkitError::MalformedJson { .. } => codes::MALFORMED_JSON,
            ToolkitError::JsonTypeMismatch { .. } => codes::JSON_TYPE_MISMATCH,
            ToolkitError::EmptyBody => codes::EMPTY_BODY,
            ToolkitError::UnknownJsonField { .. } => codes::UNKNOWN_JSON_FIELD,
            ToolkitError::MultipleJsonValues => codes::MULTIPLE_JSON_VALUES,
            ToolkitError::JsonDecode(_) => codes::JSON_DECODE,
            ToolkitError::Serialization(_) => codes::SERIALIZATION,
            ToolkitError::EmptyInput => codes::EMPTY_INPUT,
            ToolkitError::EmptySlugResult => codes::EMPTY_SLUG_RESULT,
            ToolkitError::InvalidPath { .. } => codes::INVALID_PATH,
            ToolkitError::FileNotFound { .. } => codes::FILE_NOT_FOUND,
            ToolkitError::InvalidHeader { .. } => codes::INVALID_HEADER,
            ToolkitError::Remote(_) => codes::REMOTE,
            ToolkitError::Io(_) => codes::IO,
        }
    }

    /// Status a handler would typically answer with for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ToolkitError::SizeExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ToolkitError::DisallowedFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ToolkitError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            ToolkitError::DirectoryCreateFailed { .. }
            | ToolkitError::PersistenceFailed { .. }
            | ToolkitError::Serialization(_)
            | ToolkitError::InvalidHeader { .. }
            | ToolkitError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ToolkitError::Remote(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Upload failure carrying the files that were stored before the failing part.
///
/// Callers wanting all-or-nothing semantics discard (and delete) `uploaded`.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct UploadError {
    pub uploaded: Vec<UploadedFile>,
    #[source]
    pub source: ToolkitError,
}

impl UploadError {
    pub fn new(uploaded: Vec<UploadedFile>, source: ToolkitError) -> Self {
        Self { uploaded, source }
    }
}

impl From<ToolkitError> for UploadError {
    fn from(source: ToolkitError) -> Self {
        Self::new(Vec::new(), source)
    }
}

pub type ToolkitResult<T> = Result<T, ToolkitError>;
