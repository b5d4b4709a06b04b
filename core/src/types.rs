//! # TOOLKIT TYPE DEFINITIONS
//!
//! **CRITICAL**: Shared configuration and descriptors for the upload and JSON pipelines
//! **MANDATE**: Configure `Tools` once, then treat it as read-only while requests are in flight

use serde::{Deserialize, Serialize};

/// **DEFAULT UPLOAD LIMIT** - 1 GiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

/// **DEFAULT IN-MEMORY UPLOAD BUFFER** - 8 MiB
pub const DEFAULT_UPLOAD_MEMORY_BYTES: u64 = 8 * 1024 * 1024;

/// **DEFAULT JSON BODY LIMIT** - 1 MiB
pub const DEFAULT_MAX_JSON_BYTES: u64 = 1024 * 1024;

/// **TOOLKIT CONFIGURATION**
///
/// **PURPOSE**: Holds the tunables shared by every helper
/// **GUARANTEE**: `Default` yields 1 GiB uploads (8 MiB in RAM), any file type, 1 MiB JSON, strict fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    /// **MAXIMUM UPLOAD BODY SIZE** - in bytes
    ///
    /// **MEMORY**: The body is admitted in full before any file is written. At most
    /// `upload_memory_bytes` of it stays in RAM; the rest spills to a temporary
    /// file, so each request can also use up to this much temp-dir disk space
    pub max_upload_bytes: u64,

    /// **IN-MEMORY UPLOAD BUFFER** - bytes of an upload body held in RAM before spilling to disk
    pub upload_memory_bytes: u64,

    /// **ALLOWED SNIFFED MIME TYPES** - empty accepts every type. An entry without
    /// parameters (`text/plain`) also admits the sniffed `text/plain; charset=utf-8`
    pub allowed_mime_types: Vec<String>,

    /// **MAXIMUM JSON BODY SIZE** - in bytes
    pub max_json_bytes: u64,

    /// **LENIENT FIELD POLICY** - accept keys the destination type does not declare
    pub allow_unknown_json_fields: bool,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_memory_bytes: DEFAULT_UPLOAD_MEMORY_BYTES,
            allowed_mime_types: Vec::new(),
            max_json_bytes: DEFAULT_MAX_JSON_BYTES,
            allow_unknown_json_fields: false,
        }
    }
}

impl Tools {
    /// **CONSTRUCTOR** - Same as `Tools::default()`
    pub fn new() -> Self {
        Self::default()
    }

    /// **WITH UPLOAD LIMIT**
    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// **WITH UPLOAD MEMORY BUFFER**
    pub fn with_upload_memory_bytes(mut self, limit: u64) -> Self {
        self.upload_memory_bytes = limit;
        self
    }

    /// **WITH ALLOWED TYPE** - Appends one MIME type to the allow-list
    pub fn allow_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.allowed_mime_types.push(mime_type.into());
        self
    }

    /// **WITH JSON LIMIT**
    pub fn with_max_json_bytes(mut self, limit: u64) -> Self {
        self.max_json_bytes = limit;
        self
    }

    /// **WITH FIELD POLICY**
    pub fn with_unknown_json_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_json_fields = allow;
        self
    }
}

/// **UPLOAD OPTIONS**
///
/// **PURPOSE**: Per-call knobs for `upload_files` / `upload_one_file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// **RENAME** - Store under `<25 random chars><original extension>`
    pub rename: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self { rename: true }
    }
}

impl UploadOptions {
    /// **KEEP ORIGINAL NAMES**
    pub fn keep_names() -> Self {
        Self { rename: false }
    }
}

/// **UPLOADED FILE DESCRIPTOR**
///
/// **PURPOSE**: Describes one file part that was fully written to disk
/// **GUARANTEE**: Only built after the copy succeeded and the file was synced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// **STORED NAME** - Name under the destination directory
    pub new_file_name: String,

    /// **SUBMITTED NAME** - Filename sent by the client
    pub original_file_name: String,

    /// **SIZE** - Bytes copied to disk
    pub file_size_bytes: u64,
}
