//! # UPLOAD PIPELINE
//!
//! `MultipartReader → sniff → assign_name → persist`, run over every file part of a
//! `multipart/form-data` request. Fails fast: the first rejected part ends the call.
//!
//! The body is admitted first, up to `max_upload_bytes`, into a spool that keeps
//! `upload_memory_bytes` in RAM and spills the rest to a temporary file. Parts are
//! then streamed from the spool straight to their destination files.

pub mod multipart;
pub mod sniff;
pub mod storage;


pub use multipart::{MultipartReader, PartBody, PartHeaders};
pub use sniff::{sniff_content_type, SNIFF_LEN};
pub use storage::{assign_name, persist, RENAMED_STEM_LEN};

use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::Request;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tempfile::SpooledTempFile;

use crate::directory::create_dir_if_not_exist;
use crate::errors::{ToolkitError, UploadError};
use crate::types::{Tools, UploadOptions, UploadedFile};
use crate::validation::{BodySizeValidator, FileCountValidator, MimeTypeValidator, Validator};

impl Tools {
    /// Stores every file part of a multipart request under `upload_dir`.
    ///
    /// On failure the returned [`UploadError`] still lists the files written
    /// before the failing part.
    pub fn upload_files<B: Read>(
        &self,
        request: Request<B>,
        upload_dir: impl AsRef<Path>,
        options: UploadOptions,
    ) -> Result<Vec<UploadedFile>, UploadError> {
        let upload_dir = upload_dir.as_ref();
        let (content_type, body) = self.admit_body(request)?;
        create_dir_if_not_exist(upload_dir)?;

        let mut parts = MultipartReader::from_content_type(&content_type, body)?;
        self.store_parts(&mut parts, upload_dir, options)
    }

    /// Stores the single file part of a multipart request.
    ///
    /// Zero or several file parts, or a malformed body, are rejected before
    /// anything is written.
    pub fn upload_one_file<B: Read>(
        &self,
        request: Request<B>,
        upload_dir: impl AsRef<Path>,
        options: UploadOptions,
    ) -> Result<UploadedFile, ToolkitError> {
        let upload_dir = upload_dir.as_ref();
        let (content_type, body) = self.admit_body(request)?;
        create_dir_if_not_exist(upload_dir)?;

        let mut counting = MultipartReader::from_content_type(&content_type, body)?;
        let mut found = 0;
        while let Some(part) = counting.next_part()? {
            if part.is_file() {
                found += 1;
            }
        }
        FileCountValidator::exactly(1).validate(&found)?;

        let mut body = counting.into_inner();
        body.seek(SeekFrom::Start(0))?;
        let mut parts = MultipartReader::from_content_type(&content_type, body)?;

        let mut stored = self
            .store_parts(&mut parts, upload_dir, options)
            .map_err(|e| e.source)?;
        stored
            .pop()
            .ok_or(ToolkitError::UnexpectedFileCount { found: 0 })
    }

    /// Copies the body, bounded by `max_upload_bytes`, into a rewound spool and
    /// returns it with the request content type.
    fn admit_body<B: Read>(
        &self,
        request: Request<B>,
    ) -> Result<(String, SpooledTempFile), ToolkitError> {
        let limit = BodySizeValidator::new(self.max_upload_bytes);
        let (head, body) = request.into_parts();

        let declared = head
            .headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(declared) = declared {
            limit.validate(&declared)?;
        }

        let content_type = head
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let in_memory = usize::try_from(self.upload_memory_bytes).unwrap_or(usize::MAX);
        let mut spool = SpooledTempFile::new(in_memory);
        let copied = io::copy(
            &mut body.take(limit.max_size().saturating_add(1)),
            &mut spool,
        )?;
        limit.validate(&copied)?;

        if spool.is_rolled() {
            log::debug!("upload body of {} bytes spilled to disk", copied);
        }
        spool.seek(SeekFrom::Start(0))?;
        Ok((content_type, spool))
    }

    fn store_parts<R: Read>(
        &self,
        parts: &mut MultipartReader<R>,
        upload_dir: &Path,
        options: UploadOptions,
    ) -> Result<Vec<UploadedFile>, UploadError> {
        let types = MimeTypeValidator::new(self.allowed_mime_types.clone());
        let mut uploaded = Vec::new();

        loop {
            let part = match parts.next_part() {
                Ok(Some(part)) => part,
                Ok(None) => return Ok(uploaded),
                Err(source) => return Err(UploadError::new(uploaded, source)),
            };
            if !part.is_file() {
                continue;
            }
            match store_part(&part, parts, upload_dir, options, &types) {
                Ok(file) => uploaded.push(file),
                Err(source) => return Err(UploadError::new(uploaded, source)),
            }
        }
    }
}

fn store_part<R: Read>(
    part: &PartHeaders,
    parts: &mut MultipartReader<R>,
    upload_dir: &Path,
    options: UploadOptions,
    types: &MimeTypeValidator,
) -> Result<UploadedFile, ToolkitError> {
    let original_file_name = part.filename.clone().unwrap_or_default();

    let mime_type = sniff_content_type(parts.peek_body(SNIFF_LEN)?);
    types.validate(&mime_type)?;

    let new_file_name = assign_name(&original_file_name, options.rename);
    let written = persist(&mut parts.part_body(), upload_dir, &new_file_name);
    // A malformed body surfaces as an io error inside the copy
    let file_size_bytes = written.map_err(|e| parts.take_failure().unwrap_or(e))?;
    log::debug!(
        "stored upload {} as {} ({} bytes, {})",
        original_file_name,
        new_file_name,
        file_size_bytes,
        mime_type
    );

    Ok(UploadedFile {
        new_file_name,
        original_file_name,
        file_size_bytes,
    })
}
