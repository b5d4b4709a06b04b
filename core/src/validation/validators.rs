//! # CONCRETE VALIDATOR IMPLEMENTATIONS
//!
//! **CRITICAL**: Three upload policy checks implementing the core `Validator` trait.

use super::Validator;
use crate::errors::ToolkitError;

// ================================================================================================
// BODY SIZE VALIDATOR - Upload admission
// ================================================================================================

/// **BODY SIZE VALIDATOR**
///
/// **PURPOSE**: Rejects bodies larger than the configured limit.
/// **PERFORMANCE**: O(1) constant-time validation.
#[derive(Debug, Clone)]
pub struct BodySizeValidator {
    /// **MAXIMUM ALLOWED SIZE** - Body size limit in bytes
    max_size: u64,
}

impl BodySizeValidator {
    /// **CONSTRUCTOR**
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    /// **LIMIT ACCESSOR**
    pub fn max_size(&self) -> u64 {
        self.max_size
    }
}

impl Validator for BodySizeValidator {
    type Input = u64;
    type Output = ();

    fn validate(&self, input: &u64) -> Result<(), ToolkitError> {
        if *input > self.max_size {
            log::warn!("body of {} bytes exceeds limit {}", input, self.max_size);
            return Err(ToolkitError::SizeExceeded {
                limit: self.max_size,
            });
        }
        Ok(())
    }
}

// ================================================================================================
// MIME TYPE VALIDATOR - Sniffed type allow-list
// ================================================================================================

/// **MIME TYPE VALIDATOR**
///
/// **PURPOSE**: Checks a sniffed MIME type against an allow-list.
/// **GUARANTEE**: An empty allow-list accepts every type; matching ignores ASCII case.
/// **PARAMETERS**: Entries like `text/plain` ignore parameters on the sniffed type.
#[derive(Debug, Clone, Default)]
pub struct MimeTypeValidator {
    /// **ALLOWED TYPES**
    allowed: Vec<String>,
}

impl MimeTypeValidator {
    /// **CONSTRUCTOR**
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// **ALLOW-ALL CHECK**
    pub fn allows_everything(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl Validator for MimeTypeValidator {
    type Input = str;
    type Output = ();

    fn validate(&self, input: &str) -> Result<(), ToolkitError> {
        if self.allows_everything() || self.allowed.iter().any(|t| mime_matches(t, input)) {
            return Ok(());
        }
        log::warn!("rejected upload with sniffed type {}", input);
        Err(ToolkitError::DisallowedFileType {
            mime_type: input.to_string(),
        })
    }
}

/// An allowed entry without parameters matches on the essence (`type/subtype`)
/// alone, so `text/plain` admits `text/plain; charset=utf-8`.
fn mime_matches(allowed: &str, sniffed: &str) -> bool {
    let allowed = allowed.trim();
    if allowed.eq_ignore_ascii_case(sniffed.trim()) {
        return true;
    }
    !allowed.contains(';') && allowed.eq_ignore_ascii_case(essence(sniffed))
}

fn essence(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or_default().trim()
}

// ================================================================================================
// FILE COUNT VALIDATOR - Single-file uploads
// ================================================================================================

/// **FILE COUNT VALIDATOR**
///
/// **PURPOSE**: Requires an exact number of file parts.
#[derive(Debug, Clone)]
pub struct FileCountValidator {
    /// **EXPECTED COUNT**
    expected: usize,
}

impl FileCountValidator {
    /// **CONSTRUCTOR**
    pub fn exactly(expected: usize) -> Self {
        Self { expected }
    }
}

impl Validator for FileCountValidator {
    type Input = usize;
    type Output = ();

    fn validate(&self, input: &usize) -> Result<(), ToolkitError> {
        if *input == self.expected {
            Ok(())
        } else {
            Err(ToolkitError::UnexpectedFileCount { found: *input })
        }
    }
}

// ================================================================================================
// UNIT TESTS
// ================================================================================================
