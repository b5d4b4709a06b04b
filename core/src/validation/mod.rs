//! # TOOLKIT VALIDATION MODULE
//!
//! **POLICY CHECKS WITH TRAIT-BASED ARCHITECTURE**
//!
//! This module provides the `Validator` trait and the concrete policy checks the
//! upload pipeline runs before anything touches the filesystem.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **SIZE VALIDATION** - Declared and observed body length against `max_upload_bytes`
//! 2. **TYPE VALIDATION** - Sniffed MIME type against `allowed_mime_types`
//! 3. **COUNT VALIDATION** - Exactly one file part for the single-file upload
//!
//! ## USAGE
//!
//! ```rust
//! use toolkit::validation::{MimeTypeValidator, Validator};
//!
//! let validator = MimeTypeValidator::new(vec!["image/png".to_string()]);
//! assert!(validator.validate("image/png").is_ok());
//! assert!(validator.validate("image/gif").is_err());
//! ```

use crate::errors::ToolkitError;

pub mod validators;

pub use validators::{BodySizeValidator, FileCountValidator, MimeTypeValidator};

/// **CORE VALIDATOR TRAIT**
///
/// **MANDATE**: Every upload policy check implements this trait.
/// **GUARANTEE**: Failures are returned as `ToolkitError`, never panics.
pub trait Validator {
    /// **INPUT TYPE** - Data type accepted by this validator
    type Input: ?Sized;

    /// **OUTPUT TYPE** - Validated data type returned on success
    type Output;

    /// **VALIDATION EXECUTION**
    ///
    /// **RETURNS**:
    /// - `Ok(Self::Output)` - Input satisfied the policy
    /// - `Err(ToolkitError)` - Policy violation with the matching variant
    fn validate(&self, input: &Self::Input) -> Result<Self::Output, ToolkitError>;
}

/// **VALIDATION RESULT TYPE ALIAS**
pub type ValidationResult<T> = Result<T, ToolkitError>;
