//! # TOOLKIT CORE LIBRARY
//!
//! **HELPERS FOR HTTP REQUEST HANDLERS**
//!
//! **ARCHITECTURE**: One read-only `Tools` configuration drives two pipelines:
//! multipart uploads (`upload`) and strict JSON decoding (`request`), with JSON
//! and file-download responses in `response`
//! **GUARANTEE**: Every operation is synchronous and returns a typed `ToolkitError`
//! **TYPES**: Requests and responses are `hyper` types; the host server owns the transport

pub mod api;
pub mod directory;
pub mod errors;
pub mod random;
pub mod remote;
pub mod request;
pub mod response;
pub mod slug;
pub mod types;
pub mod upload;

// **POLICY CHECKS SHARED BY THE PIPELINES**
pub mod validation;

pub use errors::{ToolkitError, ToolkitResult, UploadError};
pub use types::{Tools, UploadOptions, UploadedFile};
