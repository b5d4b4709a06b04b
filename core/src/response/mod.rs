//! # RESPONSE HELPERS
//!
//! JSON writing with the uniform envelope, and static file downloads served as
//! attachments. Both produce a `hyper::Response<Vec<u8>>` for the caller to send.

pub mod download;
pub mod serializer;
pub mod types;

pub use download::content_disposition;
pub use serializer::APPLICATION_JSON;
pub use types::JsonResponse;

#[cfg(test)]
mod tests;
