//! # JSON DECODE PIPELINE
//!
//! `LimitedReader → decode → single-value check → classify`. Entry point is
//! [`Tools::read_json`](crate::types::Tools::read_json).

pub mod classify;
pub mod limiter;
pub mod parser;


pub use classify::{classify, ReadSignals};
pub use limiter::LimitedReader;
