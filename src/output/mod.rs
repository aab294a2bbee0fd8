//! Output formatting
//!
//! [`Reporter`](crate::sink::Reporter) implementations for the final result:
//! a human-readable block on stdout and an optional JSON file.

pub mod json;
pub mod text;
