//! Scan — line reading and multi-line block extraction.

mod extract;
mod source;

pub use extract::BlockExtractor;
pub use source::PushbackLines;
