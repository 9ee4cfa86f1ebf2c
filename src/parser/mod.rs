//! Parsing for content files.
//!
//! Semantic pages are stored as JSON and validated on load.

pub mod page;

// Re-export commonly used functions
pub use page::{parse_page_file, parse_page_str, validate_page};
