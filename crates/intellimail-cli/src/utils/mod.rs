//! Utility functions for terminal output.

pub mod format;

pub use format::{format_date, presence, strip_html, truncate_string};
