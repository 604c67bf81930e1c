//! Shared helper functions
//!
//! Date formatting for publication labels and the HTML escaping used by
//! the rich text formatter.

mod date;
mod html;

pub use date::*;
pub use html::*;
