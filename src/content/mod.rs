//! Domain transforms over fetched content

pub mod feed;
pub mod post;

pub use feed::{transform_page, DisplayPost, Feed, LoadOutcome};
pub use post::PostView;
