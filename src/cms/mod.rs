//! Content API client and document models

pub mod client;
pub mod document;
pub mod richtext;

pub use client::{CmsClient, CmsError, Query};
pub use document::{ContentSection, PostDetail, PostPage, PostSummary};
