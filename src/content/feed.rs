//! Listing feed: display transform and page accumulation
//!
//! The home page shows a growing list of post summaries. Pages are fetched
//! one at a time; each fetched page is appended to the list in completion
//! order and its continuation pointer takes the place of the consumed one.
//! Entries are never reordered, removed or de-duplicated.

use serde::Serialize;

use crate::cms::{CmsClient, CmsError, PostPage};
use crate::helpers::{published_label, DateError};

/// A post summary ready for display, publication date already formatted.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayPost {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Formatted publication date; empty when the document has none.
    pub published: String,
}

/// Map one fetched page to display records, keeping API order.
///
/// Applied identically to the initial page and to every page fetched
/// through the load-more path.
pub fn transform_page(page: &PostPage) -> Vec<DisplayPost> {
    page.results
        .iter()
        .map(|post| DisplayPost {
            uid: post.uid.clone(),
            title: post.data.title.clone(),
            subtitle: post.data.subtitle.clone(),
            author: post.data.author.clone(),
            published: match published_label(post.first_publication_date.as_ref()) {
                Ok(label) => label,
                // Unpublished documents get no label
                Err(DateError::MissingTimestamp) => String::new(),
            },
        })
        .collect()
}

/// Outcome of a [`Feed::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and appended.
    Loaded,
    /// No continuation pointer; nothing to do.
    Exhausted,
    /// A previous load has not resolved yet.
    AlreadyLoading,
}

/// In-memory accumulation of listing pages.
#[derive(Debug, Default)]
pub struct Feed {
    posts: Vec<DisplayPost>,
    next_page: Option<String>,
    in_flight: bool,
}

impl Feed {
    /// Seed a feed from the initial page.
    pub fn from_page(page: &PostPage) -> Self {
        Self {
            posts: transform_page(page),
            next_page: page.next_page.clone(),
            in_flight: false,
        }
    }

    /// Accumulated entries, in fetch order.
    pub fn posts(&self) -> &[DisplayPost] {
        &self.posts
    }

    /// Current continuation pointer.
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether a further page can be requested. The load-more control
    /// renders if and only if this holds.
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Append a fetched page's results and take over its pointer.
    ///
    /// The consumed pointer is gone for good; a null replacement pointer
    /// leaves the feed exhausted.
    pub fn apply_page(&mut self, page: &PostPage) {
        self.posts.extend(transform_page(page));
        self.next_page = page.next_page.clone();
    }

    /// Fetch the current continuation pointer and append its results.
    ///
    /// At most one load is in flight at a time; re-invocation while a load
    /// is pending reports [`LoadOutcome::AlreadyLoading`] instead of
    /// issuing a second fetch. Invocation with no pointer is a no-op.
    pub async fn load_more(&mut self, client: &CmsClient) -> Result<LoadOutcome, CmsError> {
        if self.in_flight {
            return Ok(LoadOutcome::AlreadyLoading);
        }
        let Some(url) = self.next_page.clone() else {
            return Ok(LoadOutcome::Exhausted);
        };

        self.in_flight = true;
        let result = client.fetch_page(&url).await;
        self.in_flight = false;

        self.apply_page(&result?);
        Ok(LoadOutcome::Loaded)
    }
}
