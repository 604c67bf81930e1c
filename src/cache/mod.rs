//! Page caches
//!
//! The listing page is recomputed at most once per revalidation interval;
//! requests arriving inside the window observe the cached copy. Post pages
//! are rendered once per identifier and kept for the process lifetime,
//! so on-demand generation only ever happens for identifiers the server
//! has not seen before.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cms::document::PostPage;

/// Single-slot cache for the initial listing page.
#[derive(Debug)]
pub struct ListingCache {
    ttl: Duration,
    slot: Option<ListingEntry>,
}

#[derive(Debug, Clone)]
struct ListingEntry {
    page: PostPage,
    fetched_at: Instant,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    /// The cached page, if any, together with its freshness.
    pub fn get(&self) -> Option<(&PostPage, bool)> {
        self.slot
            .as_ref()
            .map(|entry| (&entry.page, entry.fetched_at.elapsed() < self.ttl))
    }

    /// Replace the cached page, restarting the revalidation window.
    pub fn store(&mut self, page: PostPage) {
        self.slot = Some(ListingEntry {
            page,
            fetched_at: Instant::now(),
        });
    }
}

/// Rendered post pages by identifier, kept once generated.
#[derive(Debug, Default)]
pub struct PostCache {
    pages: HashMap<String, String>,
}

impl PostCache {
    /// The rendered page for `uid`, when one has been generated.
    pub fn get(&self, uid: &str) -> Option<&str> {
        self.pages.get(uid).map(String::as_str)
    }

    pub fn insert(&mut self, uid: String, html: String) {
        self.pages.insert(uid, html);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
