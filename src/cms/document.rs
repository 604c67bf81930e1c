//! Content API document models
//!
//! Serde mirrors of the wire shapes the content repository returns. Pages
//! keep their results in API return order; no de-duplication happens
//! anywhere downstream, so a repository that returns a document twice shows
//! it twice.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::richtext::RichTextBlock;

/// One page of post summaries plus the pagination continuation pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    /// Post summaries in API return order.
    pub results: Vec<PostSummary>,

    /// Opaque URL of the next page; `None` means no further pages.
    #[serde(default)]
    pub next_page: Option<String>,
}

/// A post summary as listed on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    /// Document identifier, unique within the repository.
    pub uid: String,

    /// Publication timestamp; documents that were never published carry
    /// none.
    #[serde(default)]
    pub first_publication_date: Option<DateTime<FixedOffset>>,

    pub data: SummaryData,
}

/// Projected summary fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub author: String,
}

/// A full post document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: String,

    #[serde(default)]
    pub first_publication_date: Option<DateTime<FixedOffset>>,

    pub data: DetailData,
}

/// Full post fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailData {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub banner: Banner,

    #[serde(default)]
    pub author: String,

    /// Ordered content sections; body order within a section is the API's.
    #[serde(default)]
    pub content: Vec<ContentSection>,
}

/// Banner image reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: String,
}

/// A heading plus its rich text body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub heading: String,

    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_page() {
        let json = r#"{
            "next_page": "https://repo.cdn.example.io/api/v2/documents/search?ref=x&page=2",
            "results": [
                {
                    "uid": "first-post",
                    "first_publication_date": "2021-04-19T10:00:00+00:00",
                    "data": {
                        "title": "First Post",
                        "subtitle": "On beginnings",
                        "author": "Ana"
                    }
                }
            ]
        }"#;

        let page: PostPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].uid, "first-post");
        assert_eq!(page.results[0].data.author, "Ana");
        assert!(page.next_page.is_some());
    }

    #[test]
    fn test_parse_page_without_next_pointer() {
        let json = r#"{"results": [], "next_page": null}"#;
        let page: PostPage = serde_json::from_str(json).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_parse_null_publication_date() {
        let json = r#"{
            "uid": "draft",
            "first_publication_date": null,
            "data": {"title": "Draft", "subtitle": "", "author": ""}
        }"#;
        let summary: PostSummary = serde_json::from_str(json).unwrap();
        assert!(summary.first_publication_date.is_none());
    }

    #[test]
    fn test_parse_post_detail() {
        let json = r#"{
            "uid": "hello",
            "first_publication_date": "2021-04-19T10:00:00+00:00",
            "data": {
                "title": "Hello",
                "banner": {"url": "https://images.example.io/banner.png"},
                "author": "Ana",
                "content": [
                    {
                        "heading": "Intro",
                        "body": [{"type": "paragraph", "text": "hi", "spans": []}]
                    }
                ]
            }
        }"#;

        let detail: PostDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.data.content.len(), 1);
        assert_eq!(detail.data.content[0].heading, "Intro");
        assert_eq!(detail.data.banner.url, "https://images.example.io/banner.png");
    }
}
