//! Post view model and reading time estimation

use serde::Serialize;

use crate::cms::document::{ContentSection, PostDetail};
use crate::cms::richtext;
use crate::helpers::{published_label, DateError};

/// Fixed reading speed used for the estimate, in words per minute.
const WORDS_PER_MINUTE: usize = 200;

/// Count words by splitting on single spaces.
///
/// This is the counting rule the site has always used: consecutive spaces
/// produce empty fragments that count as words, and the empty string counts
/// as one word. Keep it bug-compatible; the estimate is meant to be crude.
fn naive_words(text: &str) -> usize {
    text.split(' ').count()
}

/// Total naive word count across all content sections, headings included.
pub fn word_count(sections: &[ContentSection]) -> usize {
    sections
        .iter()
        .map(|section| {
            naive_words(&section.heading) + naive_words(&richtext::as_text(&section.body))
        })
        .sum()
}

/// Estimated reading time in minutes.
pub fn reading_time_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE)
}

/// A content section rendered for the page template.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,

    /// Markup produced by the rich text formatter. Trusted output of the
    /// content layer; the template injects it without re-escaping.
    pub body_html: String,
}

/// A full post prepared for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub uid: String,
    pub title: String,
    pub banner_url: String,
    pub author: String,

    /// Formatted publication date; empty when the document has none.
    pub published: String,

    /// Display label, e.g. "4 min".
    pub reading_time: String,

    pub sections: Vec<SectionView>,
}

impl PostView {
    pub fn from_detail(detail: &PostDetail) -> Self {
        let words = word_count(&detail.data.content);
        Self {
            uid: detail.uid.clone(),
            title: detail.data.title.clone(),
            banner_url: detail.data.banner.url.clone(),
            author: detail.data.author.clone(),
            published: match published_label(detail.first_publication_date.as_ref()) {
                Ok(label) => label,
                Err(DateError::MissingTimestamp) => String::new(),
            },
            reading_time: format!("{} min", reading_time_minutes(words)),
            sections: detail
                .data
                .content
                .iter()
                .map(|section| SectionView {
                    heading: section.heading.clone(),
                    body_html: richtext::as_html(&section.body),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::document::{Banner, DetailData};
    use crate::cms::richtext::RichTextBlock;

    fn section(heading: &str, body_texts: &[&str]) -> ContentSection {
        ContentSection {
            heading: heading.to_string(),
            body: body_texts
                .iter()
                .map(|text| RichTextBlock {
                    kind: "paragraph".to_string(),
                    text: text.to_string(),
                    spans: Vec::new(),
                    url: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_reading_time_fixed_points() {
        assert_eq!(reading_time_minutes(0), 0);
        assert_eq!(reading_time_minutes(1), 1);
        assert_eq!(reading_time_minutes(200), 1);
        assert_eq!(reading_time_minutes(201), 2);
    }

    #[test]
    fn test_reading_time_is_monotonic() {
        let mut last = 0;
        for words in 0..1000 {
            let minutes = reading_time_minutes(words);
            assert!(minutes >= last);
            last = minutes;
        }
    }

    #[test]
    fn test_word_count_naive_splitting() {
        // "Hello World" = 2, body "a b c" = 3, "Next" = 1, empty body = 1.
        // The empty-body fragment still counts; that quirk is load-bearing.
        let sections = vec![section("Hello World", &["a b c"]), section("Next", &[])];
        assert_eq!(word_count(&sections), 7);
    }

    #[test]
    fn test_word_count_inflated_by_consecutive_spaces() {
        let sections = vec![section("a  b", &[])];
        // "a  b" splits into ["a", "", "b"] plus the empty body
        assert_eq!(word_count(&sections), 4);
    }

    #[test]
    fn test_post_view_from_detail() {
        let detail = PostDetail {
            uid: "hello".to_string(),
            first_publication_date: Some(
                chrono::DateTime::parse_from_rfc3339("2021-04-19T10:00:00+00:00").unwrap(),
            ),
            data: DetailData {
                title: "Hello".to_string(),
                banner: Banner {
                    url: "https://images.example.io/banner.png".to_string(),
                },
                author: "Ana".to_string(),
                content: vec![section("Intro", &["some words here"])],
            },
        };

        let view = PostView::from_detail(&detail);
        assert_eq!(view.published, "19 abr 2021");
        assert_eq!(view.reading_time, "1 min");
        assert_eq!(view.banner_url, "https://images.example.io/banner.png");
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].body_html, "<p>some words here</p>");
    }

    #[test]
    fn test_post_view_without_timestamp() {
        let detail = PostDetail {
            uid: "draft".to_string(),
            first_publication_date: None,
            data: DetailData {
                title: "Draft".to_string(),
                banner: Banner::default(),
                author: String::new(),
                content: Vec::new(),
            },
        };
        let view = PostView::from_detail(&detail);
        assert_eq!(view.published, "");
        assert_eq!(view.reading_time, "0 min");
    }
}
