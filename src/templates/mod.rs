//! Embedded page templates rendered with Tera
//!
//! All templates ship inside the binary. Autoescape stays on; the one
//! value injected raw is the section body markup, which the rich text
//! formatter has already escaped.

use anyhow::Result;
use tera::{Context, Tera};

use crate::content::feed::DisplayPost;
use crate::content::post::PostView;

/// Template renderer with the embedded site templates.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("loading.html", include_str!("spacetraveling/loading.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render the listing page. The load-more control renders if and only
    /// if a continuation pointer is present.
    pub fn render_index(
        &self,
        site_title: &str,
        posts: &[DisplayPost],
        next_page: Option<&str>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site_title", site_title);
        context.insert("posts", posts);
        context.insert("next_page", &next_page);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render a post page.
    pub fn render_post(&self, site_title: &str, post: &PostView) -> Result<String> {
        let mut context = Context::new();
        context.insert("site_title", site_title);
        context.insert("post", post);
        Ok(self.tera.render("post.html", &context)?)
    }

    /// Render the transitional loading state shown while a post is not
    /// available.
    pub fn render_loading(&self, site_title: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("site_title", site_title);
        Ok(self.tera.render("loading.html", &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::SectionView;

    fn display_post(uid: &str) -> DisplayPost {
        DisplayPost {
            uid: uid.to_string(),
            title: format!("Title {}", uid),
            subtitle: "Sub".to_string(),
            author: "Ana".to_string(),
            published: "19 abr 2021".to_string(),
        }
    }

    #[test]
    fn test_index_renders_entries_and_control() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_index(
                "Space Traveling",
                &[display_post("a"), display_post("b")],
                Some("https://blog.cdn.example.io/api/v2/documents/search?page=2"),
            )
            .unwrap();

        assert!(html.contains("Title a"));
        assert!(html.contains("Title b"));
        assert!(html.contains(r#"href="post/a""#));
        assert!(html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_index_without_pointer_hides_control() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_index("Space Traveling", &[display_post("a")], None)
            .unwrap();
        assert!(!html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_post_page_renders_body_markup_raw() {
        let renderer = TemplateRenderer::new().unwrap();
        let view = PostView {
            uid: "hello".to_string(),
            title: "Hello".to_string(),
            banner_url: "https://images.example.io/banner.png".to_string(),
            author: "Ana".to_string(),
            published: "19 abr 2021".to_string(),
            reading_time: "4 min".to_string(),
            sections: vec![SectionView {
                heading: "Intro".to_string(),
                body_html: "<p>already <strong>formatted</strong></p>".to_string(),
            }],
        };

        let html = renderer.render_post("Space Traveling", &view).unwrap();
        assert!(html.contains("4 min"));
        assert!(html.contains("<p>already <strong>formatted</strong></p>"));
        assert!(html.contains(r#"src="https://images.example.io/banner.png""#));
    }

    #[test]
    fn test_loading_state() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_loading("Space Traveling").unwrap();
        assert!(html.contains("Carregando..."));
    }
}
