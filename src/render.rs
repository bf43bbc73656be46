//! Body rendering for full-text feed output.
//!
//! Post bodies are raw authored Markdown and stay opaque to selection,
//! ordering and facet logic. The JSON Feed's `content_html` field is the
//! one place presentational HTML is needed, and it must come through
//! this seam: feeding the raw body to subscribers as if it were HTML is
//! not an option.

use pulldown_cmark::{Options, Parser, html};

/// Rendering capability required by the full-text feed projector.
pub trait HtmlRenderer: Sync {
    /// Render a raw authored body to presentational HTML.
    fn render(&self, body: &str) -> String;
}

/// Markdown renderer used by the production build.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl HtmlRenderer for MarkdownRenderer {
    fn render(&self, body: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(body, options);

        let mut out = String::with_capacity(body.len() * 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_markdown() {
        let html = MarkdownRenderer.render("# Title\n\nSome *emphasis*.\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_renders_strikethrough_extension() {
        let html = MarkdownRenderer.render("~~gone~~");
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(MarkdownRenderer.render(""), "");
    }
}
