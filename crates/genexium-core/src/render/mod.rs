//! Markdown to HTML rendering.
//!
//! Thin adapter over `pulldown-cmark`. The two options mirror the ones the
//! service's pages were configured with: GitHub-flavoured extensions, and
//! single newlines rendered as line breaks.

use pulldown_cmark::{Event, Options, Parser, html};

/// Renderer options, fixed once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render soft line breaks as `<br />`.
    pub breaks: bool,
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            breaks: true,
            gfm: true,
        }
    }
}

/// Converts markdown text to an HTML fragment.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    fn parser_options(&self) -> Options {
        if self.options.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Render `markdown` to an HTML fragment.
    pub fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let breaks = self.options.breaks;
        let events = parser.map(move |event| match event {
            Event::SoftBreak if breaks => Event::InlineHtml("<br />".into()),
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }
}

/// Markdown source together with the HTML it rendered to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedPane {
    pub markdown: String,
    pub html: String,
}

impl RenderedPane {
    pub fn render(renderer: &MarkdownRenderer, markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        let html = renderer.to_html(&markdown);
        Self { markdown, html }
    }

    pub fn is_empty(&self) -> bool {
        self.markdown.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_lists() {
        let html = MarkdownRenderer::default().to_html("## Week 1\n\n- Run\n- Rest\n");
        assert_eq!(html, "<h2>Week 1</h2>\n<ul>\n<li>Run</li>\n<li>Rest</li>\n</ul>\n");
    }

    #[test]
    fn breaks_option_turns_newlines_into_br() {
        let with = MarkdownRenderer::default().to_html("line one\nline two");
        assert!(with.contains("<br />"), "got: {with}");

        let without = MarkdownRenderer::new(RenderOptions {
            breaks: false,
            gfm: true,
        })
        .to_html("line one\nline two");
        assert!(!without.contains("<br"), "got: {without}");
    }

    #[test]
    fn soft_break_adds_no_newline() {
        let html = MarkdownRenderer::default().to_html("line one\nline two");
        assert_eq!(html, "<p>line one<br />line two</p>\n");
    }

    #[test]
    fn gfm_option_controls_tables() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let gfm = MarkdownRenderer::default().to_html(md);
        assert!(gfm.contains("<table>"), "got: {gfm}");

        let plain = MarkdownRenderer::new(RenderOptions {
            breaks: true,
            gfm: false,
        })
        .to_html(md);
        assert!(!plain.contains("<table>"), "got: {plain}");
    }

    #[test]
    fn pane_keeps_source_and_html() {
        let pane = RenderedPane::render(&MarkdownRenderer::default(), "# Plan");
        assert_eq!(pane.markdown, "# Plan");
        assert_eq!(pane.html, "<h1>Plan</h1>\n");
        assert!(!pane.is_empty());
        assert!(RenderedPane::default().is_empty());
    }
}
