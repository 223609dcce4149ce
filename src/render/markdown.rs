//! Markdown to HTML conversion.

use pulldown_cmark::{html, Event, Options, Parser};

use crate::dom::escape_html;

/// A markdown-to-HTML engine.
pub trait MarkdownEngine {
    fn to_html(&self, markdown: &str) -> String;
}

/// GitHub-flavored markdown via pulldown-cmark.
///
/// Single newlines become `<br>`, headings get no generated ids and e-mail
/// addresses are left as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownEngine;

impl PulldownEngine {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options
    }
}

impl MarkdownEngine for PulldownEngine {
    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options()).map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        });
        let mut output = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut output, parser);
        output
    }
}

/// Markdown stage of the pipeline, with an escaped-text fallback when no
/// engine is configured.
pub struct MarkdownRenderer {
    engine: Option<Box<dyn MarkdownEngine>>,
}

impl MarkdownRenderer {
    pub fn new(engine: Option<Box<dyn MarkdownEngine>>) -> Self {
        Self { engine }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn render(&self, markdown: &str) -> String {
        match &self.engine {
            Some(engine) => engine.to_html(markdown),
            None => format!("<pre><code>{}</code></pre>", escape_html(markdown)),
        }
    }
}
