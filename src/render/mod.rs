//! Message rendering pipeline: markdown, sanitization, citations, then
//! post-processing of the inserted entry (code blocks and math).

pub mod citations;
pub mod code_blocks;
pub mod highlight;
pub mod markdown;
pub mod math;
pub mod sanitize;

pub use citations::{CitationListBuilder, CitationStyle};
pub use code_blocks::CodeBlockEnhancer;
pub use highlight::{SyntaxHighlighter, SyntectHighlighter};
pub use markdown::{MarkdownEngine, MarkdownRenderer, PulldownEngine};
pub use math::{create_engine, MathBackend, MathEngine, MathRenderer};
pub use sanitize::{AmmoniaSanitizer, HtmlSanitizer, Sanitizer};

use std::time::Instant;

use tracing::debug;

use crate::clipboard::Clipboard;
use crate::config::WidgetConfig;
use crate::dom::{parse_fragment, Element};
use crate::error::ClipboardError;
use crate::message::Message;
use crate::transcript::{Entry, Transcript};

/// Optional collaborators. `None` selects the documented fallback.
#[derive(Default)]
pub struct Capabilities {
    pub markdown: Option<Box<dyn MarkdownEngine>>,
    pub sanitizer: Option<Box<dyn HtmlSanitizer>>,
    pub highlighter: Option<Box<dyn SyntaxHighlighter>>,
    pub math: Option<Box<dyn MathEngine>>,
    pub clipboard: Option<Box<dyn Clipboard>>,
}

impl Capabilities {
    /// Every capability absent.
    pub fn none() -> Self {
        Self::default()
    }

    /// The bundled engines, as enabled by `config`. No clipboard is bundled.
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            markdown: config
                .markdown
                .then(|| Box::new(PulldownEngine::new()) as Box<dyn MarkdownEngine>),
            sanitizer: config
                .sanitize
                .then(|| Box::new(AmmoniaSanitizer::new()) as Box<dyn HtmlSanitizer>),
            highlighter: config
                .highlight
                .then(|| Box::new(SyntectHighlighter::new()) as Box<dyn SyntaxHighlighter>),
            math: config
                .math
                .then(|| math::create_engine(config.math_backend)),
            clipboard: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }
}

/// Turns messages into transcript entries.
pub struct MessageRenderer {
    markdown: MarkdownRenderer,
    sanitizer: Sanitizer,
    citations: CitationListBuilder,
    code_blocks: CodeBlockEnhancer,
    math: Option<MathRenderer>,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl MessageRenderer {
    pub fn new(capabilities: Capabilities, config: &WidgetConfig) -> Self {
        let Capabilities {
            markdown,
            sanitizer,
            highlighter,
            math,
            clipboard,
        } = capabilities;

        Self {
            markdown: MarkdownRenderer::new(markdown),
            sanitizer: Sanitizer::new(sanitizer),
            citations: CitationListBuilder::new(
                config.citations,
                config.labels.source_fallback.as_str(),
            ),
            code_blocks: CodeBlockEnhancer::new(
                highlighter,
                config.labels.clone(),
                config.copy_feedback(),
            ),
            math: math.map(|engine| {
                MathRenderer::new(engine).with_inline_dollar(config.math_inline_dollar)
            }),
            clipboard,
        }
    }

    /// Renderer with the bundled engines.
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(Capabilities::from_config(config), config)
    }

    /// Head content required by the math output, if any.
    pub fn math_head_content(&self) -> Option<String> {
        self.math.as_ref().and_then(MathRenderer::head_content)
    }

    /// Build the entry element: markdown, sanitization, citation list.
    pub fn compose(&self, message: &Message) -> Element {
        if !self.markdown.is_available() {
            debug!("no markdown engine, rendering escaped text");
        }
        let raw_html = self.markdown.render(&message.raw_text);
        let safe_html = self.sanitizer.sanitize(&raw_html);

        let mut root = Element::new("div")
            .with_attr("class", format!("msg {}", message.role.css_class()));
        root.children = parse_fragment(&safe_html);

        if let Some(list) = self.citations.build(&message.sources) {
            root.push(list);
        }
        root
    }

    /// Render `message` to the front of `transcript`, then enhance only the
    /// new entry.
    pub fn render<'t>(&self, message: Message, transcript: &'t mut Transcript) -> &'t mut Entry {
        let root = self.compose(&message);
        let entry = transcript.insert_front(Entry::new(message, root));
        self.enhance(entry);
        entry
    }

    /// Post-process an entry. Safe to repeat.
    pub fn enhance(&self, entry: &mut Entry) {
        self.code_blocks.enhance_entry(entry);
        if let Some(math) = &self.math {
            math.render(&mut entry.root);
        }
    }

    /// Activate the copy control of a code block.
    pub fn copy_code(
        &self,
        entry: &mut Entry,
        block: usize,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        self.code_blocks
            .activate(entry, block, self.clipboard.as_deref(), now)
    }

    /// Revert expired copy controls across the transcript.
    pub fn tick(&self, transcript: &mut Transcript, now: Instant) -> bool {
        let mut changed = false;
        for entry in transcript.iter_mut() {
            changed |= self.code_blocks.refresh(entry, now);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::tests::FakeClipboard;
    use crate::message::Source;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn renderer() -> MessageRenderer {
        MessageRenderer::from_config(&WidgetConfig::default())
    }

    #[test]
    fn test_plain_answer_has_no_citations() {
        let mut transcript = Transcript::new();
        renderer().render(Message::assistant("4", Vec::new()), &mut transcript);
        let entry = transcript.front().unwrap();
        assert_eq!(entry.root.attr("class"), Some("msg bot"));
        assert_eq!(entry.root.find("p").unwrap().text_content(), "4");
        assert!(entry.root.find("ol").is_none());
        assert!(entry.root.find("ul").is_none());
    }

    #[test]
    fn test_citations_follow_body() {
        let mut transcript = Transcript::new();
        let sources = vec![
            Source::new(Some("A"), Some("https://a.example")),
            Source::new(Some("B"), Some("https://b.example")),
        ];
        renderer().render(Message::assistant("See sources.", sources), &mut transcript);
        let root = &transcript.front().unwrap().root;

        let last = root.child_elements().last().unwrap();
        assert_eq!(last.tag, "ol");
        let labels: Vec<String> = last.find_all("a").iter().map(|a| a.text_content()).collect();
        assert_eq!(labels, vec!["[1] A", "[2] B"]);
    }

    #[test]
    fn test_hidden_citations() {
        let config = WidgetConfig {
            citations: CitationStyle::Hidden,
            ..WidgetConfig::default()
        };
        let mut transcript = Transcript::new();
        MessageRenderer::from_config(&config).render(
            Message::assistant("x", vec![Source::new(Some("A"), None)]),
            &mut transcript,
        );
        assert!(transcript.front().unwrap().root.find("ol").is_none());
    }

    #[test]
    fn test_escape_fallback_without_markdown_engine() {
        let renderer = MessageRenderer::new(Capabilities::none(), &WidgetConfig::default());
        let mut transcript = Transcript::new();
        renderer.render(Message::assistant("<script>alert(1)</script>", Vec::new()), &mut transcript);
        let entry = transcript.front().unwrap();
        let html = entry.to_html();

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(entry.root.find("script").is_none());
        assert_eq!(entry.root.find("code").unwrap().text_content(), "<script>alert(1)</script>");
    }

    #[test]
    fn test_markdown_without_sanitizer_inserts_raw_html() {
        let capabilities = Capabilities {
            markdown: Some(Box::new(PulldownEngine::new())),
            ..Capabilities::none()
        };
        let renderer = MessageRenderer::new(capabilities, &WidgetConfig::default());
        let mut transcript = Transcript::new();
        renderer.render(Message::assistant("<script>alert(1)</script>", Vec::new()), &mut transcript);
        let entry = transcript.front().unwrap();

        // Known gap: without a sanitizer the engine's raw HTML is kept.
        assert!(entry.root.find("script").is_some());
        assert!(entry.to_html().contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_sanitizer_removes_raw_html() {
        let mut transcript = Transcript::new();
        renderer().render(
            Message::assistant("<script>alert(1)</script>\n\nsafe <img src=x onerror=alert(1)>", Vec::new()),
            &mut transcript,
        );
        let html = transcript.front().unwrap().to_html();
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(html.contains("safe"));
    }

    #[test]
    fn test_code_block_gets_highlighting_and_control() {
        let mut transcript = Transcript::new();
        let entry = renderer().render(
            Message::assistant("```python\nprint(\"$$x$$\")\n```", Vec::new()),
            &mut transcript,
        );
        assert_eq!(entry.controls.len(), 1);
        let code = entry.root.find("code").unwrap();
        assert_eq!(code.attr("data-highlighted"), Some("yes"));
        assert_eq!(code.text_content(), "print(\"$$x$$\")\n");
        assert_eq!(entry.root.find("button").unwrap().text_content(), "Copy");
        assert!(entry.root.find_all("span").iter().all(|s| !s.has_class("math")));
    }

    #[test]
    fn test_math_rendered_outside_code() {
        let mut transcript = Transcript::new();
        let entry = renderer().render(
            Message::assistant("Euler: $$e^{i\\pi}+1=0$$", Vec::new()),
            &mut transcript,
        );
        assert!(entry.to_html().contains(r#"class="math display""#));
    }

    #[test]
    fn test_enhance_only_touches_new_entry() {
        let renderer = renderer();
        let mut transcript = Transcript::new();
        renderer.render(Message::assistant("```\na\n```", Vec::new()), &mut transcript);
        let older = transcript.front().unwrap().to_html();
        renderer.render(Message::assistant("```\nb\n```", Vec::new()), &mut transcript);
        assert_eq!(transcript.get(1).unwrap().to_html(), older);
    }

    #[test]
    fn test_copy_and_tick_through_renderer() {
        let capabilities =
            Capabilities::from_config(&WidgetConfig::default()).with_clipboard(Box::new(FakeClipboard::secure()));
        let renderer = MessageRenderer::new(capabilities, &WidgetConfig::default());
        let mut transcript = Transcript::new();
        renderer.render(Message::assistant("```\nls -la\n```", Vec::new()), &mut transcript);

        let t0 = Instant::now();
        let entry = transcript.get_mut(0).unwrap();
        renderer.copy_code(entry, 0, t0).unwrap();
        assert_eq!(entry.root.find("button").unwrap().text_content(), "Copied!");

        assert!(renderer.tick(&mut transcript, t0 + Duration::from_millis(1500)));
        let button_label = transcript.front().unwrap().root.find("button").unwrap().text_content();
        assert_eq!(button_label, "Copy");
    }

    #[test]
    fn test_user_message_class() {
        let root = renderer().compose(&Message::user("hi"));
        assert_eq!(root.attr("class"), Some("msg you"));
    }
}
