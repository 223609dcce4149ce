//! Math rendering: delimiter scanning over inserted nodes and the backends
//! that typeset each expression.

mod katex;
mod mathml;
pub mod scan;

pub use self::katex::KaTeXEngine;
pub use self::mathml::MathMLEngine;

use serde::Deserialize;
use tracing::debug;

use crate::dom::{parse_fragment, Element, Node};
use crate::error::RenderError;
use scan::{scan, Segment};

/// Subtrees never searched for math.
const IGNORED_TAGS: &[&str] = &["script", "noscript", "style", "textarea", "pre", "code", "a"];

/// Math rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Output raw LaTeX for KaTeX to typeset client-side.
    #[default]
    KaTeX,
    /// Convert to MathML for native browser rendering.
    MathML,
    /// Output raw LaTeX for MathJax.
    MathJax,
}

/// Typesets a single expression into HTML.
///
/// Output is phrasing content (a `span`), so display math stays inside the
/// paragraph it was written in. Client-side engines only mark expressions up;
/// the host typesets each inserted entry with the script from
/// [`MathEngine::head_content`].
pub trait MathEngine {
    fn render_inline(&self, latex: &str) -> Result<String, RenderError>;

    fn render_display(&self, latex: &str) -> Result<String, RenderError>;

    /// HTML head content (scripts, styles) the output depends on.
    fn head_content(&self) -> Option<String>;
}

/// Create an engine for the given backend.
pub fn create_engine(backend: MathBackend) -> Box<dyn MathEngine> {
    match backend {
        MathBackend::KaTeX => Box::new(KaTeXEngine::new()),
        MathBackend::MathJax => Box::new(KaTeXEngine::new_mathjax()),
        MathBackend::MathML => Box::new(MathMLEngine::new()),
    }
}

/// Replaces math delimiters in text nodes with rendered notation.
pub struct MathRenderer {
    engine: Box<dyn MathEngine>,
    inline_dollar: bool,
}

impl MathRenderer {
    pub fn new(engine: Box<dyn MathEngine>) -> Self {
        Self {
            engine,
            inline_dollar: false,
        }
    }

    /// Also accept `$...$` as inline math.
    pub fn with_inline_dollar(mut self, enabled: bool) -> Self {
        self.inline_dollar = enabled;
        self
    }

    pub fn head_content(&self) -> Option<String> {
        self.engine.head_content()
    }

    /// Render every expression under `root`. Returns how many were rendered;
    /// expressions that fail keep their source text.
    pub fn render(&self, root: &mut Element) -> usize {
        if is_ignored(root) {
            return 0;
        }

        let mut rendered = 0;
        let children = std::mem::take(&mut root.children);
        for child in children {
            match child {
                Node::Text(text) => rendered += self.render_text(&text, &mut root.children),
                Node::Element(mut el) => {
                    rendered += self.render(&mut el);
                    root.children.push(Node::Element(el));
                }
            }
        }
        rendered
    }

    fn render_text(&self, text: &str, out: &mut Vec<Node>) -> usize {
        let segments = scan(text, self.inline_dollar);
        if !segments.iter().any(|s| matches!(s, Segment::Math { .. })) {
            out.push(Node::Text(text.to_string()));
            return 0;
        }

        let mut rendered = 0;
        for segment in segments {
            match segment {
                Segment::Text(t) => push_text(out, t),
                Segment::Math { tex, source, display } => {
                    let result = if display {
                        self.engine.render_display(tex)
                    } else {
                        self.engine.render_inline(tex)
                    };
                    match result {
                        Ok(html) => {
                            out.extend(parse_fragment(&html));
                            rendered += 1;
                        }
                        Err(err) => {
                            debug!("math expression left as text: {}", err);
                            push_text(out, source);
                        }
                    }
                }
            }
        }
        rendered
    }
}

/// Append text, merging with a preceding text node.
fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Node::Text(text.to_string()));
    }
}

fn is_ignored(el: &Element) -> bool {
    IGNORED_TAGS.contains(&el.tag.as_str()) || el.has_class("math")
}
