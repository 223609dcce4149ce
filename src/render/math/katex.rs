//! KaTeX/MathJax passthrough engine.

use super::MathEngine;
use crate::dom::escape_html;
use crate::error::RenderError;

/// Wraps expressions in marked-up elements for client-side typesetting.
///
/// The output keeps the `\( \)` / `\[ \]` delimiters inside an element with
/// class `math`, which the scanner skips, so a second pass leaves it alone.
///
/// [`MathEngine::head_content`] typesets the page once on load. Entries
/// inserted later must be typeset by the host, e.g.
/// `renderMathInElement(entry, {delimiters: [...]})` for KaTeX or
/// `MathJax.typesetPromise([entry])` for MathJax.
pub struct KaTeXEngine {
    use_mathjax: bool,
}

impl KaTeXEngine {
    pub fn new() -> Self {
        Self { use_mathjax: false }
    }

    pub fn new_mathjax() -> Self {
        Self { use_mathjax: true }
    }
}

impl Default for KaTeXEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MathEngine for KaTeXEngine {
    fn render_inline(&self, latex: &str) -> Result<String, RenderError> {
        Ok(format!(
            r#"<span class="math inline">\({}\)</span>"#,
            escape_html(latex.trim())
        ))
    }

    fn render_display(&self, latex: &str) -> Result<String, RenderError> {
        Ok(format!(
            r#"<span class="math display">\[{}\]</span>"#,
            escape_html(latex.trim())
        ))
    }

    fn head_content(&self) -> Option<String> {
        if self.use_mathjax {
            Some(MATHJAX_HEAD.to_string())
        } else {
            Some(KATEX_HEAD.to_string())
        }
    }
}

const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {
        delimiters: [
            {left: '\\[', right: '\\]', display: true},
            {left: '\\(', right: '\\)', display: false}
        ]
    });"></script>"#;

const MATHJAX_HEAD: &str = r#"<script>
MathJax = {
    tex: {
        inlineMath: [['\\(', '\\)']],
        displayMath: [['\\[', '\\]']]
    }
};
</script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>"#;
