//! MathML engine.

use super::MathEngine;
use crate::error::RenderError;

/// Converts LaTeX to MathML.
///
/// Without the `mathml` feature every expression fails, so the scanner
/// leaves its source text in place.
#[derive(Debug, Default)]
pub struct MathMLEngine;

impl MathMLEngine {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "mathml")]
fn convert(latex: &str, display: latex2mathml::DisplayStyle) -> Result<String, RenderError> {
    latex2mathml::latex_to_mathml(latex.trim(), display).map_err(|e| RenderError::Math(e.to_string()))
}

impl MathEngine for MathMLEngine {
    fn render_inline(&self, latex: &str) -> Result<String, RenderError> {
        #[cfg(feature = "mathml")]
        {
            convert(latex, latex2mathml::DisplayStyle::Inline)
                .map(|mathml| format!(r#"<span class="math inline">{}</span>"#, mathml))
        }

        #[cfg(not(feature = "mathml"))]
        {
            Err(RenderError::Math(format!(
                "MathML support not compiled in: {}",
                latex
            )))
        }
    }

    fn render_display(&self, latex: &str) -> Result<String, RenderError> {
        #[cfg(feature = "mathml")]
        {
            convert(latex, latex2mathml::DisplayStyle::Block)
                .map(|mathml| format!(r#"<span class="math display">{}</span>"#, mathml))
        }

        #[cfg(not(feature = "mathml"))]
        {
            Err(RenderError::Math(format!(
                "MathML support not compiled in: {}",
                latex
            )))
        }
    }

    fn head_content(&self) -> Option<String> {
        Some(MATHML_STYLES.to_string())
    }
}

const MATHML_STYLES: &str = r#"<style>
math {
    font-size: 1.1em;
}
</style>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "mathml")]
    #[test]
    fn test_mathml_inline() {
        let result = MathMLEngine::new().render_inline("x^2").unwrap();
        assert!(result.contains("<math"));
    }

    #[cfg(not(feature = "mathml"))]
    #[test]
    fn test_without_feature_expressions_fail() {
        assert!(MathMLEngine::new().render_inline("x^2").is_err());
        assert!(MathMLEngine::new().render_display("x^2").is_err());
    }
}
