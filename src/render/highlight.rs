//! Syntax highlighting for code blocks.

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::RenderError;

/// Turns source code into highlighted HTML (a sequence of inline spans).
pub trait SyntaxHighlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, RenderError>;
}

/// Class-based highlighting with syntect.
///
/// Output uses `hl-` prefixed classes; [`SyntectHighlighter::stylesheet`]
/// provides matching CSS.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: String,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: "InspiredGitHub".to_string(),
        }
    }

    /// Use another bundled theme for [`SyntectHighlighter::stylesheet`].
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    fn class_style() -> ClassStyle {
        ClassStyle::SpacedPrefixed { prefix: "hl-" }
    }

    /// CSS for the configured theme.
    pub fn stylesheet(&self) -> Result<String, RenderError> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(&self.theme)
            .or_else(|| themes.themes.values().next())
            .ok_or_else(|| RenderError::Highlight("no themes bundled".to_string()))?;
        css_for_theme_with_class_style(theme, Self::class_style())
            .map_err(|e| RenderError::Highlight(e.to_string()))
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, RenderError> {
        let syntax = language
            .and_then(|lang| self.syntax_set.find_syntax_by_token(syntect_token(lang)))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, Self::class_style());
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| RenderError::Highlight(e.to_string()))?;
        }
        Ok(generator.finalize())
    }
}

/// Map common fence names onto tokens syntect knows.
fn syntect_token(lang: &str) -> &str {
    match lang {
        "py" | "python3" => "python",
        "sh" | "shell" | "zsh" | "console" => "bash",
        "yml" => "yaml",
        "ts" | "typescript" => "js",
        "rs" => "rust",
        _ => lang,
    }
}
