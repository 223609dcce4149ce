//! Widget configuration, loadable from TOML.
//!
//! ```toml
//! base_url = "http://127.0.0.1:8000"
//! endpoint = "/chat/ask"
//! timeout_s = 90
//! citations = "numbered"      # "numbered" | "plain" | "hidden"
//! math_backend = "katex"      # "katex" | "mathjax" | "mathml"
//!
//! [labels]
//! copy = "Copy"
//! source_fallback = "Source"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::render::citations::CitationStyle;
use crate::render::math::MathBackend;

/// Configuration for the whole widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Origin the endpoint is resolved against.
    pub base_url: String,
    /// Path of the ask endpoint.
    pub endpoint: String,
    /// Advisory timeout forwarded to the backend; never enforced locally.
    pub timeout_s: Option<u32>,
    /// How answer sources are rendered.
    pub citations: CitationStyle,
    /// How long a copy control shows its feedback label.
    pub copy_feedback_ms: u64,
    /// Use the bundled markdown engine.
    pub markdown: bool,
    /// Use the bundled HTML sanitizer.
    pub sanitize: bool,
    /// Use the bundled syntax highlighter.
    pub highlight: bool,
    /// Render math delimiters.
    pub math: bool,
    pub math_backend: MathBackend,
    /// Also treat `$...$` as inline math.
    pub math_inline_dollar: bool,
    pub labels: Labels,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            endpoint: "/chat/ask".to_string(),
            timeout_s: None,
            citations: CitationStyle::Numbered,
            copy_feedback_ms: 1500,
            markdown: true,
            sanitize: true,
            highlight: true,
            math: true,
            math_backend: MathBackend::KaTeX,
            math_inline_dollar: false,
            labels: Labels::default(),
        }
    }
}

impl WidgetConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| ConfigError::Toml(e).into())
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

/// User-visible strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub copy: String,
    pub copied: String,
    pub copy_failed: String,
    pub copy_aria: String,
    pub source_fallback: String,
    /// Prefix of the message shown for a non-success HTTP status.
    pub error_prefix: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            copy: "Copy".to_string(),
            copied: "Copied!".to_string(),
            copy_failed: "Fehler".to_string(),
            copy_aria: "Code in Zwischenablage kopieren".to_string(),
            source_fallback: "Quelle".to_string(),
            error_prefix: "Fehler".to_string(),
        }
    }
}
