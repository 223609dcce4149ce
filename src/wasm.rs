//! WebAssembly bindings for JavaScript/TypeScript.

#![cfg(feature = "wasm")]

use crate::config::WidgetConfig;
use crate::message::{Message, Role, Source};
use crate::render::{create_engine, CitationStyle, MathBackend, MessageRenderer};
use crate::transcript::Transcript;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Render one chat message to the HTML of its transcript entry.
///
/// The returned HTML is static: hosts attach click handlers to the
/// `button.copy-btn` elements and typeset math in the inserted entry.
///
/// # Arguments
///
/// * `role` - `"user"`/`"you"` or `"assistant"`/`"bot"`.
/// * `markdown` - The message text.
/// * `sources` - Optional array of `{ title?, url? }` objects.
/// * `options` - Optional configuration object.
#[wasm_bindgen(js_name = renderMessage)]
pub fn render_message(
    role: &str,
    markdown: &str,
    sources: JsValue,
    options: Option<RenderOptions>,
) -> Result<String, JsError> {
    let role = Role::parse(role).ok_or_else(|| JsError::new(&format!("Unknown role: {}", role)))?;
    let sources: Vec<Source> = if sources.is_undefined() || sources.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(sources).map_err(|e| JsError::new(&e.to_string()))?
    };

    let config = options.map(|o| o.to_config()).unwrap_or_default();
    let renderer = MessageRenderer::from_config(&config);
    let mut transcript = Transcript::new();
    let entry = renderer.render(Message::new(role, markdown, sources), &mut transcript);
    Ok(entry.to_html())
}

/// Head content (stylesheets, scripts) the given math backend needs.
#[wasm_bindgen(js_name = mathHeadContent)]
pub fn math_head_content(backend: &str) -> Option<String> {
    create_engine(parse_backend(backend)).head_content()
}

/// Configuration options for rendering.
#[wasm_bindgen]
pub struct RenderOptions {
    citations: String,
    math_backend: String,
    inline_dollar: bool,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            citations: "numbered".to_string(),
            math_backend: "katex".to_string(),
            inline_dollar: false,
        }
    }

    /// Set the citation list style: "numbered", "plain", or "hidden".
    #[wasm_bindgen(js_name = setCitations)]
    pub fn set_citations(&mut self, style: &str) {
        self.citations = style.to_lowercase();
    }

    /// Set the math rendering backend: "katex", "mathjax", or "mathml".
    #[wasm_bindgen(js_name = setMathBackend)]
    pub fn set_math_backend(&mut self, backend: &str) {
        self.math_backend = backend.to_lowercase();
    }

    /// Also treat `$...$` as inline math.
    #[wasm_bindgen(js_name = setInlineDollar)]
    pub fn set_inline_dollar(&mut self, enabled: bool) {
        self.inline_dollar = enabled;
    }

    fn to_config(&self) -> WidgetConfig {
        WidgetConfig {
            citations: match self.citations.as_str() {
                "plain" => CitationStyle::Plain,
                "hidden" => CitationStyle::Hidden,
                _ => CitationStyle::Numbered,
            },
            math_backend: parse_backend(&self.math_backend),
            math_inline_dollar: self.inline_dollar,
            ..Default::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_backend(name: &str) -> MathBackend {
    match name.to_lowercase().as_str() {
        "mathjax" => MathBackend::MathJax,
        "mathml" => MathBackend::MathML,
        _ => MathBackend::KaTeX,
    }
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// TypeScript type definitions for documentation
/// ```typescript
/// // docs_chat_widget.d.ts
///
/// export interface Source { title?: string; url?: string; }
///
/// /**
///  * Render one chat message to transcript-entry HTML.
///  * @param role - "user" or "assistant"
///  * @param markdown - The message text
///  * @param sources - Optional citation sources
///  * @param options - Optional configuration
///  */
/// export function renderMessage(
///     role: string,
///     markdown: string,
///     sources?: Source[] | null,
///     options?: RenderOptions,
/// ): string;
///
/// export function mathHeadContent(backend: "katex" | "mathjax" | "mathml"): string | undefined;
///
/// export function getVersion(): string;
///
/// export class RenderOptions {
///     constructor();
///     setCitations(style: "numbered" | "plain" | "hidden"): void;
///     setMathBackend(backend: "katex" | "mathjax" | "mathml"): void;
///     setInlineDollar(enabled: boolean): void;
/// }
/// ```
const _: () = ();
