//! # docs-chat-widget
//!
//! The core of a chat widget for a question-answering service: questions are
//! posted to one HTTP endpoint and the markdown answers are rendered into a
//! newest-first transcript.
//!
//! ## Features
//!
//! - **Markdown answers**: GitHub-flavored markdown, single newlines kept as line breaks
//! - **Sanitization**: rendered HTML is cleaned before insertion
//! - **Citations**: answer sources as a numbered (or plain, or hidden) link list
//! - **Code blocks**: syntax highlighting and a copy control with transient feedback
//! - **Math**: `$$...$$` and `\(...\)` typeset outside code and links. Markdown
//!   treats `\(` as an escaped parenthesis, so inline math in markdown text is
//!   written `\\(...\\)`
//! - **Single-flight requests**: one question in flight at a time, guaranteed release
//!
//! Every rendering collaborator is optional. A missing markdown engine falls
//! back to escaped preformatted text, a missing sanitizer passes HTML through
//! unchanged, and missing highlighter or math engines leave the text as is.
//!
//! ## Quick Start
//!
//! ```rust
//! use docs_chat_widget::{render_message, Message, Source, WidgetConfig};
//!
//! let message = Message::assistant(
//!     "The answer is **4**.",
//!     vec![Source::new(Some("Arithmetic"), Some("https://example.org/add"))],
//! );
//!
//! let html = render_message(message, &WidgetConfig::default());
//! assert!(html.contains("<strong>4</strong>"));
//! assert!(html.contains("[1] Arithmetic"));
//! ```
//!
//! ## Asking questions
//!
//! ```rust,no_run
//! use docs_chat_widget::{Capabilities, HeadlessSurface, RequestController, WidgetConfig};
//!
//! # async fn run() -> docs_chat_widget::Result<()> {
//! let config = WidgetConfig::from_toml_str(r#"base_url = "http://127.0.0.1:8000""#)?;
//! let controller =
//!     RequestController::from_config(&config, HeadlessSurface::new(), Capabilities::from_config(&config))?;
//!
//! controller.ask("What is 2+2?").await;
//! println!("{}", controller.transcript().to_html());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See [`WidgetConfig`] for the TOML keys.
//!
//! ### Math Backends
//!
//! - `KaTeX` (default): Client-side rendering with KaTeX
//! - `MathJax`: Client-side rendering with MathJax
//! - `MathML`: Native browser rendering (requires `mathml` feature)
//!
//! The client-side backends mark expressions up and rely on the script from
//! [`MessageRenderer::math_head_content`]. It typesets the page on load; hosts
//! typeset each entry inserted afterwards (`renderMathInElement(entry, ...)`
//! for KaTeX, `MathJax.typesetPromise([entry])` for MathJax).
//!
//! ## Features
//!
//! - `mathml`: Enable MathML rendering backend (requires `latex2mathml` crate)
//! - `wasm`: Enable WebAssembly bindings (requires `wasm-bindgen`)

pub mod backend;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod message;
pub mod render;
pub mod transcript;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use backend::{AskRequest, AskResponse, ChatBackend, HttpBackend};
pub use clipboard::{ButtonState, Clipboard, CopyControl};
pub use config::{Labels, WidgetConfig};
pub use controller::{AskOutcome, ChatSurface, HeadlessSurface, IgnoreReason, RequestController, RequestState};
pub use error::{ClipboardError, ConfigError, Error, RenderError, RequestError, Result};
pub use message::{Message, Role, Source};
pub use render::{Capabilities, CitationStyle, MathBackend, MessageRenderer};
pub use transcript::{Entry, Transcript};

/// Render a single message with the bundled engines and return the HTML of
/// its transcript entry.
///
/// # Example
///
/// ```rust
/// use docs_chat_widget::{render_message, Message, WidgetConfig};
///
/// let html = render_message(Message::user("# Hello"), &WidgetConfig::default());
/// assert!(html.starts_with(r#"<div class="msg you">"#));
/// ```
pub fn render_message(message: Message, config: &WidgetConfig) -> String {
    let renderer = MessageRenderer::from_config(config);
    let mut transcript = Transcript::new();
    renderer.render(message, &mut transcript).to_html()
}
