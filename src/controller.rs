//! Single-flight request lifecycle.
//!
//! The controller owns the request state, the transcript and the input
//! surface. Everything runs on one thread: the backend call is the only
//! await point, and no `RefCell` borrow is held across it.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::{AskRequest, ChatBackend, HttpBackend};
use crate::config::WidgetConfig;
use crate::error::{ClipboardError, RequestError, Result};
use crate::message::Message;
use crate::render::{Capabilities, MessageRenderer};
use crate::transcript::Transcript;

/// Whether a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
}

/// The host's input and submit controls.
pub trait ChatSurface {
    /// Current content of the input control.
    fn input_value(&self) -> String;
    fn clear_input(&mut self);
    /// Enable or disable both the input and the submit control.
    fn set_controls_enabled(&mut self, enabled: bool);
    fn focus_input(&mut self);
}

/// In-memory surface for headless hosts and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub input: String,
    pub enabled: bool,
    pub focused: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            enabled: true,
            focused: false,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSurface for HeadlessSurface {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn focus_input(&mut self) {
        self.focused = true;
    }
}

/// Why an ask was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The question was blank after trimming.
    Empty,
    /// Another request is in flight.
    Pending,
    /// A key event that does not submit.
    NotSubmitKey,
}

/// What an ask ended in. Every accepted ask renders exactly one bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Ignored(IgnoreReason),
    Answered,
    HttpError(u16),
    Failed(String),
}

impl AskOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, AskOutcome::Ignored(_))
    }
}

/// Marks the controller pending for its lifetime.
///
/// Dropping the guard returns to idle and restores the controls, whether the
/// ask settled or its future was dropped. The surface must not be borrowed
/// while the guard is acquired or dropped; the controller never holds a
/// borrow across an await.
struct PendingGuard<'a, S: ChatSurface> {
    state: &'a Cell<RequestState>,
    surface: &'a RefCell<S>,
}

impl<'a, S: ChatSurface> PendingGuard<'a, S> {
    fn acquire(state: &'a Cell<RequestState>, surface: &'a RefCell<S>) -> Option<Self> {
        if state.get() == RequestState::Pending {
            return None;
        }
        state.set(RequestState::Pending);
        surface.borrow_mut().set_controls_enabled(false);
        Some(Self { state, surface })
    }
}

impl<S: ChatSurface> Drop for PendingGuard<'_, S> {
    fn drop(&mut self) {
        self.state.set(RequestState::Idle);
        let mut surface = self.surface.borrow_mut();
        surface.set_controls_enabled(true);
        surface.focus_input();
    }
}

/// Submits questions and renders their answers.
pub struct RequestController<B, S> {
    backend: B,
    renderer: MessageRenderer,
    surface: RefCell<S>,
    transcript: RefCell<Transcript>,
    state: Cell<RequestState>,
    timeout_s: Option<u32>,
    error_prefix: String,
}

impl<S: ChatSurface> RequestController<HttpBackend, S> {
    /// Controller talking to the configured HTTP endpoint.
    pub fn from_config(config: &WidgetConfig, surface: S, capabilities: Capabilities) -> Result<Self> {
        let backend = HttpBackend::from_config(config)?;
        let renderer = MessageRenderer::new(capabilities, config);
        Ok(Self::new(backend, surface, renderer, config))
    }
}

impl<B: ChatBackend, S: ChatSurface> RequestController<B, S> {
    pub fn new(backend: B, surface: S, renderer: MessageRenderer, config: &WidgetConfig) -> Self {
        Self {
            backend,
            renderer,
            surface: RefCell::new(surface),
            transcript: RefCell::new(Transcript::new()),
            state: Cell::new(RequestState::Idle),
            timeout_s: config.timeout_s,
            error_prefix: config.labels.error_prefix.clone(),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state.get()
    }

    pub fn transcript(&self) -> Ref<'_, Transcript> {
        self.transcript.borrow()
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    pub fn surface_mut(&self) -> RefMut<'_, S> {
        self.surface.borrow_mut()
    }

    pub fn renderer(&self) -> &MessageRenderer {
        &self.renderer
    }

    /// Ask `question`. Blank questions and asks made while another one is
    /// pending are ignored without touching the transcript or the backend.
    pub async fn ask(&self, question: &str) -> AskOutcome {
        let question = question.trim();
        if question.is_empty() {
            debug!("ignoring empty question");
            return AskOutcome::Ignored(IgnoreReason::Empty);
        }

        let Some(_guard) = PendingGuard::acquire(&self.state, &self.surface) else {
            debug!("request pending, ignoring ask");
            return AskOutcome::Ignored(IgnoreReason::Pending);
        };

        self.append(Message::user(question));
        self.surface.borrow_mut().clear_input();

        let request = AskRequest::new(question, self.timeout_s);
        debug!("asking backend");
        match self.backend.ask(&request).await {
            Ok(response) => {
                self.append(Message::assistant(response.answer, response.sources));
                AskOutcome::Answered
            }
            Err(RequestError::Status(code)) => {
                warn!("backend returned HTTP {}", code);
                self.append(Message::assistant(
                    format!("{}: {}", self.error_prefix, code),
                    Vec::new(),
                ));
                AskOutcome::HttpError(code)
            }
            Err(err) => {
                warn!("request failed: {}", err);
                let text = err.to_string();
                self.append(Message::assistant(text.as_str(), Vec::new()));
                AskOutcome::Failed(text)
            }
        }
    }

    /// Ask whatever the input control holds.
    pub async fn submit(&self) -> AskOutcome {
        let question = self.surface.borrow().input_value();
        self.ask(&question).await
    }

    /// Key press on the input control. Enter submits unless Shift is held.
    pub async fn handle_key(&self, key: &str, shift: bool) -> AskOutcome {
        if key == "Enter" && !shift {
            self.submit().await
        } else {
            AskOutcome::Ignored(IgnoreReason::NotSubmitKey)
        }
    }

    /// Activate the copy control of code block `block` in transcript entry
    /// `entry` (0 is the newest).
    pub fn copy_code(&self, entry: usize, block: usize, now: Instant) -> std::result::Result<(), ClipboardError> {
        let mut transcript = self.transcript.borrow_mut();
        let entry = transcript
            .get_mut(entry)
            .ok_or(ClipboardError::NoSuchEntry(entry))?;
        self.renderer.copy_code(entry, block, now)
    }

    /// Revert expired copy controls. Returns whether any label changed.
    pub fn tick(&self, now: Instant) -> bool {
        self.renderer.tick(&mut self.transcript.borrow_mut(), now)
    }

    fn append(&self, message: Message) {
        self.renderer.render(message, &mut self.transcript.borrow_mut());
    }
}
