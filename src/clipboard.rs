//! Clipboard access and the per-code-block copy control state.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Labels;
use crate::error::ClipboardError;

/// Handle to a temporary off-screen text area owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScratchId(pub u64);

/// Clipboard capability of the host page.
pub trait Clipboard {
    /// Whether the standard asynchronous clipboard path may be used.
    fn is_secure_context(&self) -> bool;

    /// Standard clipboard write.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Create an off-screen editable element holding `text`.
    fn create_scratch(&self, text: &str) -> Result<ScratchId, ClipboardError>;

    /// Focus and select the scratch element, then run the legacy copy command.
    fn copy_scratch(&self, scratch: ScratchId) -> Result<(), ClipboardError>;

    /// Detach the scratch element.
    fn remove_scratch(&self, scratch: ScratchId);
}

/// A scratch element that is removed when dropped.
pub struct ScratchArea<'a> {
    clipboard: &'a dyn Clipboard,
    id: ScratchId,
}

impl<'a> ScratchArea<'a> {
    pub fn acquire(clipboard: &'a dyn Clipboard, text: &str) -> Result<Self, ClipboardError> {
        let id = clipboard.create_scratch(text)?;
        Ok(Self { clipboard, id })
    }

    pub fn copy(&self) -> Result<(), ClipboardError> {
        self.clipboard.copy_scratch(self.id)
    }
}

impl Drop for ScratchArea<'_> {
    fn drop(&mut self) {
        self.clipboard.remove_scratch(self.id);
    }
}

/// Copy `text`, preferring the standard path and falling back to the legacy
/// copy command outside secure contexts.
pub fn copy_text(clipboard: Option<&dyn Clipboard>, text: &str) -> Result<(), ClipboardError> {
    let clipboard = clipboard.ok_or(ClipboardError::Unavailable)?;
    if clipboard.is_secure_context() {
        return clipboard.write_text(text);
    }

    debug!("insecure context, using legacy copy");
    let scratch = ScratchArea::acquire(clipboard, text)?;
    scratch.copy()
}

/// Display state of one copy control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Copied { until: Instant },
    Failed { until: Instant },
}

/// The copy control attached to one code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyControl {
    state: ButtonState,
}

impl Default for CopyControl {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyControl {
    pub fn new() -> Self {
        Self {
            state: ButtonState::Idle,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Record the result of a copy attempt made at `now`.
    pub fn record(&mut self, result: &Result<(), ClipboardError>, now: Instant, feedback: Duration) {
        let until = now + feedback;
        self.state = match result {
            Ok(()) => ButtonState::Copied { until },
            Err(_) => ButtonState::Failed { until },
        };
    }

    /// Revert to idle once the feedback has expired. Returns whether the
    /// state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            ButtonState::Copied { until } | ButtonState::Failed { until } if now >= until => {
                self.state = ButtonState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn label<'a>(&self, labels: &'a Labels) -> &'a str {
        match self.state {
            ButtonState::Idle => &labels.copy,
            ButtonState::Copied { .. } => &labels.copied,
            ButtonState::Failed { .. } => &labels.copy_failed,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self.state, ButtonState::Copied { .. })
    }
}
