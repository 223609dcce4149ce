//! Syntax highlighting and copy controls for code blocks.

use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::clipboard::{copy_text, Clipboard, CopyControl};
use crate::config::Labels;
use crate::dom::{parse_fragment, Element, Node};
use crate::error::ClipboardError;
use crate::render::highlight::SyntaxHighlighter;
use crate::transcript::Entry;

const COPY_BUTTON_CLASS: &str = "copy-btn";
const COPIED_CLASS: &str = "copied";
const HIGHLIGHTED_ATTR: &str = "data-highlighted";

/// Attaches highlighting and a copy control to every `pre` block.
pub struct CodeBlockEnhancer {
    highlighter: Option<Box<dyn SyntaxHighlighter>>,
    labels: Labels,
    feedback: Duration,
}

impl CodeBlockEnhancer {
    pub fn new(
        highlighter: Option<Box<dyn SyntaxHighlighter>>,
        labels: Labels,
        feedback: Duration,
    ) -> Self {
        Self {
            highlighter,
            labels,
            feedback,
        }
    }

    /// Enhance all code blocks under `root`. Blocks that already carry a
    /// control or highlighting are left alone. Returns the number of copy
    /// controls under `root` afterwards.
    pub fn enhance(&self, root: &mut Element) -> usize {
        let mut count = 0;
        root.for_each_mut("pre", &mut |pre| {
            if let Some(highlighter) = &self.highlighter {
                highlight_block(highlighter.as_ref(), pre);
            }
            if find_button(pre).is_none() {
                pre.push(self.copy_button());
            }
            count += 1;
        });
        count
    }

    /// Enhance a transcript entry and size its control list to match.
    pub fn enhance_entry(&self, entry: &mut Entry) -> usize {
        let count = self.enhance(&mut entry.root);
        entry.controls.resize_with(count, CopyControl::new);
        count
    }

    /// Activate the copy control of the `block`-th code block of `entry`.
    ///
    /// Failures only change the control label; they are returned for callers
    /// that want them but need not be handled.
    pub fn activate(
        &self,
        entry: &mut Entry,
        block: usize,
        clipboard: Option<&dyn Clipboard>,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        let text = {
            let pres = entry.root.find_all("pre");
            let pre = pres.get(block).ok_or(ClipboardError::NoSuchBlock(block))?;
            code_text(pre)
        };
        let control = entry
            .controls
            .get_mut(block)
            .ok_or(ClipboardError::NoSuchBlock(block))?;

        let result = copy_text(clipboard, &text);
        if let Err(err) = &result {
            error!("Copy failed: {}", err);
        }
        control.record(&result, now, self.feedback);
        self.sync(entry);
        result
    }

    /// Revert expired controls of `entry`. Returns whether anything changed.
    pub fn refresh(&self, entry: &mut Entry, now: Instant) -> bool {
        let mut changed = false;
        for control in &mut entry.controls {
            changed |= control.tick(now);
        }
        if changed {
            self.sync(entry);
        }
        changed
    }

    /// Write control states into their button elements.
    fn sync(&self, entry: &mut Entry) {
        let controls = &entry.controls;
        let mut index = 0;
        entry.root.for_each_mut("pre", &mut |pre| {
            if let (Some(control), Some(button)) = (controls.get(index), find_button_mut(pre)) {
                button.set_text(control.label(&self.labels));
                if control.is_copied() {
                    button.add_class(COPIED_CLASS);
                } else {
                    button.remove_class(COPIED_CLASS);
                }
            }
            index += 1;
        });
    }

    fn copy_button(&self) -> Element {
        Element::new("button")
            .with_attr("type", "button")
            .with_attr("class", COPY_BUTTON_CLASS)
            .with_attr("aria-label", self.labels.copy_aria.as_str())
            .with_child(Node::text(self.labels.copy.as_str()))
    }
}

fn is_copy_button(el: &Element) -> bool {
    el.tag == "button" && el.has_class(COPY_BUTTON_CLASS)
}

fn find_button(pre: &Element) -> Option<&Element> {
    pre.child_elements().find(|el| is_copy_button(el))
}

fn find_button_mut(pre: &mut Element) -> Option<&mut Element> {
    pre.child_elements_mut().find(|el| is_copy_button(el))
}

/// Text to copy: the `code` element if present, else the block without its control.
fn code_text(pre: &Element) -> String {
    if let Some(code) = pre.find("code") {
        return code.text_content();
    }
    pre.children
        .iter()
        .filter(|node| !matches!(node, Node::Element(el) if is_copy_button(el)))
        .map(|node| match node {
            Node::Element(el) => el.text_content(),
            Node::Text(t) => t.clone(),
        })
        .collect()
}

fn highlight_block(highlighter: &dyn SyntaxHighlighter, pre: &mut Element) {
    let Some(code) = pre.child_elements_mut().find(|el| el.tag == "code") else {
        return;
    };
    if code.attr(HIGHLIGHTED_ATTR).is_some() {
        return;
    }

    let language = code
        .classes()
        .find_map(|c| c.strip_prefix("language-"))
        .map(str::to_string);
    let source = code.text_content();

    match highlighter.highlight(&source, language.as_deref()) {
        Ok(html) => {
            code.children = parse_fragment(&html);
            code.add_class("hljs");
            code.set_attr(HIGHLIGHTED_ATTR, "yes");
        }
        Err(err) => debug!("highlighting skipped: {}", err),
    }
}
