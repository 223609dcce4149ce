//! The newest-first sequence of rendered messages.

use std::collections::VecDeque;

use crate::clipboard::CopyControl;
use crate::dom::Element;
use crate::message::Message;

/// One rendered message.
#[derive(Debug, Clone)]
pub struct Entry {
    pub message: Message,
    /// The `div.msg` element as inserted into the transcript.
    pub root: Element,
    /// Copy controls, one per code block in document order.
    pub controls: Vec<CopyControl>,
}

impl Entry {
    pub fn new(message: Message, root: Element) -> Self {
        Self {
            message,
            root,
            controls: Vec::new(),
        }
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }
}

/// Rendered messages, most recent first. Entries are never removed or
/// reordered once inserted.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: VecDeque<Entry>,
    scroll_top: u32,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front and scroll back to the top.
    pub fn insert_front(&mut self, entry: Entry) -> &mut Entry {
        self.entries.push_front(entry);
        self.scroll_top = 0;
        &mut self.entries[0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry.
    pub fn front(&self) -> Option<&Entry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Entries front to back (newest first).
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.iter_mut()
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    /// Record the host's scroll position.
    pub fn set_scroll_top(&mut self, offset: u32) {
        self.scroll_top = offset;
    }

    pub fn to_html(&self) -> String {
        self.entries.iter().map(Entry::to_html).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn entry(text: &str) -> Entry {
        Entry::new(
            Message::user(text),
            Element::new("div").with_child(Node::text(text)),
        )
    }

    #[test]
    fn test_newest_first() {
        let mut transcript = Transcript::new();
        transcript.insert_front(entry("one"));
        transcript.insert_front(entry("two"));
        transcript.insert_front(entry("three"));

        let order: Vec<String> = transcript.iter().map(Entry::text_content).collect();
        assert_eq!(order, vec!["three", "two", "one"]);
        assert_eq!(transcript.to_html(), "<div>three</div><div>two</div><div>one</div>");
    }

    #[test]
    fn test_insert_resets_scroll() {
        let mut transcript = Transcript::new();
        transcript.insert_front(entry("one"));
        transcript.set_scroll_top(240);
        assert_eq!(transcript.scroll_top(), 240);
        transcript.insert_front(entry("two"));
        assert_eq!(transcript.scroll_top(), 0);
    }
}
