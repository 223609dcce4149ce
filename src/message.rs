//! Chat messages and the source records attached to answers.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// CSS class used for the transcript entry.
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "bot",
        }
    }

    /// Parse a role name as used by hosts ("user"/"you", "assistant"/"bot").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" | "you" => Some(Role::User),
            "assistant" | "bot" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// A reference record supporting an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Source {
    pub fn new(title: Option<&str>, url: Option<&str>) -> Self {
        Self {
            title: title.map(String::from),
            url: url.map(String::from),
        }
    }

    /// Title if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// URL if present and non-empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Visible label: title, else url, else `fallback`.
    pub fn label<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title().or_else(|| self.url()).unwrap_or(fallback)
    }
}

/// One logical message of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub raw_text: String,
    pub sources: Vec<Source>,
}

impl Message {
    pub fn new(role: Role, raw_text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            role,
            raw_text: raw_text.into(),
            sources,
        }
    }

    pub fn user(raw_text: impl Into<String>) -> Self {
        Self::new(Role::User, raw_text, Vec::new())
    }

    pub fn assistant(raw_text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self::new(Role::Assistant, raw_text, sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_title_then_url() {
        let both = Source::new(Some("Guide"), Some("https://example.org"));
        let url_only = Source::new(None, Some("https://example.org"));
        let empty_title = Source::new(Some(""), Some("https://example.org"));
        let none = Source::default();

        assert_eq!(both.label("Quelle"), "Guide");
        assert_eq!(url_only.label("Quelle"), "https://example.org");
        assert_eq!(empty_title.label("Quelle"), "https://example.org");
        assert_eq!(none.label("Quelle"), "Quelle");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("bot"), Some(Role::Assistant));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("system"), None);
        assert_eq!(Role::User.css_class(), "you");
    }
}
