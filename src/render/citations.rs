//! Reference lists for answer sources.

use serde::Deserialize;
use url::Url;

use crate::dom::{Element, Node};
use crate::message::Source;

/// Schemes a source link may point to; anything else becomes `#`.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// How answer sources are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// Ordered list, labels prefixed with `[n] `.
    #[default]
    Numbered,
    /// Unordered list with bare link text.
    Plain,
    /// Sources are dropped.
    Hidden,
}

/// Builds the reference list appended below an answer.
#[derive(Debug, Clone)]
pub struct CitationListBuilder {
    style: CitationStyle,
    fallback_label: String,
}

impl CitationListBuilder {
    pub fn new(style: CitationStyle, fallback_label: impl Into<String>) -> Self {
        Self {
            style,
            fallback_label: fallback_label.into(),
        }
    }

    pub fn style(&self) -> CitationStyle {
        self.style
    }

    /// Build the list, or `None` if there is nothing to show.
    pub fn build(&self, sources: &[Source]) -> Option<Element> {
        if sources.is_empty() {
            return None;
        }

        let tag = match self.style {
            CitationStyle::Numbered => "ol",
            CitationStyle::Plain => "ul",
            CitationStyle::Hidden => return None,
        };

        let mut list = Element::new(tag).with_attr("class", "sources");
        for (i, source) in sources.iter().enumerate() {
            list.push(Element::new("li").with_child(self.link(i + 1, source)));
        }
        Some(list)
    }

    fn link(&self, index: usize, source: &Source) -> Element {
        let label = source.label(&self.fallback_label);
        let text = match self.style {
            CitationStyle::Numbered => format!("[{}] {}", index, label),
            _ => label.to_string(),
        };

        Element::new("a")
            .with_attr("href", safe_href(source.url()))
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer")
            .with_child(Node::text(text))
    }
}

/// Link target for a source url; relative urls are kept, unsafe schemes are not.
fn safe_href(url: Option<&str>) -> String {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return "#".to_string();
    };

    match Url::parse(url) {
        Ok(parsed) if ALLOWED_SCHEMES.contains(&parsed.scheme()) => url.to_string(),
        Ok(_) => "#".to_string(),
        // Relative reference, or a scheme-looking prefix the parser rejected.
        Err(_) if url.contains(':') && !url.starts_with('/') => "#".to_string(),
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sources() -> Vec<Source> {
        vec![
            Source::new(Some("A"), Some("https://a.example")),
            Source::new(Some("B"), None),
        ]
    }

    #[test]
    fn test_numbering_matches_input_order() {
        let list = CitationListBuilder::new(CitationStyle::Numbered, "Quelle")
            .build(&sources())
            .unwrap();
        let labels: Vec<String> = list.find_all("a").iter().map(|a| a.text_content()).collect();
        assert_eq!(labels, vec!["[1] A", "[2] B"]);
        assert_eq!(list.tag, "ol");
    }

    #[test]
    fn test_link_attributes() {
        let list = CitationListBuilder::new(CitationStyle::Numbered, "Quelle")
            .build(&sources())
            .unwrap();
        let links = list.find_all("a");
        assert_eq!(links[0].attr("href"), Some("https://a.example"));
        assert_eq!(links[1].attr("href"), Some("#"));
        assert_eq!(links[0].attr("target"), Some("_blank"));
        assert_eq!(links[0].attr("rel"), Some("noopener noreferrer"));
    }

    #[test]
    fn test_fallback_label() {
        let list = CitationListBuilder::new(CitationStyle::Numbered, "Source")
            .build(&[Source::default()])
            .unwrap();
        assert_eq!(list.text_content(), "[1] Source");
    }

    #[test]
    fn test_plain_style() {
        let list = CitationListBuilder::new(CitationStyle::Plain, "Quelle")
            .build(&sources())
            .unwrap();
        assert_eq!(list.tag, "ul");
        assert_eq!(list.find("a").unwrap().text_content(), "A");
    }

    #[test]
    fn test_hidden_and_empty() {
        let hidden = CitationListBuilder::new(CitationStyle::Hidden, "Quelle");
        assert!(hidden.build(&sources()).is_none());
        let numbered = CitationListBuilder::new(CitationStyle::Numbered, "Quelle");
        assert!(numbered.build(&[]).is_none());
    }

    #[test]
    fn test_unsafe_schemes_rejected() {
        assert_eq!(safe_href(Some("javascript:alert(1)")), "#");
        assert_eq!(safe_href(Some("data:text/html,x")), "#");
        assert_eq!(safe_href(Some("/docs/page")), "/docs/page");
        assert_eq!(safe_href(Some("mailto:a@b.c")), "mailto:a@b.c");
    }

    #[test]
    fn test_label_text_is_escaped() {
        let list = CitationListBuilder::new(CitationStyle::Numbered, "Quelle")
            .build(&[Source::new(Some("<b>x</b>"), None)])
            .unwrap();
        assert!(list.to_html().contains("[1] &lt;b&gt;x&lt;/b&gt;"));
    }
}
