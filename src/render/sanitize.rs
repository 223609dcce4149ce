//! HTML sanitization.

use std::collections::HashSet;

/// Filters an HTML string down to a safe subset.
pub trait HtmlSanitizer {
    fn sanitize(&self, html: &str) -> String;
}

/// Sanitizer backed by ammonia's allow-list.
pub struct AmmoniaSanitizer {
    builder: ammonia::Builder<'static>,
}

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        builder
            .add_tag_attributes("code", &["class"])
            .clean_content_tags(["script", "style"].into_iter().collect::<HashSet<_>>())
            .link_rel(Some("noopener noreferrer"));
        Self { builder }
    }
}

impl Default for AmmoniaSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

/// Sanitizer stage of the pipeline.
///
/// Without a sanitizer the HTML passes through unchanged. This is a
/// best-effort gap: raw HTML from the markdown engine reaches the page.
pub struct Sanitizer {
    inner: Option<Box<dyn HtmlSanitizer>>,
}

impl Sanitizer {
    pub fn new(inner: Option<Box<dyn HtmlSanitizer>>) -> Self {
        Self { inner }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    pub fn sanitize(&self, html: &str) -> String {
        match &self.inner {
            Some(sanitizer) => sanitizer.sanitize(html),
            None => html.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_and_handlers() {
        let clean = AmmoniaSanitizer::new()
            .sanitize(r#"<p onclick="x()">hi</p><script>alert(1)</script>"#);
        assert_eq!(clean, "<p>hi</p>");
    }

    #[test]
    fn test_keeps_code_language_class() {
        let clean = AmmoniaSanitizer::new()
            .sanitize(r#"<pre><code class="language-python">print(1)</code></pre>"#);
        assert!(clean.contains(r#"class="language-python""#));
    }

    #[test]
    fn test_links_get_rel() {
        let clean = AmmoniaSanitizer::new()
            .sanitize(r#"<a href="https://example.org">x</a><a href="javascript:alert(1)">y</a>"#);
        assert!(clean.contains(r#"rel="noopener noreferrer""#));
        assert!(!clean.contains("javascript:"));
    }

    #[test]
    fn test_absent_sanitizer_passes_through() {
        let sanitizer = Sanitizer::new(None);
        assert_eq!(sanitizer.sanitize("<script>x</script>"), "<script>x</script>");
    }
}
