//! Delimiter scanner for math in text nodes.

use nom::{
    bytes::complete::{is_not, tag, take_until},
    sequence::delimited,
    IResult,
};

/// A piece of a scanned text node.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Text(&'a str),
    Math {
        /// The expression between the delimiters.
        tex: &'a str,
        /// The expression including its delimiters.
        source: &'a str,
        display: bool,
    },
}

/// Parse display math (`$$...$$`).
fn display_math(input: &str) -> IResult<&str, &str> {
    delimited(tag("$$"), take_until("$$"), tag("$$"))(input)
}

/// Parse parenthesized inline math (`\(...\)`).
fn paren_math(input: &str) -> IResult<&str, &str> {
    delimited(tag("\\("), take_until("\\)"), tag("\\)"))(input)
}

/// Parse single-dollar inline math (`$...$`), no line breaks inside.
fn dollar_math(input: &str) -> IResult<&str, &str> {
    delimited(tag("$"), is_not("$\n"), tag("$"))(input)
}

fn try_math(input: &str, inline_dollar: bool) -> Option<(&str, &str, bool)> {
    if input.starts_with("$$") {
        return display_math(input).ok().map(|(rest, tex)| (rest, tex, true));
    }
    if input.starts_with("\\(") {
        return paren_math(input).ok().map(|(rest, tex)| (rest, tex, false));
    }
    if inline_dollar && input.starts_with('$') {
        return dollar_math(input).ok().map(|(rest, tex)| (rest, tex, false));
    }
    None
}

/// Split `text` into plain text and math segments.
///
/// Unclosed delimiters and blank expressions stay text.
pub fn scan(text: &str, inline_dollar: bool) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(|c: char| c == '$' || c == '\\') {
        let at = pos + offset;
        match try_math(&text[at..], inline_dollar) {
            Some((rest, tex, display)) if !tex.trim().is_empty() => {
                if plain_start < at {
                    segments.push(Segment::Text(&text[plain_start..at]));
                }
                let end = text.len() - rest.len();
                segments.push(Segment::Math {
                    tex,
                    source: &text[at..end],
                    display,
                });
                plain_start = end;
                pos = end;
            }
            _ => {
                // Skip the whole `$$` so its second dollar is not retried as `$`.
                pos = at + if text[at..].starts_with("$$") { 2 } else { 1 };
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(&text[plain_start..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_and_inline() {
        assert_eq!(
            scan(r"a $$x^2$$ b \(y\) c", false),
            vec![
                Segment::Text("a "),
                Segment::Math {
                    tex: "x^2",
                    source: "$$x^2$$",
                    display: true
                },
                Segment::Text(" b "),
                Segment::Math {
                    tex: "y",
                    source: r"\(y\)",
                    display: false
                },
                Segment::Text(" c"),
            ]
        );
    }

    #[test]
    fn test_unclosed_and_empty_stay_text() {
        assert_eq!(scan("price $$5", false), vec![Segment::Text("price $$5")]);
        assert_eq!(scan(r"\(x", false), vec![Segment::Text(r"\(x")]);
        assert_eq!(scan("$$  $$", false), vec![Segment::Text("$$  $$")]);
    }

    #[test]
    fn test_single_dollar() {
        assert_eq!(scan("$a$", false), vec![Segment::Text("$a$")]);
        assert_eq!(
            scan("$a$", true),
            vec![Segment::Math {
                tex: "a",
                source: "$a$",
                display: false
            }]
        );
    }

    #[test]
    fn test_other_backslashes_are_text() {
        assert_eq!(scan(r"C:\path \n", false), vec![Segment::Text(r"C:\path \n")]);
    }

    #[test]
    fn test_multibyte_text() {
        let segments = scan(r"Größe \(ä\) ✓", false);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], Segment::Text(" ✓"));
    }
}
