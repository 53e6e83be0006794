//! Presentation transform for message text: find URL-shaped substrings so the
//! renderer can style them as links. The message content itself is untouched.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySpan<'a> {
    Text(&'a str),
    Link(&'a str),
}

impl<'a> DisplaySpan<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            DisplaySpan::Text(s) | DisplaySpan::Link(s) => s,
        }
    }
}

/// Split `content` into plain and link spans, in order. Joining every span's
/// text gives back `content` exactly.
pub fn format_for_display(content: &str) -> Vec<DisplaySpan<'_>> {
    let mut spans = Vec::new();
    let mut last = 0;
    for m in URL_PATTERN.find_iter(content) {
        if m.start() > last {
            spans.push(DisplaySpan::Text(&content[last..m.start()]));
        }
        spans.push(DisplaySpan::Link(m.as_str()));
        last = m.end();
    }
    if last < content.len() {
        spans.push(DisplaySpan::Text(&content[last..]));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_single_span() {
        assert_eq!(format_for_display("just text"), vec![DisplaySpan::Text("just text")]);
    }

    #[test]
    fn test_empty_content_has_no_spans() {
        assert!(format_for_display("").is_empty());
    }

    #[test]
    fn test_link_in_the_middle() {
        let spans = format_for_display("Join karo: https://courses.chaicode.com/learn now");
        assert_eq!(
            spans,
            vec![
                DisplaySpan::Text("Join karo: "),
                DisplaySpan::Link("https://courses.chaicode.com/learn"),
                DisplaySpan::Text(" now"),
            ]
        );
    }

    #[test]
    fn test_multiple_links_and_http() {
        let spans = format_for_display("http://a.dev https://b.dev/x?y=1");
        assert_eq!(
            spans,
            vec![
                DisplaySpan::Link("http://a.dev"),
                DisplaySpan::Text(" "),
                DisplaySpan::Link("https://b.dev/x?y=1"),
            ]
        );
    }

    #[test]
    fn test_spans_rejoin_to_original() {
        let content = "Dekho ☕ https://x.io/a\nthen ftp://not-a-link and https://y.io";
        let joined: String = format_for_display(content).iter().map(|s| s.as_str()).collect();
        assert_eq!(joined, content);
    }
}
