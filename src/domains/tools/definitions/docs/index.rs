//! Documentation index parsing.
//!
//! The index page is either an `llms.txt`-style markdown list or an HTML page.
//! Entries are pulled from markdown links and `<a href>` anchors; this is
//! link extraction, not a general HTML parser.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").expect("valid regex"));

static HTML_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#).expect("valid regex")
});

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// One page listed in the documentation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub title: String,
    pub path: String,
}

impl DocEntry {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }
}

/// Extract index entries from `body`, in document order.
///
/// Links under `base_url` are made relative to it; links to other hosts,
/// fragments and non-http schemes are skipped. Duplicate paths keep the
/// first title seen.
pub fn parse_index(body: &str, base_url: &str) -> Vec<DocEntry> {
    let mut links: Vec<(usize, String, String)> = Vec::new();

    for caps in MARKDOWN_LINK.captures_iter(body) {
        let start = caps.get(0).map_or(0, |m| m.start());
        links.push((start, caps[1].to_string(), caps[2].to_string()));
    }
    for caps in HTML_ANCHOR.captures_iter(body) {
        let start = caps.get(0).map_or(0, |m| m.start());
        links.push((start, caps[2].to_string(), caps[1].to_string()));
    }
    links.sort_by_key(|(start, _, _)| *start);

    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter_map(|(_, title, href)| {
            let path = relative_path(&href, base_url)?;
            let title = clean_title(&title);
            if title.is_empty() || !seen.insert(path.clone()) {
                return None;
            }
            Some(DocEntry { title, path })
        })
        .collect()
}

fn relative_path(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    let base = base_url.trim_end_matches('/');

    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if let Some(rest) = href.strip_prefix(base) {
        if rest.is_empty() || rest.starts_with('/') {
            return Some(if rest.is_empty() { "/".to_string() } else { rest.to_string() });
        }
        return None;
    }
    if href.contains(':') {
        // Other hosts, mailto:, javascript: and friends.
        return None;
    }
    if href.starts_with('/') {
        Some(href.to_string())
    } else {
        Some(format!("/{}", href))
    }
}

fn clean_title(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://docs.example.com";

    #[test]
    fn test_markdown_index() {
        let body = "# Docs\n\n\
            - [Getting Started](https://docs.example.com/docs/getting-started.md): first steps\n\
            - [Architecture](https://docs.example.com/docs/architecture.md)\n\
            - [Elsewhere](https://other.example.org/page)\n";
        let entries = parse_index(body, BASE);
        assert_eq!(
            entries,
            vec![
                DocEntry::new("Getting Started", "/docs/getting-started.md"),
                DocEntry::new("Architecture", "/docs/architecture.md"),
            ]
        );
    }

    #[test]
    fn test_html_index() {
        let body = r##"<nav>
            <a class="nav" href="/guide/intro">Intro &amp; <b>Setup</b></a>
            <a href="#top">Top</a>
            <a href="mailto:team@example.com">Mail</a>
            <A HREF='tools/list.html'>
                Listing   tools
            </A>
        </nav>"##;
        let entries = parse_index(body, BASE);
        assert_eq!(
            entries,
            vec![
                DocEntry::new("Intro & Setup", "/guide/intro"),
                DocEntry::new("Listing tools", "/tools/list.html"),
            ]
        );
    }

    #[test]
    fn test_numeric_and_named_entities_decoded() {
        let body = r#"<a href="/a">It&#8217;s &mdash; Caf&eacute; &#x27;x&#x27;</a>
            <a href="/b">&lt;b&gt;&nbsp;literal</a>"#;
        let entries = parse_index(body, BASE);
        assert_eq!(entries[0].title, "It\u{2019}s \u{2014} Caf\u{e9} 'x'");
        assert_eq!(entries[1].title, "<b> literal");
    }

    #[test]
    fn test_duplicates_keep_first() {
        let body = "[One](/a) [Two](/a) [Three](/b)";
        let entries = parse_index(body, BASE);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "One");
    }

    #[test]
    fn test_base_prefix_must_end_at_segment() {
        let body = "[Lookalike](https://docs.example.com.evil.net/x)";
        assert!(parse_index(body, BASE).is_empty());
    }
}
