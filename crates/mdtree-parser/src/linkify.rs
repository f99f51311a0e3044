//! Linkify pass: bare URLs and e-mail addresses in text become links.

use log::trace;
use mdtree_core::Token;
use regex::Regex;
use std::sync::LazyLock;

/// Bare `http(s)://` and `www.` URLs, and e-mail addresses. Trailing
/// punctuation is left out of the match.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:https?://|www\.)[^\s<>]*[^\s<>.,;:!?'")\]]|\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b"#,
    )
    .unwrap()
});

/// Rewrite the children of one `inline` token in place.
///
/// Text inside existing links is left alone.
pub fn apply(children: &mut Vec<Token>) {
    let mut out = Vec::with_capacity(children.len());
    let mut link_depth = 0usize;

    for token in children.drain(..) {
        match token.ty.as_str() {
            "link_open" => link_depth += 1,
            "link_close" => link_depth = link_depth.saturating_sub(1),
            "text" if link_depth == 0 && LINK_RE.is_match(&token.content) => {
                split_text(&token, &mut out);
                continue;
            }
            _ => {}
        }
        out.push(token);
    }

    *children = out;
}

fn split_text(token: &Token, out: &mut Vec<Token>) {
    let text = &token.content;
    let level = token.level;
    let mut last = 0;

    for found in LINK_RE.find_iter(text) {
        if found.start() > last {
            out.push(text_token(&text[last..found.start()], level));
        }

        let label = found.as_str();
        trace!("linkify {}", label);
        out.push(
            Token::open("link", "a")
                .with_attr("href", normalize_href(label))
                .with_markup("linkify")
                .with_info("auto")
                .with_level(level),
        );
        out.push(text_token(label, level + 1));
        out.push(
            Token::close("link", "a")
                .with_markup("linkify")
                .with_info("auto")
                .with_level(level),
        );
        last = found.end();
    }

    if last < text.len() {
        out.push(text_token(&text[last..], level));
    }
}

fn text_token(content: &str, level: u32) -> Token {
    Token::text(content).with_level(level)
}

/// Add the scheme a bare match implies.
fn normalize_href(label: &str) -> String {
    let lower = label.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        label.to_string()
    } else if lower.starts_with("www.") {
        format!("http://{}", label)
    } else {
        format!("mailto:{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.ty.as_str()).collect()
    }

    #[test]
    fn test_bare_url() {
        let mut children = vec![Token::text("go to https://example.com/a?b=1.")];
        apply(&mut children);
        assert_eq!(
            types(&children),
            ["text", "link_open", "text", "link_close", "text"]
        );
        assert_eq!(children[0].content, "go to ");
        assert_eq!(
            children[1].attr_get("href").and_then(|v| v.as_str()),
            Some("https://example.com/a?b=1")
        );
        assert_eq!(children[1].markup, "linkify");
        assert_eq!(children[1].info, "auto");
        assert_eq!(children[2].level, 1);
        assert_eq!(children[4].content, ".");
    }

    #[test]
    fn test_www_and_email() {
        let mut children = vec![Token::text("www.rust-lang.org or me@example.org")];
        apply(&mut children);
        let hrefs: Vec<_> = children
            .iter()
            .filter_map(|t| t.attr_get("href").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(
            hrefs,
            ["http://www.rust-lang.org", "mailto:me@example.org"]
        );
    }

    #[test]
    fn test_skips_existing_links() {
        let mut children = vec![
            Token::open("link", "a").with_attr("href", "https://a.io"),
            Token::text("https://a.io").with_level(1),
            Token::close("link", "a"),
        ];
        let before = children.clone();
        apply(&mut children);
        assert_eq!(children, before);
    }

    #[test]
    fn test_plain_text_untouched() {
        let mut children = vec![Token::text("nothing here"), Token::leaf("softbreak", "br")];
        let before = children.clone();
        apply(&mut children);
        assert_eq!(children, before);
    }
}
