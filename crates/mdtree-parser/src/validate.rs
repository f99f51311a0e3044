//! Link destination filter.

use regex::Regex;
use std::sync::LazyLock;

/// Schemes that can run script or read local files.
static BAD_PROTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:vbscript|javascript|file|data):").unwrap());

/// Inline raster images are the only `data:` URLs let through.
static GOOD_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/(?:gif|png|jpeg|webp);").unwrap());

/// Whether a link or image destination may be emitted as `href`/`src`.
///
/// The check is case-insensitive and ignores surrounding whitespace.
///
/// ```
/// use mdtree_parser::validate::validate_link;
///
/// assert!(validate_link("https://example.com"));
/// assert!(!validate_link("JavaScript:alert(1)"));
/// assert!(validate_link("data:image/png;base64,AAAA"));
/// ```
pub fn validate_link(url: &str) -> bool {
    let url = url.trim().to_lowercase();
    !BAD_PROTO_RE.is_match(&url) || GOOD_DATA_RE.is_match(&url)
}
