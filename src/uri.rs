//! Page-relative link generation.
//!
//! Page identifiers are slash-separated paths without extension (`api/wallet`).
//! Links are relative to the page being rendered, the way a standalone HTML
//! build lays files out on disk.

use crate::registry::Target;

/// Path from `base` to `to`, both file URIs relative to the output root.
///
/// - common leading directories are dropped (never the file name)
/// - one `../` per directory remaining in `base`
/// - the same file yields an empty path
pub fn relative_uri(base: &str, to: &str) -> String {
    if to.starts_with('/') {
        return to.to_string();
    }
    let mut b: Vec<&str> = strip_fragment(base).split('/').collect();
    let mut t: Vec<&str> = strip_fragment(to).split('/').collect();

    let common = b[..b.len() - 1]
        .iter()
        .zip(&t[..t.len() - 1])
        .take_while(|(x, y)| x == y)
        .count();
    b.drain(..common);
    t.drain(..common);

    if b == t {
        return String::new();
    }
    if b.len() == 1 && t == [""] {
        return "./".to_string();
    }
    format!("{}{}", "../".repeat(b.len() - 1), t.join("/"))
}

fn strip_fragment(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(path, _)| path)
}

/// File URI of a page.
pub fn page_uri(page: &str, suffix: &str) -> String {
    format!("{page}{suffix}")
}

/// Link from `from_page` to a target's anchor.
pub fn target_link(from_page: &str, target: &Target, suffix: &str) -> String {
    format!(
        "{}#{}",
        relative_uri(&page_uri(from_page, suffix), &page_uri(&target.page, suffix)),
        target.anchor
    )
}
