//! Link header pagination
//!
//! The API advertises pages through an RFC 8288 style `Link` header:
//!
//! ```text
//! <https://api.github.com/gists?per_page=100&page=2>; rel="next",
//! <https://api.github.com/gists?per_page=100&page=3>; rel="last",
//! <https://api.github.com/gists?per_page=100&page=1>; rel="first"
//! ```
//!
//! The page count is the trailing number of the `last` URI, and every page URI
//! is the `first` URI with its trailing number replaced. Anything malformed
//! degrades to a single page.

use std::collections::HashMap;

/// Largest page count accepted from a `last` link
pub const MAX_PAGES: usize = 10_000;

/// Parse a `Link` header into `rel -> uri`
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();

    for part in header.split(',') {
        let mut segments = part.split(';');
        let Some(target) = segments.next().map(str::trim) else {
            continue;
        };
        let Some(uri) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
            continue;
        };

        for param in segments {
            let param = param.trim();
            if let Some(rel) = param.strip_prefix("rel=") {
                let rel = rel.trim_matches('"');
                // A single link may carry several space separated relations
                for name in rel.split_whitespace() {
                    links.insert(name.to_string(), uri.to_string());
                }
            }
        }
    }

    links
}

/// Trailing page number of a URI, e.g. `...&page=12` -> 12
fn trailing_page_index(uri: &str) -> Option<usize> {
    let digits_start = uri.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    uri[digits_start..].parse().ok()
}

/// Replace the trailing page number of `template` with `page`
fn with_page_index(template: &str, page: usize) -> Option<String> {
    let prefix = template.trim_end_matches(|c: char| c.is_ascii_digit());
    if prefix.len() == template.len() {
        return None;
    }
    Some(format!("{}{}", prefix, page))
}

/// Every page URI advertised by the header, page 1 first.
///
/// Returns an empty plan when the header is missing, lacks `first` or
/// `last`, either URI has no trailing page number, or the page count is
/// above [`MAX_PAGES`].
pub fn resolve_pages(link_header: Option<&str>) -> Vec<String> {
    let Some(header) = link_header else {
        return Vec::new();
    };

    let links = parse_link_header(header);
    let (Some(first), Some(last)) = (links.get("first"), links.get("last")) else {
        tracing::debug!("Link header without first/last relations, treating as single page");
        return Vec::new();
    };

    let Some(page_count) = trailing_page_index(last) else {
        tracing::warn!("Malformed last link {:?}, treating as single page", last);
        return Vec::new();
    };

    if page_count > MAX_PAGES {
        tracing::warn!("Link header claims {} pages (max {}), treating as single page", page_count, MAX_PAGES);
        return Vec::new();
    }

    (1..=page_count)
        .map(|page| with_page_index(first, page))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_else(|| {
            tracing::warn!("Malformed first link {:?}, treating as single page", first);
            Vec::new()
        })
}

/// Pages still to fetch once page 1 is in hand
pub fn remaining_pages(link_header: Option<&str>) -> Vec<String> {
    resolve_pages(link_header).into_iter().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.github.com/users/octocat/gists?per_page=100";

    fn header(last: usize) -> String {
        format!(
            "<{BASE}&page=2>; rel=\"next\", <{BASE}&page={last}>; rel=\"last\", <{BASE}&page=1>; rel=\"first\""
        )
    }

    #[test]
    fn parses_relations() {
        let links = parse_link_header(&header(3));
        assert_eq!(links.len(), 3);
        assert_eq!(links["last"], format!("{BASE}&page=3"));
        assert_eq!(links["first"], format!("{BASE}&page=1"));
    }

    #[test]
    fn resolves_all_pages_from_first_template() {
        let pages = resolve_pages(Some(&header(3)));
        assert_eq!(
            pages,
            vec![
                format!("{BASE}&page=1"),
                format!("{BASE}&page=2"),
                format!("{BASE}&page=3"),
            ]
        );
    }

    #[test]
    fn remaining_skips_page_one() {
        let pages = remaining_pages(Some(&header(3)));
        assert_eq!(pages, vec![format!("{BASE}&page=2"), format!("{BASE}&page=3")]);
    }

    #[test]
    fn multi_digit_page_counts() {
        let pages = resolve_pages(Some(&header(12)));
        assert_eq!(pages.len(), 12);
        assert_eq!(pages[11], format!("{BASE}&page=12"));
    }

    #[test]
    fn missing_header_is_single_page() {
        assert!(resolve_pages(None).is_empty());
        assert!(remaining_pages(None).is_empty());
    }

    #[test]
    fn single_page_header_has_nothing_remaining() {
        let h = format!("<{BASE}&page=1>; rel=\"first\", <{BASE}&page=1>; rel=\"last\"");
        assert_eq!(resolve_pages(Some(&h)).len(), 1);
        assert!(remaining_pages(Some(&h)).is_empty());
    }

    #[test]
    fn missing_last_relation_is_single_page() {
        let h = format!("<{BASE}&page=2>; rel=\"next\"");
        assert!(resolve_pages(Some(&h)).is_empty());
    }

    #[test]
    fn last_without_trailing_digits_is_single_page() {
        let h = format!("<{BASE}&page=1>; rel=\"first\", <{BASE}&page=end>; rel=\"last\"");
        assert!(resolve_pages(Some(&h)).is_empty());
    }

    #[test]
    fn first_without_trailing_digits_is_single_page() {
        let h = format!("<{BASE}&page=one>; rel=\"first\", <{BASE}&page=4>; rel=\"last\"");
        assert!(resolve_pages(Some(&h)).is_empty());
    }

    #[test]
    fn page_count_above_cap_is_single_page() {
        let h = format!("<{BASE}&page=1>; rel=\"first\", <{BASE}&page=99999999999>; rel=\"last\"");
        assert!(resolve_pages(Some(&h)).is_empty());

        assert_eq!(resolve_pages(Some(&header(MAX_PAGES))).len(), MAX_PAGES);
    }

    #[test]
    fn garbage_header_is_single_page() {
        assert!(resolve_pages(Some("not a link header")).is_empty());
        assert!(resolve_pages(Some("")).is_empty());
    }
}
