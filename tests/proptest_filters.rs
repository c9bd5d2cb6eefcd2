//! Property-based tests using proptest
//!
//! These tests verify the record filter and the pagination resolver over
//! randomized gists and link headers.

use gist_client::resource::{filter_records, remaining_pages, resolve_pages};
use gist_client::{ContentField, ContentFilter, FilterSet, ScopeFilter};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate one file entry
fn arb_file() -> impl Strategy<Value = (String, Value)> {
    (
        "[a-z]{1,8}\\.(rs|js|py|md)",
        prop_oneof!["Rust", "JavaScript", "Java", "Python", "Markdown"],
        0u64..5000,
        any::<bool>(),
    )
        .prop_map(|(name, language, size, truncated)| {
            let file = json!({
                "filename": name,
                "language": language,
                "size": size,
                "type": "text/plain",
                "truncated": truncated
            });
            (name, file)
        })
}

/// Generate a gist with an id and zero or more files (sometimes no `files` at all)
fn arb_gist() -> impl Strategy<Value = Value> {
    (
        "[0-9a-f]{8}",
        prop::option::of(prop::collection::vec(arb_file(), 0..4)),
    )
        .prop_map(|(id, files)| match files {
            Some(files) => {
                let files: serde_json::Map<String, Value> = files.into_iter().collect();
                json!({ "id": id, "files": files })
            }
            None => json!({ "id": id }),
        })
}

fn arb_gist_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_gist(), 0..50)
}

fn arb_language_filter() -> impl Strategy<Value = ContentFilter> {
    prop_oneof!["Rust", "Java", "Script", "Py", "Go"]
        .prop_map(|lang| ContentFilter::new(ContentField::Language, &lang))
}

/// Position of each kept gist in the input; must be strictly increasing
fn positions(input: &[Value], kept: &[Value]) -> Vec<usize> {
    let mut from = 0;
    kept.iter()
        .filter_map(|k| {
            let pos = input[from..].iter().position(|r| r == k)? + from;
            from = pos + 1;
            Some(pos)
        })
        .collect()
}

proptest! {
    /// No filters returns all gists untouched
    #[test]
    fn empty_filter_returns_all(gists in arb_gist_list()) {
        let filtered = filter_records(gists.clone(), &FilterSet::new());
        prop_assert_eq!(filtered, gists);
    }

    /// Scope filters alone never drop anything
    #[test]
    fn scope_filters_are_not_applied_to_records(gists in arb_gist_list(), public in any::<bool>()) {
        let set = FilterSet::new().with(ScopeFilter::Public(public));
        let filtered = filter_records(gists.clone(), &set);
        prop_assert_eq!(filtered, gists);
    }

    /// Filtering never increases the number of gists
    #[test]
    fn filter_never_increases_count(gists in arb_gist_list(), filter in arb_language_filter()) {
        let set = FilterSet::new().with(filter);
        let filtered = filter_records(gists.clone(), &set);
        prop_assert!(filtered.len() <= gists.len());
    }

    /// Filtering is idempotent
    #[test]
    fn filter_is_idempotent(gists in arb_gist_list(), filter in arb_language_filter()) {
        let set = FilterSet::new().with(filter);
        let once = filter_records(gists, &set);
        let twice = filter_records(once.clone(), &set);
        prop_assert_eq!(once, twice);
    }

    /// Kept gists appear in their original relative order
    #[test]
    fn filter_preserves_order(gists in arb_gist_list(), filter in arb_language_filter()) {
        let set = FilterSet::new().with(filter);
        let kept = filter_records(gists.clone(), &set);
        let pos = positions(&gists, &kept);
        prop_assert_eq!(pos.len(), kept.len());
        prop_assert!(pos.windows(2).all(|w| w[0] < w[1]));
    }

    /// Every kept gist has a file whose language contains the pattern
    #[test]
    fn kept_gists_have_matching_file(gists in arb_gist_list(), lang in prop_oneof!["Rust", "Java", "Py"]) {
        let set = FilterSet::new().with(ContentFilter::new(ContentField::Language, &lang));
        for gist in filter_records(gists, &set) {
            let files = gist["files"].as_object().cloned().unwrap_or_default();
            prop_assert!(files.values().any(|f| f["language"].as_str().unwrap_or("").contains(lang.as_str())));
        }
    }

    /// Adding a filter can only narrow the result
    #[test]
    fn more_filters_narrow(gists in arb_gist_list(), a in arb_language_filter(), truncated in any::<bool>()) {
        let one = FilterSet::new().with(a.clone());
        let two = FilterSet::new()
            .with(a)
            .with(ContentFilter::new(ContentField::Truncated, &truncated.to_string()));
        let wide = filter_records(gists.clone(), &one);
        let narrow = filter_records(gists, &two);
        prop_assert!(narrow.iter().all(|g| wide.contains(g)));
    }
}

/// Tests for Link header page resolution
mod pagination_tests {
    use super::*;

    fn header(base: &str, pages: usize) -> String {
        format!(
            "<{base}?per_page=100&page=2>; rel=\"next\", <{base}?per_page=100&page={pages}>; rel=\"last\", <{base}?per_page=100&page=1>; rel=\"first\""
        )
    }

    proptest! {
        /// Plan size equals the last page number
        #[test]
        fn plan_has_last_page_count(pages in 1usize..200) {
            let plan = resolve_pages(Some(&header("https://api.github.com/gists", pages)));
            prop_assert_eq!(plan.len(), pages);
        }

        /// Page i of the plan ends with its own number
        #[test]
        fn plan_uris_are_numbered_in_order(pages in 1usize..60) {
            let plan = resolve_pages(Some(&header("https://api.github.com/gists", pages)));
            for (i, uri) in plan.iter().enumerate() {
                let suffix = format!("&page={}", i + 1);
                prop_assert!(uri.ends_with(&suffix));
            }
        }

        /// Page 1 is never re-requested
        #[test]
        fn remaining_never_contains_page_one(pages in 1usize..60) {
            let rest = remaining_pages(Some(&header("https://api.github.com/gists", pages)));
            prop_assert_eq!(rest.len(), pages - 1);
            prop_assert!(rest.iter().all(|u| !u.ends_with("&page=1")));
        }

        /// Arbitrary text never panics and at worst yields a single page
        #[test]
        fn arbitrary_header_does_not_panic(raw in ".*") {
            let _ = resolve_pages(Some(&raw));
        }
    }
}
