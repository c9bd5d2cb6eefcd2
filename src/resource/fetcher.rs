//! Resource Fetcher
//!
//! Assembles a complete list from a paginated collection and optionally
//! inlines raw file contents.

use super::builder::RequestDescriptor;
use super::filter::{filter_records, FilterSet};
use super::pagination::remaining_pages;
use crate::error::Result;
use crate::gist::http::{GistHttpClient, Page};
use futures::future::try_join_all;
use serde_json::Value;

/// Options for a list operation
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter_by: FilterSet,
    /// Replace each file's `raw_url` reference with its fetched body
    pub raw_content: bool,
}

impl ListOptions {
    pub fn new(filter_by: FilterSet) -> Self {
        Self {
            filter_by,
            raw_content: false,
        }
    }

    pub fn with_raw_content(mut self, raw_content: bool) -> Self {
        self.raw_content = raw_content;
        self
    }
}

/// Fetch pages 2..N concurrently and append them to page 1 in page order.
///
/// The first failing page fails the whole list; nothing partial comes back.
pub async fn fetch_all(
    http: &GistHttpClient,
    token: Option<&str>,
    first_page: Page,
) -> Result<Vec<Value>> {
    let rest = remaining_pages(first_page.link_header());
    let mut records = first_page.into_records();

    if rest.is_empty() {
        return Ok(records);
    }

    tracing::debug!("fetching {} more pages", rest.len());

    // try_join_all yields results in input order whatever the completion order
    let pages = try_join_all(rest.iter().map(|uri| http.get(uri, token))).await?;
    for page in pages {
        records.extend(page.into_records());
    }

    Ok(records)
}

/// Inline the body behind every file's `raw_url` as its `content`.
///
/// Fetches run one after another in gist then file order. Any failure aborts
/// the batch and the partially hydrated list is dropped.
pub async fn hydrate(
    http: &GistHttpClient,
    token: Option<&str>,
    mut records: Vec<Value>,
) -> Result<Vec<Value>> {
    let mut fetched = 0usize;

    for record in records.iter_mut() {
        let Some(files) = record.get_mut("files").and_then(|f| f.as_object_mut()) else {
            continue;
        };

        for file in files.values_mut() {
            let Some(raw_url) = file.get("raw_url").and_then(|u| u.as_str()).map(String::from) else {
                continue;
            };
            let content = http.get_text(&raw_url, token).await?;
            if let Value::Object(map) = file {
                map.insert("content".to_string(), Value::String(content));
                fetched += 1;
            }
        }
    }

    tracing::debug!("hydrated {} files", fetched);
    Ok(records)
}

/// Run a full list operation: first page, fan-out, hydration, filtering
pub async fn fetch_list(
    http: &GistHttpClient,
    token: Option<&str>,
    request: &RequestDescriptor,
    options: &ListOptions,
) -> Result<Vec<Value>> {
    let first_page = http.send(request.method.clone(), &request.url, token, None).await?;
    let mut records = fetch_all(http, token, first_page).await?;
    let total = records.len();

    if options.raw_content {
        records = hydrate(http, token, records).await?;
    }

    let records = filter_records(records, &options.filter_by);

    tracing::info!(
        "listed {} gists from {} ({} after filtering)",
        total,
        request.collection.path(),
        records.len()
    );

    Ok(records)
}
