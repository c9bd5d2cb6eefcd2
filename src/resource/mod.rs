//! List retrieval engine
//!
//! Turns caller filters into a complete, filtered list of gists.
//!
//! # Architecture
//!
//! - [`builder`] - Resolves the collection endpoint from scope filters
//! - [`pagination`] - Computes page URIs from the `Link` header
//! - [`fetcher`] - Concurrent page fan-out and raw content hydration
//! - [`filter`] - Filter types and the post-retrieval record filter
//!
//! # Example
//!
//! ```ignore
//! use gist_client::resource::{FilterSet, ListOptions, ScopeFilter};
//!
//! async fn rust_gists(client: &gist_client::GistClient) -> gist_client::Result<Vec<serde_json::Value>> {
//!     let filters = FilterSet::new().with(ScopeFilter::UserName("octocat".into()));
//!     client.get_all(&ListOptions::new(filters)).await
//! }
//! ```

pub mod builder;
pub mod fetcher;
pub mod filter;
pub mod pagination;

pub use builder::{Collection, RequestDescriptor, ResourceBuilder};
pub use fetcher::{fetch_all, fetch_list, hydrate, ListOptions};
pub use filter::{filter_records, ContentField, ContentFilter, Filter, FilterSet, ScopeFilter};
pub use pagination::{parse_link_header, remaining_pages, resolve_pages};
