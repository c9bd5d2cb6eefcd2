//! Client library for the GitHub Gist API.
//!
//! Lists are assembled across every page of the collection, fetched
//! concurrently, optionally hydrated with raw file contents, then narrowed by
//! content filters.

pub mod config;
pub mod error;
pub mod gist;
pub mod resource;

pub use config::Config;
pub use error::{GistError, Result};
pub use gist::client::GistClient;
pub use gist::types::{GistUpdate, NewGist};
pub use resource::{ContentField, ContentFilter, FilterSet, ListOptions, ScopeFilter};
