//! Gist API interaction module
//!
//! This module provides the core functionality for talking to the Gist API:
//! token handling, the HTTP transport, and the client operations.
//!
//! # Module Structure
//!
//! - [`auth`] - Token resolution from flags, environment and config
//! - [`client`] - Main Gist client (single gists, stars, lists)
//! - [`http`] - HTTP transport for REST API calls
//! - [`types`] - Request bodies for create and update
//!
//! # Example
//!
//! ```ignore
//! use gist_client::gist::client::GistClient;
//! use gist_client::resource::ListOptions;
//!
//! async fn example() -> gist_client::Result<()> {
//!     let mut client = GistClient::new()?;
//!     client.set_token("ghp_...");
//!     let gists = client.get_all(&ListOptions::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod types;
