//! Gist Client
//!
//! Main client for the Gist API, combining the token, the HTTP transport and
//! the list engine.
//!
//! The token is plain owned state. `set_token`/`unset_token` take `&mut self`,
//! so there is a single writer and no request can observe the change midway;
//! clone the client to share it across tasks.

use super::http::GistHttpClient;
use super::types::{GistUpdate, NewGist};
use crate::config::Config;
use crate::error::{GistError, Result};
use crate::resource::{fetch_list, ListOptions, ResourceBuilder};
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Main Gist client
#[derive(Clone)]
pub struct GistClient {
    http: GistHttpClient,
    builder: ResourceBuilder,
    token: Option<String>,
}

impl GistClient {
    /// Client against the public GitHub API with default settings
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    /// Client using the API root, page size and user agent from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = GistHttpClient::new(&config.effective_user_agent())?;
        Ok(Self {
            http,
            builder: ResourceBuilder::new(&config.effective_api_url(), config.effective_page_size()),
            token: None,
        })
    }

    /// Client against a custom API root (GitHub Enterprise, tests)
    pub fn with_api_url(api_url: &str) -> Result<Self> {
        let config = Config {
            api_url: Some(api_url.to_string()),
            ..Config::default()
        };
        Self::from_config(&config)
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.token = Some(token.into());
        self
    }

    pub fn unset_token(&mut self) -> &mut Self {
        self.token = None;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn require_token(&self) -> Result<&str> {
        self.token().ok_or(GistError::AuthRequired)
    }

    /// Build a gist URL from an id and optional trailing segments
    fn gist_url(&self, id: &str, rest: &[&str]) -> String {
        let mut path = format!("/gists/{}", urlencoding::encode(id));
        for segment in rest {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        self.builder.url(&path)
    }

    // =========================================================================
    // Single gists
    // =========================================================================

    /// Get a gist by id
    pub async fn get_one_by_id(&self, id: &str) -> Result<Value> {
        let token = self.require_token()?;
        let page = self.http.get(&self.gist_url(id, &[]), Some(token)).await?;
        Ok(page.body)
    }

    /// Get a gist at a specific revision
    pub async fn get_revision(&self, id: &str, sha: &str) -> Result<Value> {
        let token = self.require_token()?;
        let page = self.http.get(&self.gist_url(id, &[sha]), Some(token)).await?;
        Ok(page.body)
    }

    /// Create a gist
    pub async fn create(&self, gist: &NewGist) -> Result<Value> {
        let token = self.require_token()?;
        let body = serde_json::to_value(gist)?;
        let url = self.builder.url("/gists");
        let page = self.http.send(Method::POST, &url, Some(token), Some(&body)).await?;
        tracing::info!("created gist {}", page.body["id"]);
        Ok(page.body)
    }

    /// Edit description and files of a gist
    pub async fn update(&self, id: &str, update: &GistUpdate) -> Result<Value> {
        let token = self.require_token()?;
        let body = serde_json::to_value(update)?;
        let page = self
            .http
            .send(Method::PATCH, &self.gist_url(id, &[]), Some(token), Some(&body))
            .await?;
        Ok(page.body)
    }

    /// Delete a gist
    pub async fn delete(&self, id: &str) -> Result<()> {
        let token = self.require_token()?;
        self.http
            .send(Method::DELETE, &self.gist_url(id, &[]), Some(token), None)
            .await?;
        tracing::info!("deleted gist {}", id);
        Ok(())
    }

    /// Fork a gist into the authenticated account
    pub async fn fork(&self, id: &str) -> Result<Value> {
        let token = self.require_token()?;
        let page = self
            .http
            .send(Method::POST, &self.gist_url(id, &["forks"]), Some(token), None)
            .await?;
        Ok(page.body)
    }

    // =========================================================================
    // Stars
    // =========================================================================

    async fn star_request(&self, method: Method, id: &str) -> Result<bool> {
        let token = self.require_token()?;
        let url = self.gist_url(id, &["star"]);
        let status = self.http.probe(method, &url, Some(token)).await?;

        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            tracing::error!("star request failed: {} ({})", status, url);
            Err(GistError::Transport {
                status: status.as_u16(),
                url,
            })
        }
    }

    /// Star a gist. `false` when the gist does not exist.
    pub async fn star(&self, id: &str) -> Result<bool> {
        self.star_request(Method::PUT, id).await
    }

    /// Unstar a gist. `false` when the gist does not exist.
    pub async fn unstar(&self, id: &str) -> Result<bool> {
        self.star_request(Method::DELETE, id).await
    }

    /// Whether the authenticated user starred the gist (204 yes, 404 no)
    pub async fn is_starred(&self, id: &str) -> Result<bool> {
        self.star_request(Method::GET, id).await
    }

    // =========================================================================
    // Lists
    // =========================================================================

    async fn list(&self, sub_path: Option<&str>, options: &ListOptions) -> Result<Vec<Value>> {
        let request = self.builder.build(sub_path, &options.filter_by, self.has_token())?;
        fetch_list(&self.http, self.token(), &request, options).await
    }

    /// All gists of the selected collection, across every page
    pub async fn get_all(&self, options: &ListOptions) -> Result<Vec<Value>> {
        self.list(None, options).await
    }

    /// Revision history of a gist
    pub async fn list_commits(&self, id: &str, options: &ListOptions) -> Result<Vec<Value>> {
        let path = format!("/gists/{}/commits", urlencoding::encode(id));
        self.list(Some(&path), options).await
    }

    /// Forks of a gist
    pub async fn list_forks(&self, id: &str, options: &ListOptions) -> Result<Vec<Value>> {
        let path = format!("/gists/{}/forks", urlencoding::encode(id));
        self.list(Some(&path), options).await
    }
}
