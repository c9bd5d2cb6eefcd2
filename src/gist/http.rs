//! HTTP utilities for Gist REST API calls

use crate::error::{GistError, Result};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// One HTTP response: headers plus decoded JSON body.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Page {
    /// Raw `Link` header, if the server sent one
    pub fn link_header(&self) -> Option<&str> {
        self.headers.get(LINK).and_then(|v| v.to_str().ok())
    }

    /// Records carried by this page. A single object counts as one record.
    pub fn into_records(self) -> Vec<Value> {
        match self.body {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        }
    }
}

/// HTTP client wrapper for Gist API calls
#[derive(Clone)]
pub struct GistHttpClient {
    client: Client,
}

impl GistHttpClient {
    /// Create a new HTTP client
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, url).header(ACCEPT, GITHUB_JSON);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }
        request
    }

    /// Send a request and decode the JSON body. Non-2xx is a transport error.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Page> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.request(method, url, token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
            return Err(GistError::Transport {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Handle empty response (204 on delete, star, unstar)
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(Page {
            status,
            headers,
            body,
        })
    }

    /// Make a GET request to the Gist API
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Page> {
        self.send(Method::GET, url, token, None).await
    }

    /// Fetch a raw file body as text
    pub async fn get_text(&self, url: &str, token: Option<&str>) -> Result<String> {
        tracing::debug!("GET (raw) {}", url);

        let response = self.request(Method::GET, url, token).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!("Raw content error: {} - {}", status, sanitize_for_log(&text));
            return Err(GistError::Transport {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(text)
    }

    /// Send a request and hand back only the status, without treating
    /// non-2xx as failure. Network errors still propagate.
    pub async fn probe(&self, method: Method, url: &str, token: Option<&str>) -> Result<StatusCode> {
        tracing::debug!("{} {} (probe)", method, url);

        let mut request = self.request(method.clone(), url, token);
        if method == Method::PUT {
            // The star endpoint wants an explicit zero length
            request = request.header(reqwest::header::CONTENT_LENGTH, 0);
        }
        let response = request.send().await?;
        Ok(response.status())
    }
}
