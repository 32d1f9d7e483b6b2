// ABOUTME: HTTP Fetcher implementation backed by reqwest.
// ABOUTME: Reads the target url from the request config and forwards query params.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::QueryConfig;
use crate::error::FetchError;
use crate::fetch::traits::Fetcher;

/// Fetches JSON over HTTP.
///
/// The request config is expected to carry a `url` field. Relative urls are
/// joined onto the base url; absolute ones are used as-is. Opaque query
/// params are appended to the url percent-encoded. A `body` field in the
/// request config switches the call from GET to POST.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with no base url.
    ///
    /// Every request config must then carry absolute urls.
    pub fn new() -> Self {
        Self::with_base_url("")
    }

    /// Create a fetcher rooted at the given base url.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn build_url(&self, request: &Value, params: &serde_json::Map<String, Value>) -> Result<String, FetchError> {
        let url = request
            .get("url")
            .and_then(|u| u.as_str())
            .ok_or_else(|| {
                FetchError::Configuration("request config has no url".to_string())
            })?;

        let mut full = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if self.base_url.is_empty() {
            return Err(FetchError::Configuration(format!(
                "relative url {url} needs a base url"
            )));
        } else {
            format!("{}{}", self.base_url, url)
        };

        let mut first = !full.contains('?');
        for (key, value) in params {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            full.push(if first { '?' } else { '&' });
            first = false;
            full.push_str(&urlencoding::encode(key));
            full.push('=');
            full.push_str(&urlencoding::encode(&rendered));
        }

        Ok(full)
    }

    async fn fetch_value(&self, url: &str, body: Option<&Value>) -> Result<Value, FetchError> {
        let request = match body {
            Some(body) => self.http.post(url).json(body),
            None => self.http.get(url),
        };

        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher<Value> for HttpFetcher {
    async fn fetch(
        &self,
        query: &QueryConfig,
        request: Option<&Value>,
    ) -> Result<Value, anyhow::Error> {
        let request = request.ok_or_else(|| {
            FetchError::Configuration("http fetch needs a request config".to_string())
        })?;
        let url = self.build_url(request, &query.params)?;
        let value = self.fetch_value(&url, request.get("body")).await?;
        Ok(value)
    }
}
