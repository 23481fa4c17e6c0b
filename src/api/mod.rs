pub mod tweets;
pub mod types;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("API error (status {status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

/// Longest slice of a response body carried in an error message.
const MAX_DETAIL_CHARS: usize = 160;

/// Collapse whitespace and cut a response body down to something that fits
/// in a one-line notification.
fn summarize_body(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}\u{2026}", &collapsed[..cut]),
        None => collapsed,
    }
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

/// HTTP client for the feed service.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http_client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl FeedClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiClientError> {
        // A trailing slash keeps `Url::join` from replacing the last segment.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full API URL from a relative path (e.g. "tweets/123").
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiClientError> {
        tracing::debug!(%url, "GET");
        let resp = self.authorize(self.http_client.get(url)).send().await?;
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str::<T>(&body)
            .map_err(|e| ApiClientError::Deserialize(format!("{e}: {}", summarize_body(&body))))
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), ApiClientError> {
        tracing::debug!(%url, "DELETE");
        let resp = self.authorize(self.http_client.delete(url)).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn check_status(resp: Response) -> Result<Response, ApiClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiClientError::Api {
            status: status.as_u16(),
            detail: summarize_body(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_under_base_path() {
        let client = FeedClient::new("http://localhost:3000/api", None).unwrap();
        assert_eq!(
            client.url("tweets/t1").unwrap().as_str(),
            "http://localhost:3000/api/tweets/t1"
        );
        assert_eq!(
            client.url("/tweets").unwrap().as_str(),
            "http://localhost:3000/api/tweets"
        );
    }

    #[test]
    fn error_detail_is_short_and_single_line() {
        assert_eq!(summarize_body("  not\n found \n"), "not found");

        let page = format!("<html>\n<body>{}</body>\n</html>", "x".repeat(5_000));
        let detail = summarize_body(&page);
        assert_eq!(detail.chars().count(), MAX_DETAIL_CHARS + 1);
        assert!(detail.ends_with('\u{2026}'));
        assert!(!detail.contains('\n'));

        let err = ApiClientError::Api {
            status: 502,
            detail,
        };
        assert!(err.to_string().len() < 400);
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            FeedClient::new("not a url", None),
            Err(ApiClientError::BaseUrl(_))
        ));
    }
}
