//! Page fetching
//!
//! Blocking ureq agent with a single global timeout. No retries.

use std::time::Duration;

use scraper::Html;
use thiserror::Error;
use tracing::{info, warn};

/// Browser-like agent string; the recruiting site serves stripped pages to
/// unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("connection error fetching {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Raw markup of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub html: String,
}

impl Page {
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Anything that can turn a URL into page markup.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// Reject empty input and anything that is not an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<url::Url, FetchError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "URL must be a non-empty string".to_string(),
        });
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}

/// Blocking HTTP page fetcher.
pub struct PageFetcher {
    agent: ureq::Agent,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(config.timeout))
                .user_agent(config.user_agent.as_str())
                .http_status_as_error(false)
                .build(),
        );
        Self { agent }
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl PageSource for PageFetcher {
    fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let parsed = validate_url(url)?;
        let url = parsed.as_str().to_string();

        info!(%url, "fetching page");
        let resp = match self.agent.get(url.as_str()).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Timeout(_)) => return Err(FetchError::Timeout { url }),
            Err(source) => return Err(FetchError::Connection { url, source }),
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !content_type.contains("text/html") {
            warn!(%url, %content_type, "unexpected content type");
        }

        let html = match resp.into_body().read_to_string() {
            Ok(text) => text,
            Err(ureq::Error::Timeout(_)) => return Err(FetchError::Timeout { url }),
            Err(source) => return Err(FetchError::Body { url, source }),
        };

        Ok(Page { url, html })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_rejects_empty() {
        assert!(matches!(
            validate_url(""),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_url("   "),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_url_rejects_relative_and_foreign_schemes() {
        assert!(validate_url("/vacancy/123").is_err());
        assert!(validate_url("ftp://hh.ru/vacancy/123").is_err());
    }

    #[test]
    fn test_validate_url_accepts_http() {
        let url = validate_url(" https://hh.ru/vacancy/123 ").unwrap();
        assert_eq!(url.host_str(), Some("hh.ru"));
        assert_eq!(url.path(), "/vacancy/123");
    }

    #[test]
    fn test_invalid_url_fails_before_network() {
        let fetcher = PageFetcher::default();
        let err = fetcher.fetch("").unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_page_document() {
        let page = Page {
            url: "https://hh.ru/resume/1".to_string(),
            html: "<h1>Иван</h1>".to_string(),
        };
        let document = page.document();
        assert_eq!(document.root_element().text().collect::<String>(), "Иван");
    }
}
