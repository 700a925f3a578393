//! HTTP client for a storefront's public pages.

mod origin;

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;

use crate::error::ScraperError;
use crate::page::{FetchedPage, PageOutcome, PageRequest};

pub use origin::{extract_store_origin, normalize_store_url, resolve_url};
pub(crate) use origin::bare_host;

/// A successful response body and the headers the pipeline cares about.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub link_header: Option<String>,
}

/// Fetches storefront pages with a fixed timeout and `User-Agent`.
///
/// Failures are never retried: a non-2xx status or network error becomes a
/// typed error for that one page and the caller decides what to skip.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
}

impl StorefrontClient {
    /// Creates a client with the given per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Issues one GET and returns the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] for HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::Http`] for network, TLS, timeout, or body errors.
    pub async fn fetch_page(&self, url: &str) -> Result<RawPage, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let link_header = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(RawPage {
            url: final_url,
            status: status.as_u16(),
            body,
            link_header,
        })
    }

    /// Fetches one absolute `url` on behalf of `request`, recording the
    /// outcome instead of failing.
    ///
    /// A successful page carries the URL it was finally served from, so
    /// relative links resolve against the redirect target.
    pub async fn fetch_request(&self, request: PageRequest, url: String) -> FetchedPage {
        match self.fetch_page(&url).await {
            Ok(raw) => FetchedPage {
                request,
                url: raw.url,
                outcome: PageOutcome::Fetched {
                    body: raw.body,
                    link_header: raw.link_header,
                },
            },
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "page fetch failed; skipping");
                FetchedPage {
                    request,
                    url,
                    outcome: PageOutcome::Failed {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Fetches every request concurrently against `origin`.
    ///
    /// The returned pages are in the same order as `requests`. A failed page
    /// is recorded as [`PageOutcome::Failed`] and does not affect the others.
    pub async fn fetch_pages(&self, origin: &str, requests: &[PageRequest]) -> Vec<FetchedPage> {
        let fetches = requests.iter().map(|request| {
            let url = format!("{origin}{}", request.path);
            self.fetch_request(request.clone(), url)
        });
        join_all(fetches).await
    }
}
