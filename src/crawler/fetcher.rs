//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with a fixed browser user agent
//! - Resolving a search URL to its final form after redirects
//! - GET requests returning the page body as text
//! - Optional fixed pacing between requests
//!
//! There is no retry logic here. A failed request surfaces as
//! [`HarvestError::Network`] and the caller decides what to do with it.

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code, passed through unclassified
    pub status_code: u16,

    /// Page body, decoded lossily as UTF-8
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use search_harvester::config::HttpConfig;
/// use search_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher shared by discovery and enrichment
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    request_delay: Option<Duration>,
}

impl Fetcher {
    /// Creates a fetcher from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(config).map_err(HarvestError::HttpClient)?;
        let request_delay =
            (config.request_delay_ms > 0).then(|| Duration::from_millis(config.request_delay_ms));

        Ok(Self {
            client,
            request_delay,
        })
    }

    /// Creates a fetcher around an existing client, without pacing
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            request_delay: None,
        }
    }

    /// Fetches a URL and returns its body
    ///
    /// # Request Flow
    ///
    /// 1. Wait for the configured request delay, if any
    /// 2. Send a GET request, following redirects
    /// 3. Read the whole body
    ///
    /// Error statuses are not failures: a 404 or 500 page that carries a
    /// body is returned like any other page, since deciding whether a page
    /// marks the end of the results is the caller's job.
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The server answered with a body
    /// * `Err(HarvestError::Network)` - DNS, connect, timeout or transport failure
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, HarvestError> {
        if let Some(delay) = self.request_delay {
            tokio::time::sleep(delay).await;
        }

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| network_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            tracing::warn!("{} answered HTTP {}, passing body through", url, status);
        }

        let bytes = response.bytes().await.map_err(|e| network_error(url, e))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        tracing::debug!(
            "Fetched {} ({} bytes, HTTP {})",
            final_url,
            body.len(),
            status.as_u16()
        );

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }

    /// Resolves `url` to the URL the server finally serves it from
    ///
    /// Issues a full GET and discards the body.
    pub async fn resolve(&self, url: &Url) -> Result<Url, HarvestError> {
        let page = self.fetch(url).await?;

        if &page.final_url != url {
            tracing::info!("Search URL {} redirected to {}", url, page.final_url);
        }

        Ok(page.final_url)
    }
}

/// Classifies a reqwest failure for the log and wraps it
fn network_error(url: &Url, source: reqwest::Error) -> HarvestError {
    if source.is_timeout() {
        tracing::error!("Request timeout for {}", url);
    } else if source.is_connect() {
        tracing::error!("Connection failed for {}: {}", url, source);
    } else if source.is_redirect() {
        tracing::error!("Redirect limit hit for {}", url);
    } else {
        tracing::error!("Request failed for {}: {}", url, source);
    }

    HarvestError::Network {
        url: url.to_string(),
        source,
    }
}
