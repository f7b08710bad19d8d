//! Pagination discovery
//!
//! Result pages are found empirically: page 1, 2, 3, ... are probed until a
//! page's content carries one of the end-of-results markers. Each valid page
//! is yielded together with its body, so it is fetched exactly once.
//!
//! With `lookahead > 1` several probes are kept in flight, but they are
//! consumed strictly in page order. The first end-of-results page stops
//! consumption, so a speculative response from beyond the boundary is
//! dropped without ever reaching the caller.

use crate::config::PaginationConfig;
use crate::crawler::fetcher::Fetcher;
use crate::dataset::PageAddress;
use crate::url::{canonical_base, page_url};
use crate::{HarvestError, Result};
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use url::Url;

/// A valid result page and its content
#[derive(Debug, Clone)]
pub struct ResultPage {
    pub address: PageAddress,
    pub body: String,
}

/// Returns true if `body` marks the end of the search results
///
/// Matching is a case-insensitive substring test. `markers` must already be
/// lowercase. A product description that happens to contain a marker will
/// also end the crawl; that fragility is inherent to the site convention.
pub fn is_end_of_results(body: &str, markers: &[String]) -> bool {
    let content = body.to_lowercase();
    markers.iter().any(|marker| content.contains(marker.as_str()))
}

/// Probes sequential result pages until the results run out
#[derive(Debug, Clone)]
pub struct PageDiscoverer {
    fetcher: Fetcher,
    max_pages: u32,
    lookahead: usize,
    end_markers: Vec<String>,
}

impl PageDiscoverer {
    pub fn new(fetcher: Fetcher, config: &PaginationConfig) -> Self {
        Self {
            fetcher,
            max_pages: config.max_pages,
            lookahead: config.lookahead.max(1),
            end_markers: config
                .end_markers
                .iter()
                .map(|marker| marker.to_lowercase())
                .collect(),
        }
    }

    /// Resolves the search URL once and returns the pagination base
    pub async fn resolve_base(&self, search_url: &Url) -> Result<String> {
        let resolved = self.fetcher.resolve(search_url).await?;
        let base = canonical_base(&resolved);
        tracing::info!("Pagination base: {}", base);
        Ok(base)
    }

    /// Lazily yields every valid result page under `base`, in page order
    ///
    /// # Termination
    ///
    /// | Condition | Stream behaviour |
    /// |-----------|------------------|
    /// | Page N contains an end marker | Ends after page N-1 |
    /// | Page 1 contains an end marker | Ends without items |
    /// | Fetch of page N fails | Yields `Err(Network)` |
    /// | Pages 1..=max_pages and max_pages+1 are all valid | Yields `Err(PaginationLimitExceeded)` |
    ///
    /// In sequential mode (`lookahead == 1`) no page past the end-of-results
    /// page is ever requested.
    pub fn pages<'a>(&'a self, base: &'a str) -> impl Stream<Item = Result<ResultPage>> + 'a {
        let limit = self.max_pages;

        // One probe past the cap tells a full last page from a runaway site
        stream::iter(1..=limit.saturating_add(1))
            .map(move |index| self.probe(base, index))
            .buffered(self.lookahead)
            .try_take_while(|probe| future::ready(Ok::<_, HarvestError>(probe.is_some())))
            .try_filter_map(|probe| future::ready(Ok(probe)))
            .and_then(move |page| {
                future::ready(if page.address.index > limit {
                    tracing::error!("No end of results within {} pages", limit);
                    Err(HarvestError::PaginationLimitExceeded { limit })
                } else {
                    Ok(page)
                })
            })
    }

    /// Resolves `search_url` and collects the addresses of all result pages
    pub async fn discover(&self, search_url: &Url) -> Result<Vec<PageAddress>> {
        let base = self.resolve_base(search_url).await?;

        self.pages(&base)
            .map_ok(|page| page.address)
            .try_collect()
            .await
    }

    /// Fetches page `index`; `None` means it is the end-of-results page
    async fn probe(&self, base: &str, index: u32) -> Result<Option<ResultPage>> {
        let url = page_url(base, index)?;
        let fetched = self.fetcher.fetch(&url).await?;

        if is_end_of_results(&fetched.body, &self.end_markers) {
            tracing::debug!(
                "Page {} is the end of the results (HTTP {})",
                index,
                fetched.status_code
            );
            return Ok(None);
        }

        Ok(Some(ResultPage {
            address: PageAddress { url, index },
            body: fetched.body,
        }))
    }
}
