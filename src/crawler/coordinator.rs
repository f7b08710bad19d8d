//! Harvest coordinator - main crawl orchestration logic
//!
//! This module ties the components together:
//! - Resolving the search URL to a pagination base
//! - Streaming valid result pages from the discoverer
//! - Extracting products from each page
//! - Folding every page into one dataset, in page order
//! - Optional detail enrichment of one product afterwards

use crate::config::Config;
use crate::crawler::discovery::PageDiscoverer;
use crate::crawler::enricher::DetailEnricher;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::dataset::{Dataset, PageAddress, SearchQuery};
use crate::url::site_origin;
use crate::Result;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use url::Url;

/// Outcome of a complete harvest run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Keyword that was searched
    pub keyword: String,

    /// Valid result pages, in crawl order
    pub pages: Vec<PageAddress>,

    /// Aggregated products
    pub dataset: Dataset,

    /// Records extracted across all pages, before deduplication
    pub records_extracted: usize,

    /// Product entries skipped as malformed
    pub entries_skipped: usize,

    /// Records that overwrote an earlier record with the same id
    pub records_replaced: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl HarvestReport {
    /// Wall-clock duration of the run
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Main harvester structure
///
/// Holds its collaborators by composition. The harvester is the only writer
/// of the dataset during a run.
pub struct Harvester {
    fetcher: Fetcher,
    discoverer: PageDiscoverer,
    extractor: Extractor,
    enricher: DetailEnricher,
}

impl Harvester {
    /// Creates a harvester from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Client built and selectors compiled
    /// * `Err(HarvestError)` - Invalid selector or HTTP client failure
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;
        Self::with_fetcher(fetcher, config)
    }

    /// Creates a harvester around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, config: &Config) -> Result<Self> {
        Ok(Self {
            discoverer: PageDiscoverer::new(fetcher.clone(), &config.pagination),
            extractor: Extractor::new(&config.selectors)?,
            enricher: DetailEnricher::new(&config.selectors)?,
            fetcher,
        })
    }

    /// Crawls every result page for `query` and aggregates the products
    ///
    /// This is the core harvesting logic that:
    /// 1. Resolves the search URL (following redirects) to a pagination base
    /// 2. Streams valid result pages until the end-of-results marker
    /// 3. Extracts products from each page
    /// 4. Merges each page's records into the dataset, later pages winning
    ///
    /// The run is all-or-nothing: the first network error, or running past
    /// the page cap, fails it and no partial dataset is returned.
    pub async fn harvest(&self, query: &SearchQuery) -> Result<HarvestReport> {
        let started_at = Utc::now();
        tracing::info!(
            "Harvesting '{}' from {}",
            query.keyword(),
            query.search_url()
        );

        let base = self.discoverer.resolve_base(query.search_url()).await?;
        let origin = site_origin(&Url::parse(&base)?)?;

        let mut dataset = Dataset::new();
        let mut pages = Vec::new();
        let mut records_extracted = 0;
        let mut entries_skipped = 0;
        let mut records_replaced = 0;

        let stream = self.discoverer.pages(&base);
        futures::pin_mut!(stream);

        while let Some(page) = stream.try_next().await? {
            let extraction = self
                .extractor
                .extract(&page.body, &origin, query.keyword());

            tracing::info!(
                "Page {} ({}): {} products, {} skipped",
                page.address.index,
                page.address.url,
                extraction.records.len(),
                extraction.skipped.len()
            );

            records_extracted += extraction.records.len();
            entries_skipped += extraction.skipped.len();

            let merged = dataset.merge(extraction.records);
            records_replaced += merged.replaced;

            pages.push(page.address);
        }

        if pages.is_empty() {
            tracing::info!("No results for '{}'", query.keyword());
        }

        let finished_at = Utc::now();
        tracing::info!(
            "Harvest completed: {} pages, {} unique products in {:?}",
            pages.len(),
            dataset.len(),
            (finished_at - started_at).to_std().unwrap_or_default()
        );

        Ok(HarvestReport {
            keyword: query.keyword().to_string(),
            pages,
            dataset,
            records_extracted,
            entries_skipped,
            records_replaced,
            started_at,
            finished_at,
        })
    }

    /// Enriches one harvested product with its detail-page description
    pub async fn enrich(&self, dataset: &mut Dataset, product_link: &str) -> Result<()> {
        self.enricher
            .enrich(&self.fetcher, dataset, product_link)
            .await
    }
}

/// Runs a complete harvest for `keyword` with the given configuration
///
/// # Example
///
/// ```no_run
/// use search_harvester::config::Config;
/// use search_harvester::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_harvest(&Config::default(), "ipad").await?;
/// println!("{} products", report.dataset.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: &Config, keyword: &str) -> Result<HarvestReport> {
    let query = SearchQuery::new(keyword, &config.search.base_url)?;
    let harvester = Harvester::new(config)?;
    harvester.harvest(&query).await
}
