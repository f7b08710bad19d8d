//! Detail-page enrichment of a single aggregated product

use crate::config::validation::compile_selector;
use crate::config::SelectorConfig;
use crate::crawler::fetcher::Fetcher;
use crate::dataset::Dataset;
use crate::url::{is_product_link, product_id};
use crate::{ConfigError, HarvestError, Result};
use scraper::{Html, Selector};
use url::Url;

/// Adds detail-page fields to records already in a dataset
#[derive(Debug, Clone)]
pub struct DetailEnricher {
    description: Selector,
}

impl DetailEnricher {
    pub fn new(config: &SelectorConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            description: compile_selector("detail-description", &config.detail_description)?,
        })
    }

    /// Fetches `product_link` and stores its description on the matching record
    ///
    /// The link is validated and the record looked up before any request is
    /// sent, so both failure modes below cost no network traffic.
    ///
    /// # Errors
    ///
    /// * `InvalidLink` - the link has no product-path marker or no id segment
    /// * `RecordNotFound` - no record with the derived id was harvested
    /// * `Network` - the detail page could not be fetched
    /// * `DetailFieldMissing` - the page has no description; the record is left as it was
    pub async fn enrich(
        &self,
        fetcher: &Fetcher,
        dataset: &mut Dataset,
        product_link: &str,
    ) -> Result<()> {
        let id = Self::target_id(product_link)?;

        if !dataset.contains(id) {
            return Err(HarvestError::RecordNotFound { id: id.to_string() });
        }

        let url = Url::parse(product_link).map_err(|_| HarvestError::InvalidLink {
            link: product_link.to_string(),
        })?;

        let page = fetcher.fetch(&url).await?;
        let description = self.extract_description(&page.body).ok_or_else(|| {
            HarvestError::DetailFieldMissing {
                url: url.to_string(),
                field: "description",
            }
        })?;

        let record = dataset
            .get_mut(id)
            .ok_or_else(|| HarvestError::RecordNotFound { id: id.to_string() })?;
        record.description = Some(description);

        tracing::info!("Enriched product {} from {}", id, url);
        Ok(())
    }

    /// Validates a detail link and derives its product id
    fn target_id(product_link: &str) -> Result<&str> {
        if !is_product_link(product_link) {
            return Err(HarvestError::InvalidLink {
                link: product_link.to_string(),
            });
        }

        product_id(product_link).ok_or_else(|| HarvestError::InvalidLink {
            link: product_link.to_string(),
        })
    }

    fn extract_description(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.description)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    }
}
