//! Product extraction from result-page markup
//!
//! This module turns one result page into product records:
//! - Every element matching the product-card selector is one entry
//! - Name, price and link are required; an entry lacking one is skipped
//!   and reported, the rest of the page is still extracted
//! - Rating is optional and falls back to 0
//!
//! All knowledge of the site's markup lives in the selectors, so a site
//! redesign only touches configuration and this module.

use crate::config::validation::compile_selector;
use crate::config::SelectorConfig;
use crate::dataset::ProductRecord;
use crate::url::{absolute_link, product_id};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Why a product entry could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEntry {
    #[error("product link is missing")]
    MissingLink,

    #[error("product link '{0}' has no id segment")]
    EmptyId(String),

    #[error("product link '{href}' cannot be resolved: {reason}")]
    BadLink { href: String, reason: String },

    #[error("product name is missing")]
    MissingName,

    #[error("product price is missing")]
    MissingPrice,
}

/// A product entry that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position of the entry among the page's product cards
    pub position: usize,
    pub reason: MalformedEntry,
}

/// Everything extracted from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    pub records: Vec<ProductRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Compiled listing selectors
#[derive(Debug, Clone)]
struct ListingSelectors {
    card: Selector,
    name: Selector,
    link: Selector,
    price: Selector,
    rating: Selector,
    rating_attribute: String,
}

/// Extracts product records from result pages
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: ListingSelectors,
}

impl Extractor {
    /// Compiles the listing selectors from configuration
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: ListingSelectors {
                card: compile_selector("product-card", &config.product_card)?,
                name: compile_selector("product-name", &config.product_name)?,
                link: compile_selector("product-link", &config.product_link)?,
                price: compile_selector("product-price", &config.product_price)?,
                rating: compile_selector("star-rating", &config.star_rating)?,
                rating_attribute: config.rating_attribute.clone(),
            },
        })
    }

    /// Extracts every product entry on a page
    ///
    /// Extraction is deterministic: the same content always yields the same
    /// records in the same order.
    ///
    /// # Arguments
    ///
    /// * `html` - Raw page content
    /// * `origin` - Site origin that relative product links are joined onto
    /// * `search_term` - Keyword stamped onto every record
    ///
    /// # Example
    ///
    /// ```
    /// use search_harvester::config::SelectorConfig;
    /// use search_harvester::crawler::Extractor;
    /// use url::Url;
    ///
    /// let html = r#"
    ///     <div class="ac-product-card">
    ///       <a class="ac-product-link" href="/product/111">iPad</a>
    ///       <div class="ac-product-name">iPad</div>
    ///       <div class="ac-product-price">£299.00</div>
    ///     </div>"#;
    ///
    /// let extractor = Extractor::new(&SelectorConfig::default()).unwrap();
    /// let origin = Url::parse("http://www.argos.co.uk/").unwrap();
    /// let page = extractor.extract(html, &origin, "ipad");
    ///
    /// assert_eq!(page.records[0].id, "111");
    /// assert_eq!(page.records[0].rating, 0.0);
    /// ```
    pub fn extract(&self, html: &str, origin: &Url, search_term: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        let mut extraction = PageExtraction::default();

        for (position, card) in document.select(&self.selectors.card).enumerate() {
            match self.extract_entry(card, origin, search_term) {
                Ok(record) => extraction.records.push(record),
                Err(reason) => {
                    tracing::warn!("Skipping product entry {}: {}", position, reason);
                    extraction.skipped.push(SkippedEntry { position, reason });
                }
            }
        }

        extraction
    }

    /// Builds a record from one product card
    fn extract_entry(
        &self,
        card: ElementRef<'_>,
        origin: &Url,
        search_term: &str,
    ) -> Result<ProductRecord, MalformedEntry> {
        let href = card
            .select(&self.selectors.link)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .ok_or(MalformedEntry::MissingLink)?;

        let id = product_id(href).ok_or_else(|| MalformedEntry::EmptyId(href.to_string()))?;

        let link = absolute_link(origin, href).map_err(|e| MalformedEntry::BadLink {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

        let name = element_text(card, &self.selectors.name).ok_or(MalformedEntry::MissingName)?;
        let price =
            element_text(card, &self.selectors.price).ok_or(MalformedEntry::MissingPrice)?;

        Ok(ProductRecord {
            id: id.to_string(),
            name,
            price,
            rating: self.extract_rating(card, id),
            link: link.to_string(),
            search_term: search_term.to_string(),
            description: None,
        })
    }

    /// Reads the star rating, recovering to 0 when it is absent or unreadable
    fn extract_rating(&self, card: ElementRef<'_>, id: &str) -> f64 {
        let raw = card
            .select(&self.selectors.rating)
            .next()
            .and_then(|element| element.value().attr(&self.selectors.rating_attribute));

        match raw.map(|value| value.trim().parse::<f64>()) {
            Some(Ok(rating)) if rating.is_finite() => rating,
            Some(_) => {
                tracing::debug!("Product {} has an unreadable rating, using 0", id);
                0.0
            }
            None => {
                tracing::debug!("Product {} has no rating, using 0", id);
                0.0
            }
        }
    }
}

/// Trimmed text content of the first element matching `selector`
fn element_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}
