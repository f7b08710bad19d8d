use serde::Serialize;
use url::Url;

/// A probed result page that held products
///
/// Pages are numbered from 1; the index order is the crawl order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    pub url: Url,
    pub index: u32,
}

/// One product as listed on a result page
///
/// Serialises to the export shape keyed by display names. The id is the
/// dataset key and is not repeated inside the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Last path segment of the product link
    #[serde(skip)]
    pub id: String,

    #[serde(rename = "Product Name")]
    pub name: String,

    /// Price exactly as displayed; currency and formatting vary
    #[serde(rename = "Price")]
    pub price: String,

    /// Star rating, 0 when the listing has none
    #[serde(rename = "Rating")]
    pub rating: f64,

    #[serde(rename = "Link")]
    pub link: String,

    /// Keyword whose search produced this record
    #[serde(rename = "Search term")]
    pub search_term: String,

    /// Filled in by detail enrichment only
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
