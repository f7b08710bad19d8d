//! Search-Harvester: a paginated product-search scraper
//!
//! This crate crawls every result page of a keyword search, extracts product
//! records from each page, and merges them into a single dataset keyed by
//! product id. A single product can optionally be enriched with fields from
//! its detail page.

pub mod config;
pub mod crawler;
pub mod dataset;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Search-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Pagination did not end within {limit} pages")]
    PaginationLimitExceeded { limit: u32 },

    #[error("Not a product detail link: {link}")]
    InvalidLink { link: String },

    #[error("No product with id '{id}' in the dataset")]
    RecordNotFound { id: String },

    #[error("Detail page {url} has no {field}")]
    DetailFieldMissing { url: String, field: &'static str },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for {name}: {message}")]
    InvalidSelector { name: &'static str, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Result type alias for Search-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{HarvestReport, Harvester};
pub use dataset::{Dataset, PageAddress, ProductRecord, SearchQuery};
