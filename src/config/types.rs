use serde::Deserialize;

/// Browser identification sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/47.0.2526.80 Safari/537.36 Core/1.47.933.400 \
     QQBrowser/9.4.8699.400";

/// Main configuration structure for Search-Harvester
///
/// Every section is optional in the TOML file; missing sections fall back
/// to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Search target configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search URL prefix; the keyword is appended to it verbatim
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.argos.co.uk/search/".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Fixed pause before each request (milliseconds), 0 disables it
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            request_delay_ms: 0,
        }
    }
}

/// Pagination discovery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Maximum number of valid result pages before the crawl is abandoned
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Number of page probes kept in flight (1 = strictly sequential)
    pub lookahead: usize,

    /// Case-insensitive content markers that signal the end of the results
    #[serde(rename = "end-markers")]
    pub end_markers: Vec<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: 200,
            lookahead: 1,
            end_markers: vec!["error-page".to_string(), "no-results".to_string()],
        }
    }
}

/// CSS selectors describing the result-page and detail-page markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per product entry on a result page
    #[serde(rename = "product-card")]
    pub product_card: String,

    #[serde(rename = "product-name")]
    pub product_name: String,

    /// Anchor whose `href` points at the product detail page
    #[serde(rename = "product-link")]
    pub product_link: String,

    #[serde(rename = "product-price")]
    pub product_price: String,

    #[serde(rename = "star-rating")]
    pub star_rating: String,

    /// Attribute of the star-rating element holding the numeric rating
    #[serde(rename = "rating-attribute")]
    pub rating_attribute: String,

    #[serde(rename = "detail-description")]
    pub detail_description: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            product_card: "div.ac-product-card".to_string(),
            product_name: "div.ac-product-name".to_string(),
            product_link: "a.ac-product-link".to_string(),
            product_price: "div.ac-product-price".to_string(),
            star_rating: "div.ac-star-rating".to_string(),
            rating_attribute: "data-star-rating".to_string(),
            detail_description: "div[itemprop='description']".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives every export file
    pub directory: String,

    /// JSON export file name, relative to `directory`
    #[serde(rename = "json-file")]
    pub json_file: String,

    /// Optional SQLite export file name, relative to `directory`
    #[serde(rename = "database-file")]
    pub database_file: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "Products".to_string(),
            json_file: "products.json".to_string(),
            database_file: None,
        }
    }
}
