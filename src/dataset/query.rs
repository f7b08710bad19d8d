use crate::{HarvestError, Result};
use url::Url;

/// A keyword search against one site
///
/// Immutable once built. The search URL is the base URL with the keyword
/// appended verbatim (the URL parser percent-encodes anything unsafe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    base_url: String,
    search_url: Url,
}

impl SearchQuery {
    /// Builds a query, rejecting an empty keyword or a base URL that does
    /// not end with `/`
    ///
    /// # Example
    ///
    /// ```
    /// use search_harvester::SearchQuery;
    ///
    /// let query = SearchQuery::new("ipad", "http://example.com/search/").unwrap();
    /// assert_eq!(query.search_url().as_str(), "http://example.com/search/ipad");
    /// ```
    pub fn new(keyword: &str, base_url: &str) -> Result<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(HarvestError::InvalidQuery(
                "keyword cannot be empty".to_string(),
            ));
        }

        if !base_url.ends_with('/') {
            return Err(HarvestError::InvalidQuery(format!(
                "base URL '{}' must end with '/'",
                base_url
            )));
        }

        let search_url = Url::parse(&format!("{}{}", base_url, keyword))?;

        Ok(Self {
            keyword: keyword.to_string(),
            base_url: base_url.to_string(),
            search_url,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The URL of the first search page, before redirects
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}
