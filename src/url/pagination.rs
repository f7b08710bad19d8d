//! Pagination URL construction
//!
//! Result page N of a search lives at `<canonical base>/opt/page:N/`.

use crate::{UrlError, UrlResult};
use url::Url;

/// Path segment that introduces the page number
pub const PAGE_SEGMENT: &str = "/opt/page:";

/// Reduces a resolved search URL to the base that page URLs are built on
///
/// Query and fragment are dropped and a trailing `/` is trimmed, so that
/// appending [`PAGE_SEGMENT`] never produces `//opt`.
///
/// # Example
///
/// ```
/// use search_harvester::url::canonical_base;
/// use url::Url;
///
/// let resolved = Url::parse("http://example.com/search/ipad/?sort=price#top").unwrap();
/// assert_eq!(canonical_base(&resolved), "http://example.com/search/ipad");
/// ```
pub fn canonical_base(resolved: &Url) -> String {
    let mut base = resolved.clone();
    base.set_query(None);
    base.set_fragment(None);

    base.as_str().trim_end_matches('/').to_string()
}

/// Builds the URL of result page `index` (1-based)
pub fn page_url(base: &str, index: u32) -> UrlResult<Url> {
    let raw = format!("{}{}{}/", base, PAGE_SEGMENT, index);
    Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))
}
