//! Product link handling

use crate::{UrlError, UrlResult};
use url::Url;

/// Substring every product detail URL contains
pub const PRODUCT_PATH_MARKER: &str = "/product";

/// Returns true if `link` looks like a product detail URL
pub fn is_product_link(link: &str) -> bool {
    link.contains(PRODUCT_PATH_MARKER)
}

/// Derives the product id from a product href or detail URL
///
/// The id is the text after the last `/`. Returns `None` when that segment
/// is empty (for example a link ending in `/`).
///
/// # Example
///
/// ```
/// use search_harvester::url::product_id;
///
/// assert_eq!(product_id("/product/6836429"), Some("6836429"));
/// assert_eq!(product_id("http://www.argos.co.uk/product/6836429"), Some("6836429"));
/// assert_eq!(product_id("/product/"), None);
/// ```
pub fn product_id(link: &str) -> Option<&str> {
    link.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Returns the origin (`scheme://host[:port]/`) of `url` as a joinable base
pub fn site_origin(url: &Url) -> UrlResult<Url> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(UrlError::CannotBeABase(url.to_string()));
    }

    Url::parse(&origin.ascii_serialization()).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Resolves a product href against the site origin
///
/// Relative hrefs are prefixed with the origin; absolute hrefs are kept,
/// provided they are http(s).
pub fn absolute_link(origin: &Url, href: &str) -> UrlResult<Url> {
    let link = origin
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    match link.scheme() {
        "http" | "https" => Ok(link),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
