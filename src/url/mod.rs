//! URL conventions of the target site
//!
//! This module owns every rule about how URLs are shaped:
//! - canonicalising a resolved search URL into a pagination base
//! - building the URL of result page N
//! - recognising product detail links and deriving product ids from them
//! - turning relative product hrefs into absolute links

mod pagination;
mod product;

pub use pagination::{canonical_base, page_url, PAGE_SEGMENT};
pub use product::{absolute_link, is_product_link, product_id, site_origin, PRODUCT_PATH_MARKER};
