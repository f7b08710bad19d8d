//! Crawler module for search-result harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with a fixed browser identity
//! - Pagination discovery with end-of-results detection
//! - Product extraction from result-page markup
//! - Detail-page enrichment
//! - Overall harvest coordination

mod coordinator;
mod discovery;
mod enricher;
mod extractor;
mod fetcher;

pub use coordinator::{run_harvest, HarvestReport, Harvester};
pub use discovery::{is_end_of_results, PageDiscoverer, ResultPage};
pub use enricher::DetailEnricher;
pub use extractor::{Extractor, MalformedEntry, PageExtraction, SkippedEntry};
pub use fetcher::{build_http_client, FetchedPage, Fetcher};
