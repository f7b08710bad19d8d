//! Configuration module for Search-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error for the binary: `Config::default()` carries
//! the settings for the stock target site.
//!
//! # Example
//!
//! ```no_run
//! use search_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Page cap: {}", config.pagination.max_pages);
//! ```

mod parser;
mod types;
pub(crate) mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, PaginationConfig, SearchConfig, SelectorConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
