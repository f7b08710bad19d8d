use crate::config::types::{
    Config, HttpConfig, OutputConfig, PaginationConfig, SearchConfig, SelectorConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound for speculative page probes in flight
const MAX_LOOKAHEAD: usize = 16;

/// Validates the entire configuration
///
/// The binary calls this again after applying command-line overrides.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_http_config(&config.http)?;
    validate_pagination_config(&config.pagination)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Compiles a CSS selector, naming the offending config key on failure
pub(crate) fn compile_selector(name: &'static str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        name,
        message: format!("'{}': {:?}", css, e),
    })
}

/// Validates the search target
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    // The keyword is appended verbatim, so the prefix has to end a path segment
    if !config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must end with '/'",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates pagination configuration
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.lookahead < 1 || config.lookahead > MAX_LOOKAHEAD {
        return Err(ConfigError::Validation(format!(
            "lookahead must be between 1 and {}, got {}",
            MAX_LOOKAHEAD, config.lookahead
        )));
    }

    if config.end_markers.is_empty() {
        return Err(ConfigError::Validation(
            "end-markers must contain at least one marker".to_string(),
        ));
    }

    if config.end_markers.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "end-markers cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    compile_selector("product-card", &config.product_card)?;
    compile_selector("product-name", &config.product_name)?;
    compile_selector("product-link", &config.product_link)?;
    compile_selector("product-price", &config.product_price)?;
    compile_selector("star-rating", &config.star_rating)?;
    compile_selector("detail-description", &config.detail_description)?;

    if config.rating_attribute.trim().is_empty() {
        return Err(ConfigError::Validation(
            "rating-attribute cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.json_file.is_empty() {
        return Err(ConfigError::Validation(
            "json-file cannot be empty".to_string(),
        ));
    }

    if matches!(config.database_file.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "database-file cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
