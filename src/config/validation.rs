use crate::config::types::Config;
use crate::config::MAX_PAGE_BUDGET;
use crate::ConfigError;
use url::Url;

/// Validates a loaded configuration
///
/// Checks:
/// - Page budget is between 1 and [`MAX_PAGE_BUDGET`]
/// - Request timeout is non-zero
/// - Redirect cap is at most 10
/// - User-agent name is non-empty and the contact URL parses
/// - Database path is non-empty
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.max_pages == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-pages must be at least 1".to_string(),
        ));
    }

    if config.crawler.max_pages > MAX_PAGE_BUDGET {
        return Err(ConfigError::Validation(format!(
            "crawler.max-pages must not exceed {}",
            MAX_PAGE_BUDGET
        )));
    }

    if config.crawler.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "crawler.request-timeout must be non-zero".to_string(),
        ));
    }

    if config.crawler.max_redirects > 10 {
        return Err(ConfigError::Validation(
            "crawler.max-redirects must not exceed 10".to_string(),
        ));
    }

    if config.user_agent.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.name must not be empty".to_string(),
        ));
    }

    Url::parse(&config.user_agent.contact_url)
        .map_err(|_| ConfigError::InvalidUrl(config.user_agent.contact_url.clone()))?;

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}
