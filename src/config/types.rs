use serde::Deserialize;

/// Main configuration structure for Accesso
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Default page budget per audit session (overridable on the CLI)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout", default = "default_timeout")]
    pub request_timeout: u64,

    /// Maximum number of redirect hops to follow per request
    #[serde(rename = "max-redirects", default = "default_redirects")]
    pub max_redirects: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Product name sent in the User-Agent header
    pub name: String,

    /// URL with information about the auditor, appended as a UA comment
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the full User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{} (+{})", self.name, self.contact_url)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_max_pages() -> u32 {
    super::DEFAULT_PAGE_BUDGET
}

fn default_timeout() -> u64 {
    30
}

fn default_redirects() -> u32 {
    5
}
