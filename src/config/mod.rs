//! Configuration module for Accesso
//!
//! Handles loading, parsing, and validating TOML configuration files.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
pub use validation::validate;

/// Hard upper bound on the per-session page budget, regardless of config
pub const MAX_PAGE_BUDGET: u32 = 500;

/// Default per-session page budget when none is given
pub const DEFAULT_PAGE_BUDGET: u32 = 50;
