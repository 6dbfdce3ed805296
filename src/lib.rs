//! Accesso: a resumable WCAG 2.2 site auditor
//!
//! This crate implements a breadth-first site crawler that evaluates every
//! fetched page against a fixed catalogue of WCAG 2.2 accessibility rules and
//! records structured findings per page and per session. Sessions are bounded
//! by a page budget and can be paused and resumed exactly, with the pending
//! queue persisted between runs.

pub mod config;
pub mod crawler;
pub mod output;
pub mod rules;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Accesso operations
///
/// Per-page fetch failures are not errors at this level; they are variants of
/// [`crawler::FetchOutcome`] and only shrink the result set. An `AuditError`
/// aborts the session run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Session {0} not found")]
    SessionNotFound(i64),

    #[error("Session {id} is {status}, not resumable")]
    NotResumable {
        id: i64,
        status: storage::SessionStatus,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Accesso operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use rules::{Finding, IssueKind, Level, RuleEngine, Severity};
pub use storage::SessionStatus;
pub use url::{normalize, LinkRejection};
