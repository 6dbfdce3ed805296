//! Storage module for persisting audit data
//!
//! This module handles all database operations for the auditor, including:
//! - SQLite database initialization and schema management
//! - Audit session tracking with pause/resume support
//! - Per-page audit records and finding persistence
//! - Serialized pending-queue storage for exact resumption

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{SessionStore, StorageError, StorageResult};

use std::fmt;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(AuditError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStore, crate::AuditError> {
    SqliteStore::new(path)
}

/// Status of an audit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Paused,
    Completed,
    Error,
}

impl SessionStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Sessions in these states may be picked up by a resume worker,
    /// provided a pending queue is persisted (`running` covers a process
    /// that died mid-crawl)
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::Paused | Self::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Represents an audit session in the database
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: i64,
    pub site_url: String,
    pub max_pages: u32,
    pub user_agent: String,
    pub status: SessionStatus,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub total_pages: u32,
    pub total_findings: u32,
}

/// Data for one successfully audited page, before insertion
#[derive(Debug, Clone)]
pub struct PageAudit {
    pub session_id: i64,
    pub url: String,
    pub final_url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub content_length: u64,
    pub redirect_count: u32,
    pub heading_count: u32,
    pub image_count: u32,
    pub link_count: u32,
    pub form_count: u32,
}

/// Represents a persisted page audit
#[derive(Debug, Clone)]
pub struct PageAuditRecord {
    pub id: i64,
    pub session_id: i64,
    pub url: String,
    pub final_url: String,
    pub title: Option<String>,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub content_length: u64,
    pub findings_total: u32,
    pub findings_level_a: u32,
    pub findings_level_aa: u32,
    pub findings_level_aaa: u32,
    pub audited_at: String,
}

/// Represents a persisted finding
#[derive(Debug, Clone)]
pub struct FindingRecord {
    pub id: i64,
    pub page_id: i64,
    pub kind: crate::rules::IssueKind,
    pub criterion: String,
    pub level: crate::rules::Level,
    pub severity: crate::rules::Severity,
    pub confidence: crate::rules::Confidence,
    pub selector: Option<String>,
    pub description: String,
    pub recommendation: String,
    pub help_url: Option<String>,
    pub source_line: Option<u32>,
}

/// Aggregate figures for one session, derived from its persisted rows
#[derive(Debug, Clone, Default)]
pub struct SessionStatistics {
    pub total_pages: u64,
    pub total_findings: u64,
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub level_a: u64,
    pub level_aa: u64,
    pub level_aaa: u64,
    pub avg_response_time_ms: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in &[
            SessionStatus::Running,
            SessionStatus::Paused,
            SessionStatus::Completed,
            SessionStatus::Error,
        ] {
            let db_str = status.to_db_string();
            let parsed = SessionStatus::from_db_string(db_str);
            assert_eq!(Some(*status), parsed);
        }
    }

    #[test]
    fn test_session_status_invalid() {
        assert_eq!(SessionStatus::from_db_string("invalid"), None);
    }

    #[test]
    fn test_resumable_states() {
        assert!(SessionStatus::Paused.is_resumable());
        assert!(SessionStatus::Running.is_resumable());
        assert!(!SessionStatus::Completed.is_resumable());
        assert!(!SessionStatus::Error.is_resumable());
    }
}
