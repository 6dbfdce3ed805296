//! Storage trait and error types
//!
//! This module defines the trait interface for session storage backends
//! and associated error types.

use crate::rules::Finding;
use crate::storage::{
    FindingRecord, PageAudit, PageAuditRecord, SessionRecord, SessionStatistics, SessionStatus,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session not found: {0}")]
    SessionNotFound(i64),

    #[error("Page not found: {0}")]
    PageNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for session storage backends
///
/// Sessions are mutated only at run boundaries; page audits and findings
/// are append-only, with one counter update per page after rule evaluation.
/// Report generators consume the same rows read-only.
pub trait SessionStore {
    // ===== Session Management =====

    /// Creates a new audit session in `running` state
    ///
    /// # Returns
    ///
    /// The ID of the newly created session
    fn create_session(
        &mut self,
        site_url: &str,
        max_pages: u32,
        user_agent: &str,
    ) -> StorageResult<i64>;

    /// Gets a session by ID
    fn get_session(&self, session_id: i64) -> StorageResult<SessionRecord>;

    /// Sessions a resume worker may pick up: paused or running status with a
    /// persisted pending queue
    fn list_resumable_sessions(&self) -> StorageResult<Vec<SessionRecord>>;

    /// Updates the status of a session
    fn update_session_status(&mut self, session_id: i64, status: SessionStatus)
        -> StorageResult<()>;

    /// Records a terminal status, finish timestamp, and final aggregate
    /// counts for a session
    fn finish_session(
        &mut self,
        session_id: i64,
        status: SessionStatus,
        total_pages: u32,
        total_findings: u32,
    ) -> StorageResult<()>;

    // ===== Page Audits =====

    /// Inserts the audit row for one successfully fetched page
    ///
    /// # Returns
    ///
    /// The ID of the newly created page audit
    fn insert_page(&mut self, page: &PageAudit) -> StorageResult<i64>;

    /// Updates the finding counters for a page, once after rule evaluation
    fn update_page_counts(
        &mut self,
        page_id: i64,
        total: u32,
        level_a: u32,
        level_aa: u32,
        level_aaa: u32,
    ) -> StorageResult<()>;

    /// URLs of every page already audited in a session, used to rebuild the
    /// visited set on resume
    fn session_page_urls(&self, session_id: i64) -> StorageResult<Vec<String>>;

    /// All page audits belonging to a session, in insertion order
    fn session_pages(&self, session_id: i64) -> StorageResult<Vec<PageAuditRecord>>;

    // ===== Findings =====

    /// Persists one finding for a page
    ///
    /// # Returns
    ///
    /// The ID of the newly created finding
    fn insert_finding(&mut self, page_id: i64, finding: &Finding) -> StorageResult<i64>;

    /// All findings recorded for a page, in insertion order
    fn findings_for_page(&self, page_id: i64) -> StorageResult<Vec<FindingRecord>>;

    // ===== Pending Queue =====

    /// Loads the persisted pending queue for a session (empty if absent)
    fn pending_queue(&self, session_id: i64) -> StorageResult<Vec<String>>;

    /// Persists the pending queue verbatim, or clears it with `None`
    fn set_pending_queue(
        &mut self,
        session_id: i64,
        queue: Option<&[String]>,
    ) -> StorageResult<()>;

    // ===== Statistics =====

    /// Aggregate figures for one session
    fn session_statistics(&self, session_id: i64) -> StorageResult<SessionStatistics>;
}
