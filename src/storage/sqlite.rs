//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the SessionStore
//! trait.

use crate::rules::{Confidence, Finding, IssueKind, Level, Severity};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{SessionStore, StorageError, StorageResult};
use crate::storage::{
    FindingRecord, PageAudit, PageAuditRecord, SessionRecord, SessionStatistics, SessionStatus,
};
use crate::AuditError;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version tag for the serialized pending-queue format
const QUEUE_FORMAT_VERSION: u32 = 1;

/// Versioned on-disk form of the pending queue
///
/// Earlier deployments stored a bare JSON array; reads fall back to that
/// form so in-flight paused sessions survive an upgrade.
#[derive(Debug, Serialize, Deserialize)]
struct QueueBlob {
    v: u32,
    urls: Vec<String>,
}

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(AuditError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, AuditError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn map_session(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
        Ok(SessionRecord {
            id: row.get(0)?,
            site_url: row.get(1)?,
            max_pages: row.get(2)?,
            user_agent: row.get(3)?,
            status: SessionStatus::from_db_string(&row.get::<_, String>(4)?)
                .unwrap_or(SessionStatus::Error),
            started_at: row.get(5)?,
            finished_at: row.get(6)?,
            total_pages: row.get(7)?,
            total_findings: row.get(8)?,
        })
    }
}

const SESSION_COLUMNS: &str = "id, site_url, max_pages, user_agent, status, started_at, \
                               finished_at, total_pages, total_findings";

impl SessionStore for SqliteStore {
    // ===== Session Management =====

    fn create_session(
        &mut self,
        site_url: &str,
        max_pages: u32,
        user_agent: &str,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO audit_sessions (site_url, max_pages, user_agent, status, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                site_url,
                max_pages,
                user_agent,
                SessionStatus::Running.to_db_string(),
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_session(&self, session_id: i64) -> StorageResult<SessionRecord> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM audit_sessions WHERE id = ?1",
            SESSION_COLUMNS
        ))?;

        let session = stmt
            .query_row(params![session_id], Self::map_session)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::SessionNotFound(session_id)
                }
                other => StorageError::Sqlite(other),
            })?;

        Ok(session)
    }

    fn list_resumable_sessions(&self) -> StorageResult<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM audit_sessions
             WHERE status IN ('paused', 'running') AND pending_queue IS NOT NULL
             ORDER BY id",
            SESSION_COLUMNS
        ))?;

        let sessions = stmt
            .query_map([], Self::map_session)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    fn update_session_status(
        &mut self,
        session_id: i64,
        status: SessionStatus,
    ) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE audit_sessions SET status = ?1 WHERE id = ?2",
            params![status.to_db_string(), session_id],
        )?;
        Ok(())
    }

    fn finish_session(
        &mut self,
        session_id: i64,
        status: SessionStatus,
        total_pages: u32,
        total_findings: u32,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE audit_sessions
             SET status = ?1, finished_at = ?2, total_pages = ?3, total_findings = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                total_pages,
                total_findings,
                session_id
            ],
        )?;
        Ok(())
    }

    // ===== Page Audits =====

    fn insert_page(&mut self, page: &PageAudit) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO page_audits
             (session_id, url, final_url, title, meta_description, status_code,
              response_time_ms, content_length, redirect_count, heading_count,
              image_count, link_count, form_count, audited_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                page.session_id,
                page.url,
                page.final_url,
                page.title,
                page.meta_description,
                page.status_code,
                page.response_time_ms as i64,
                page.content_length as i64,
                page.redirect_count,
                page.heading_count,
                page.image_count,
                page.link_count,
                page.form_count,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_page_counts(
        &mut self,
        page_id: i64,
        total: u32,
        level_a: u32,
        level_aa: u32,
        level_aaa: u32,
    ) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE page_audits
             SET findings_total = ?1, findings_level_a = ?2,
                 findings_level_aa = ?3, findings_level_aaa = ?4
             WHERE id = ?5",
            params![total, level_a, level_aa, level_aaa, page_id],
        )?;

        if changed == 0 {
            return Err(StorageError::PageNotFound(page_id));
        }
        Ok(())
    }

    fn session_page_urls(&self, session_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM page_audits WHERE session_id = ?1 ORDER BY id")?;

        let urls = stmt
            .query_map(params![session_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(urls)
    }

    fn session_pages(&self, session_id: i64) -> StorageResult<Vec<PageAuditRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, url, final_url, title, status_code, response_time_ms,
             content_length, findings_total, findings_level_a, findings_level_aa,
             findings_level_aaa, audited_at
             FROM page_audits WHERE session_id = ?1 ORDER BY id",
        )?;

        let pages = stmt
            .query_map(params![session_id], |row| {
                Ok(PageAuditRecord {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    url: row.get(2)?,
                    final_url: row.get(3)?,
                    title: row.get(4)?,
                    status_code: row.get(5)?,
                    response_time_ms: row.get::<_, i64>(6)? as u64,
                    content_length: row.get::<_, i64>(7)? as u64,
                    findings_total: row.get(8)?,
                    findings_level_a: row.get(9)?,
                    findings_level_aa: row.get(10)?,
                    findings_level_aaa: row.get(11)?,
                    audited_at: row.get(12)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    // ===== Findings =====

    fn insert_finding(&mut self, page_id: i64, finding: &Finding) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO findings
             (page_id, issue_type, criterion, level, severity, confidence, selector,
              description, recommendation, help_url, source_line)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                page_id,
                finding.kind.to_db_string(),
                finding.criterion,
                finding.level.to_db_string(),
                finding.severity.to_db_string(),
                finding.confidence.to_db_string(),
                finding.selector,
                finding.description,
                finding.recommendation,
                finding.help_url,
                finding.line,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn findings_for_page(&self, page_id: i64) -> StorageResult<Vec<FindingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, page_id, issue_type, criterion, level, severity, confidence,
             selector, description, recommendation, help_url, source_line
             FROM findings WHERE page_id = ?1 ORDER BY id",
        )?;

        let raw = stmt
            .query_map(params![page_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, String>(8)?,
                    row.get::<_, String>(9)?,
                    row.get::<_, Option<String>>(10)?,
                    row.get::<_, Option<u32>>(11)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut findings = Vec::with_capacity(raw.len());
        for (
            id,
            page_id,
            issue_type,
            criterion,
            level,
            severity,
            confidence,
            selector,
            description,
            recommendation,
            help_url,
            source_line,
        ) in raw
        {
            let kind = IssueKind::from_db_string(&issue_type).ok_or_else(|| {
                StorageError::Serialization(format!("unknown issue type {:?}", issue_type))
            })?;
            findings.push(FindingRecord {
                id,
                page_id,
                kind,
                criterion,
                level: Level::from_db_string(&level).unwrap_or(Level::A),
                severity: Severity::from_db_string(&severity).unwrap_or(Severity::Medium),
                confidence: Confidence::from_db_string(&confidence).unwrap_or(Confidence::Medium),
                selector,
                description,
                recommendation,
                help_url,
                source_line,
            });
        }

        Ok(findings)
    }

    // ===== Pending Queue =====

    fn pending_queue(&self, session_id: i64) -> StorageResult<Vec<String>> {
        let blob: Option<String> = self
            .conn
            .query_row(
                "SELECT pending_queue FROM audit_sessions WHERE id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::SessionNotFound(session_id)
                }
                other => StorageError::Sqlite(other),
            })?;

        let Some(blob) = blob else {
            return Ok(Vec::new());
        };

        if let Ok(parsed) = serde_json::from_str::<QueueBlob>(&blob) {
            return Ok(parsed.urls);
        }

        // Legacy bare-array form
        serde_json::from_str::<Vec<String>>(&blob)
            .map_err(|e| StorageError::Serialization(format!("pending queue: {}", e)))
    }

    fn set_pending_queue(
        &mut self,
        session_id: i64,
        queue: Option<&[String]>,
    ) -> StorageResult<()> {
        let blob = match queue {
            Some(urls) => {
                let blob = QueueBlob {
                    v: QUEUE_FORMAT_VERSION,
                    urls: urls.to_vec(),
                };
                Some(
                    serde_json::to_string(&blob)
                        .map_err(|e| StorageError::Serialization(e.to_string()))?,
                )
            }
            None => None,
        };

        let changed = self.conn.execute(
            "UPDATE audit_sessions SET pending_queue = ?1 WHERE id = ?2",
            params![blob, session_id],
        )?;

        if changed == 0 {
            return Err(StorageError::SessionNotFound(session_id));
        }
        Ok(())
    }

    // ===== Statistics =====

    fn session_statistics(&self, session_id: i64) -> StorageResult<SessionStatistics> {
        let mut stats = SessionStatistics::default();

        let (pages, avg): (i64, Option<f64>) = self.conn.query_row(
            "SELECT COUNT(*), AVG(response_time_ms) FROM page_audits WHERE session_id = ?1",
            params![session_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        stats.total_pages = pages as u64;
        stats.avg_response_time_ms = avg;

        let mut stmt = self.conn.prepare(
            "SELECT f.severity, f.level, COUNT(*)
             FROM findings f
             JOIN page_audits p ON p.id = f.page_id
             WHERE p.session_id = ?1
             GROUP BY f.severity, f.level",
        )?;

        let rows = stmt.query_map(params![session_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        for row in rows {
            let (severity, level, count) = row?;
            let count = count as u64;
            stats.total_findings += count;

            match Severity::from_db_string(&severity) {
                Some(Severity::Critical) => stats.critical += count,
                Some(Severity::High) => stats.high += count,
                Some(Severity::Medium) => stats.medium += count,
                Some(Severity::Low) | None => stats.low += count,
            }
            match Level::from_db_string(&level) {
                Some(Level::A) | None => stats.level_a += count,
                Some(Level::AA) => stats.level_aa += count,
                Some(Level::AAA) => stats.level_aaa += count,
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Finding, IssueKind, Level, Severity};

    fn sample_page(session_id: i64, url: &str) -> PageAudit {
        PageAudit {
            session_id,
            url: url.to_string(),
            final_url: url.to_string(),
            title: Some("Test Page".to_string()),
            meta_description: None,
            status_code: 200,
            response_time_ms: 120,
            content_length: 2048,
            redirect_count: 0,
            heading_count: 3,
            image_count: 1,
            link_count: 5,
            form_count: 0,
        }
    }

    fn sample_finding() -> Finding {
        Finding::new(
            IssueKind::MissingAltText,
            "1.1.1",
            Level::A,
            Severity::High,
            "Image without an appropriate text alternative",
            "Add an alt attribute describing the image content",
        )
        .with_selector("img.hero")
    }

    #[test]
    fn test_create_and_get_session() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();
        assert!(id > 0);

        let session = store.get_session(id).unwrap();
        assert_eq!(session.site_url, "https://example.com");
        assert_eq!(session.max_pages, 50);
        assert_eq!(session.status, SessionStatus::Running);
        assert!(session.finished_at.is_none());
        assert_eq!(session.total_pages, 0);
    }

    #[test]
    fn test_get_missing_session() {
        let store = SqliteStore::new_in_memory().unwrap();
        assert!(matches!(
            store.get_session(99),
            Err(StorageError::SessionNotFound(99))
        ));
    }

    #[test]
    fn test_database_failure_is_not_a_missing_session() {
        let store = SqliteStore::new_in_memory().unwrap();
        store
            .conn
            .execute_batch("DROP TABLE findings; DROP TABLE page_audits; DROP TABLE audit_sessions;")
            .unwrap();

        assert!(matches!(store.get_session(1), Err(StorageError::Sqlite(_))));
        assert!(matches!(
            store.pending_queue(1),
            Err(StorageError::Sqlite(_))
        ));
    }

    #[test]
    fn test_finish_session_records_counts_and_timestamp() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        store
            .finish_session(id, SessionStatus::Completed, 12, 34)
            .unwrap();

        let session = store.get_session(id).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.total_pages, 12);
        assert_eq!(session.total_findings, 34);
        assert!(session.finished_at.is_some());
    }

    #[test]
    fn test_list_resumable_requires_pending_queue() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let paused_with_queue = store
            .create_session("https://a.example", 10, "accesso/1.0")
            .unwrap();
        let paused_without_queue = store
            .create_session("https://b.example", 10, "accesso/1.0")
            .unwrap();
        let completed = store
            .create_session("https://c.example", 10, "accesso/1.0")
            .unwrap();

        let queue = vec!["https://a.example/next".to_string()];
        store
            .set_pending_queue(paused_with_queue, Some(&queue))
            .unwrap();
        store
            .update_session_status(paused_with_queue, SessionStatus::Paused)
            .unwrap();
        store
            .update_session_status(paused_without_queue, SessionStatus::Paused)
            .unwrap();
        store.set_pending_queue(completed, Some(&queue)).unwrap();
        store
            .update_session_status(completed, SessionStatus::Completed)
            .unwrap();

        let resumable = store.list_resumable_sessions().unwrap();
        assert_eq!(resumable.len(), 1);
        assert_eq!(resumable[0].id, paused_with_queue);
    }

    #[test]
    fn test_interrupted_running_session_is_resumable() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let id = store
            .create_session("https://a.example", 10, "accesso/1.0")
            .unwrap();
        let queue = vec!["https://a.example/next".to_string()];
        store.set_pending_queue(id, Some(&queue)).unwrap();

        let resumable = store.list_resumable_sessions().unwrap();
        assert_eq!(resumable.len(), 1);
        assert_eq!(resumable[0].status, SessionStatus::Running);
    }

    #[test]
    fn test_insert_page_and_update_counts() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let session_id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        let page_id = store
            .insert_page(&sample_page(session_id, "https://example.com/"))
            .unwrap();
        store.update_page_counts(page_id, 7, 5, 2, 0).unwrap();

        let pages = store.session_pages(session_id).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].findings_total, 7);
        assert_eq!(pages[0].findings_level_a, 5);
        assert_eq!(pages[0].findings_level_aa, 2);
    }

    #[test]
    fn test_update_counts_for_missing_page() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        assert!(matches!(
            store.update_page_counts(42, 1, 1, 0, 0),
            Err(StorageError::PageNotFound(42))
        ));
    }

    #[test]
    fn test_session_page_urls_in_insertion_order() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let session_id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        for path in ["/", "/about", "/contact"] {
            let url = format!("https://example.com{}", path);
            store.insert_page(&sample_page(session_id, &url)).unwrap();
        }

        let urls = store.session_page_urls(session_id).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/contact"
            ]
        );
    }

    #[test]
    fn test_finding_roundtrip() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let session_id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();
        let page_id = store
            .insert_page(&sample_page(session_id, "https://example.com/"))
            .unwrap();

        store.insert_finding(page_id, &sample_finding()).unwrap();

        let findings = store.findings_for_page(page_id).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::MissingAltText);
        assert_eq!(findings[0].criterion, "1.1.1");
        assert_eq!(findings[0].level, Level::A);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].selector.as_deref(), Some("img.hero"));
        assert!(findings[0].source_line.is_none());
    }

    #[test]
    fn test_pending_queue_roundtrip() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        assert!(store.pending_queue(id).unwrap().is_empty());

        let queue = vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
        ];
        store.set_pending_queue(id, Some(&queue)).unwrap();
        assert_eq!(store.pending_queue(id).unwrap(), queue);

        store.set_pending_queue(id, None).unwrap();
        assert!(store.pending_queue(id).unwrap().is_empty());
    }

    #[test]
    fn test_pending_queue_is_version_tagged() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        let queue = vec!["https://example.com/a".to_string()];
        store.set_pending_queue(id, Some(&queue)).unwrap();

        let raw: String = store
            .conn
            .query_row(
                "SELECT pending_queue FROM audit_sessions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert!(raw.contains("\"v\":1"));
    }

    #[test]
    fn test_pending_queue_legacy_bare_array() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        store
            .conn
            .execute(
                "UPDATE audit_sessions SET pending_queue = ?1 WHERE id = ?2",
                params![r#"["https://example.com/a","https://example.com/b"]"#, id],
            )
            .unwrap();

        let queue = store.pending_queue(id).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0], "https://example.com/a");
    }

    #[test]
    fn test_session_statistics() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let session_id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        let mut page = sample_page(session_id, "https://example.com/");
        page.response_time_ms = 100;
        let first = store.insert_page(&page).unwrap();
        page.url = "https://example.com/about".to_string();
        page.response_time_ms = 300;
        let second = store.insert_page(&page).unwrap();

        store.insert_finding(first, &sample_finding()).unwrap();
        store
            .insert_finding(
                second,
                &Finding::new(
                    IssueKind::ColorContrast,
                    "1.4.3",
                    Level::AA,
                    Severity::Medium,
                    "Inline colors need verification",
                    "Verify the contrast ratio",
                ),
            )
            .unwrap();

        let stats = store.session_statistics(session_id).unwrap();
        assert_eq!(stats.total_pages, 2);
        assert_eq!(stats.total_findings, 2);
        assert_eq!(stats.high, 1);
        assert_eq!(stats.medium, 1);
        assert_eq!(stats.level_a, 1);
        assert_eq!(stats.level_aa, 1);
        assert_eq!(stats.avg_response_time_ms, Some(200.0));
    }

    #[test]
    fn test_statistics_for_empty_session() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let session_id = store
            .create_session("https://example.com", 50, "accesso/1.0")
            .unwrap();

        let stats = store.session_statistics(session_id).unwrap();
        assert_eq!(stats.total_pages, 0);
        assert_eq!(stats.total_findings, 0);
        assert!(stats.avg_response_time_ms.is_none());
    }
}
