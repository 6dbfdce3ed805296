//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Accesso database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track audit sessions
CREATE TABLE IF NOT EXISTS audit_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_url TEXT NOT NULL,
    max_pages INTEGER NOT NULL,
    user_agent TEXT NOT NULL,
    status TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    total_pages INTEGER NOT NULL DEFAULT 0,
    total_findings INTEGER NOT NULL DEFAULT 0,
    pending_queue TEXT
);

CREATE INDEX IF NOT EXISTS idx_sessions_status ON audit_sessions(status);

-- One row per successfully fetched and evaluated page
CREATE TABLE IF NOT EXISTS page_audits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES audit_sessions(id),
    url TEXT NOT NULL,
    final_url TEXT NOT NULL,
    title TEXT,
    meta_description TEXT,
    status_code INTEGER NOT NULL,
    response_time_ms INTEGER NOT NULL,
    content_length INTEGER NOT NULL,
    redirect_count INTEGER NOT NULL DEFAULT 0,
    heading_count INTEGER NOT NULL DEFAULT 0,
    image_count INTEGER NOT NULL DEFAULT 0,
    link_count INTEGER NOT NULL DEFAULT 0,
    form_count INTEGER NOT NULL DEFAULT 0,
    findings_total INTEGER NOT NULL DEFAULT 0,
    findings_level_a INTEGER NOT NULL DEFAULT 0,
    findings_level_aa INTEGER NOT NULL DEFAULT 0,
    findings_level_aaa INTEGER NOT NULL DEFAULT 0,
    audited_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_audits_session ON page_audits(session_id);
CREATE INDEX IF NOT EXISTS idx_page_audits_url ON page_audits(url);

-- One row per detected accessibility condition
CREATE TABLE IF NOT EXISTS findings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES page_audits(id),
    issue_type TEXT NOT NULL,
    criterion TEXT NOT NULL,
    level TEXT NOT NULL,
    severity TEXT NOT NULL,
    confidence TEXT NOT NULL,
    selector TEXT,
    description TEXT NOT NULL,
    recommendation TEXT NOT NULL,
    help_url TEXT,
    source_line INTEGER
);

CREATE INDEX IF NOT EXISTS idx_findings_page ON findings(page_id);
CREATE INDEX IF NOT EXISTS idx_findings_severity ON findings(severity);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize_schema(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["audit_sessions", "page_audits", "findings"] {
            let count: Result<i64, _> = conn.query_row(
                &format!(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='{}'",
                    table
                ),
                [],
                |row| row.get(0),
            );
            assert!(count.is_ok());
            assert_eq!(count.unwrap(), 1, "Table {} should exist", table);
        }
    }
}
