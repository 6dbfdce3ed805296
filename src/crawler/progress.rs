//! Progress observation for session runs
//!
//! The traversal engine reports progress as events on an observer rather
//! than rendering anything itself, so a CLI, a worker log, or a test can
//! each subscribe in their own way.

use crate::storage::SessionStatus;

/// One progress event during a session run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    SessionStarted {
        session_id: i64,
        site_url: String,
        max_pages: u32,
    },
    PageStarted {
        url: String,
        audited: u32,
        budget: u32,
    },
    PageAudited {
        url: String,
        findings: u32,
    },
    PageSkipped {
        url: String,
        reason: String,
    },
    SessionFinished {
        session_id: i64,
        status: SessionStatus,
        total_pages: u32,
        total_findings: u32,
    },
}

/// Receives progress events from the traversal engine
pub trait ProgressObserver {
    fn on_event(&mut self, event: &ProgressEvent);
}

/// Discards all events
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_event(&mut self, _event: &ProgressEvent) {}
}

/// Forwards events to the tracing subscriber
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_event(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::SessionStarted {
                session_id,
                site_url,
                max_pages,
            } => {
                tracing::info!(
                    "Session {} started for {} (budget {} pages)",
                    session_id,
                    site_url,
                    max_pages
                );
            }
            ProgressEvent::PageStarted {
                url,
                audited,
                budget,
            } => {
                tracing::info!("Auditing {} ({}/{})", url, audited + 1, budget);
            }
            ProgressEvent::PageAudited { url, findings } => {
                tracing::info!("Audited {}: {} findings", url, findings);
            }
            ProgressEvent::PageSkipped { url, reason } => {
                tracing::warn!("Skipped {}: {}", url, reason);
            }
            ProgressEvent::SessionFinished {
                session_id,
                status,
                total_pages,
                total_findings,
            } => {
                tracing::info!(
                    "Session {} finished {}: {} pages, {} findings",
                    session_id,
                    status,
                    total_pages,
                    total_findings
                );
            }
        }
    }
}
