//! Session traversal engine
//!
//! Owns the visited-set/queue state machine for one session run and drives
//! fetch, parse, rule evaluation, and persistence for each URL. A URL joins
//! the visited set before it is dispatched to the fetcher, so a failed fetch
//! can never be re-enqueued; the visited set and the pending queue stay
//! disjoint at every observation point.

use crate::config::{Config, MAX_PAGE_BUDGET};
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::parser::{extract_hrefs, page_metadata};
use crate::crawler::progress::{NullObserver, ProgressEvent, ProgressObserver};
use crate::rules::{Level, PageContext, RuleEngine};
use crate::storage::{PageAudit, SessionStatus, SessionStore, StorageError};
use crate::{AuditError, Result};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Traversal engine: breadth-first crawl-and-audit over one site
pub struct Crawler<S: SessionStore> {
    store: S,
    client: Client,
    rules: RuleEngine,
    config: Config,
    observer: Box<dyn ProgressObserver>,
}

impl<S: SessionStore> Crawler<S> {
    pub fn new(store: S, client: Client, config: Config) -> Self {
        Self {
            store,
            client,
            rules: RuleEngine::default(),
            config,
            observer: Box::new(NullObserver),
        }
    }

    /// Replaces the progress observer
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Read access to the session store, for inspecting results after a run
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a new audit session against `site_url`
    ///
    /// # Arguments
    ///
    /// * `site_url` - Root URL of the site to audit
    /// * `max_pages` - Page budget override; defaults to the configured value
    ///
    /// # Returns
    ///
    /// The ID of the created session
    pub async fn start(&mut self, site_url: &str, max_pages: Option<u32>) -> Result<i64> {
        let root = Url::parse(site_url)?;
        let budget = max_pages
            .unwrap_or(self.config.crawler.max_pages)
            .clamp(1, MAX_PAGE_BUDGET);

        let session_id =
            self.store
                .create_session(root.as_str(), budget, &self.config.user_agent.header_value())?;

        self.observer.on_event(&ProgressEvent::SessionStarted {
            session_id,
            site_url: root.to_string(),
            max_pages: budget,
        });

        let queue = VecDeque::from([root.to_string()]);
        self.run_session(session_id, root, budget, HashSet::new(), queue, 0, 0)
            .await?;

        Ok(session_id)
    }

    /// Resumes a paused (or interrupted) session
    ///
    /// The visited set is rebuilt from the session's persisted page audits
    /// and the queue from its serialized pending-queue. Resuming a session
    /// whose pending queue is empty is a no-op: status and counts are left
    /// untouched.
    pub async fn resume(&mut self, session_id: i64) -> Result<()> {
        let session = self.store.get_session(session_id).map_err(|e| match e {
            StorageError::SessionNotFound(id) => AuditError::SessionNotFound(id),
            other => AuditError::Storage(other),
        })?;

        if !session.status.is_resumable() {
            return Err(AuditError::NotResumable {
                id: session_id,
                status: session.status,
            });
        }

        let queue: VecDeque<String> = self.store.pending_queue(session_id)?.into();
        if queue.is_empty() {
            tracing::info!("Session {} has an empty pending queue; nothing to do", session_id);
            return Ok(());
        }

        let root = Url::parse(&session.site_url)?;
        let visited: HashSet<String> =
            self.store.session_page_urls(session_id)?.into_iter().collect();

        // A resumed run gets its own budget, never smaller than the persisted
        // backlog: a paused session can always finish its queue without a
        // budget change, while new discoveries stay bounded per run.
        let backlog = queue.len() as u32;
        let budget = session.total_pages + session.max_pages.max(backlog);

        self.store
            .update_session_status(session_id, SessionStatus::Running)?;

        self.observer.on_event(&ProgressEvent::SessionStarted {
            session_id,
            site_url: session.site_url.clone(),
            max_pages: budget,
        });

        self.run_session(
            session_id,
            root,
            budget,
            visited,
            queue,
            session.total_pages,
            session.total_findings,
        )
        .await
    }

    /// Resumes every eligible session in turn
    ///
    /// A failure in one session is logged and does not stop the others.
    ///
    /// # Returns
    ///
    /// The number of sessions resumed without error
    pub async fn resume_pending(&mut self) -> Result<usize> {
        let sessions = self.store.list_resumable_sessions()?;
        tracing::info!("Found {} resumable sessions", sessions.len());

        let mut resumed = 0;
        for session in sessions {
            match self.resume(session.id).await {
                Ok(()) => resumed += 1,
                Err(e) => {
                    tracing::error!("Failed to resume session {}: {}", session.id, e);
                }
            }
        }

        Ok(resumed)
    }

    /// Shared main loop for fresh and resumed runs
    ///
    /// On a clean exit the session terminates `completed` (queue drained) or
    /// `paused` (budget reached, remaining queue persisted in order). Any
    /// storage failure at the session level marks the session `error` and
    /// propagates.
    #[allow(clippy::too_many_arguments)]
    async fn run_session(
        &mut self,
        session_id: i64,
        root: Url,
        budget: u32,
        visited: HashSet<String>,
        queue: VecDeque<String>,
        audited: u32,
        findings_total: u32,
    ) -> Result<()> {
        match self
            .run_loop(session_id, root, budget, visited, queue, audited, findings_total)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Err(mark) = self
                    .store
                    .update_session_status(session_id, SessionStatus::Error)
                {
                    tracing::error!("Failed to mark session {} as errored: {}", session_id, mark);
                }
                Err(e)
            }
        }
    }

    async fn run_loop(
        &mut self,
        session_id: i64,
        root: Url,
        budget: u32,
        mut visited: HashSet<String>,
        mut queue: VecDeque<String>,
        mut audited: u32,
        mut findings_total: u32,
    ) -> Result<()> {
        // Mirror of the queue for O(1) membership checks
        let mut queued: HashSet<String> = queue.iter().cloned().collect();

        while audited < budget {
            let Some(url) = queue.pop_front() else {
                break;
            };
            queued.remove(&url);

            // Tolerate stale duplicates left in a persisted queue
            if !visited.insert(url.clone()) {
                continue;
            }

            self.observer.on_event(&ProgressEvent::PageStarted {
                url: url.clone(),
                audited,
                budget,
            });

            let Ok(page_url) = Url::parse(&url) else {
                self.observer.on_event(&ProgressEvent::PageSkipped {
                    url,
                    reason: "invalid URL".to_string(),
                });
                continue;
            };

            let outcome =
                fetch_page(&self.client, &page_url, self.config.crawler.max_redirects).await;
            let FetchOutcome::Success {
                final_url,
                status_code,
                body,
                elapsed_ms,
                redirect_count,
            } = outcome
            else {
                self.observer.on_event(&ProgressEvent::PageSkipped {
                    url,
                    reason: outcome.skip_reason(),
                });
                continue;
            };

            let ctx = PageContext::new(&body, &page_url);
            let metadata = page_metadata(&ctx);
            let findings = self.rules.evaluate(&ctx);

            let page = PageAudit {
                session_id,
                url: url.clone(),
                final_url: final_url.to_string(),
                title: metadata.title,
                meta_description: metadata.meta_description,
                status_code,
                response_time_ms: elapsed_ms,
                content_length: body.len() as u64,
                redirect_count,
                heading_count: metadata.heading_count,
                image_count: metadata.image_count,
                link_count: metadata.link_count,
                form_count: metadata.form_count,
            };

            let page_id = match self.store.insert_page(&page) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::error!("Failed to persist page audit for {}: {}", url, e);
                    None
                }
            };

            if let Some(page_id) = page_id {
                let mut by_level = [0u32; 3];
                for finding in &findings {
                    match finding.level {
                        Level::A => by_level[0] += 1,
                        Level::AA => by_level[1] += 1,
                        Level::AAA => by_level[2] += 1,
                    }
                    if let Err(e) = self.store.insert_finding(page_id, finding) {
                        tracing::error!("Failed to persist a finding for {}: {}", url, e);
                    }
                }
                if let Err(e) = self.store.update_page_counts(
                    page_id,
                    findings.len() as u32,
                    by_level[0],
                    by_level[1],
                    by_level[2],
                ) {
                    tracing::error!("Failed to update finding counts for {}: {}", url, e);
                }

                audited += 1;
                findings_total += findings.len() as u32;
            }

            let hrefs = extract_hrefs(&ctx);
            for link in crate::url::normalize_all(hrefs.iter().map(String::as_str), &root) {
                let link = link.to_string();
                if !visited.contains(&link) && !queued.contains(&link) {
                    queued.insert(link.clone());
                    queue.push_back(link);
                }
            }

            self.observer.on_event(&ProgressEvent::PageAudited {
                url,
                findings: findings.len() as u32,
            });
        }

        let status = if queue.is_empty() {
            self.store.set_pending_queue(session_id, None)?;
            SessionStatus::Completed
        } else {
            let remaining: Vec<String> = queue.into_iter().collect();
            self.store.set_pending_queue(session_id, Some(&remaining))?;
            SessionStatus::Paused
        };

        self.store
            .finish_session(session_id, status, audited, findings_total)?;

        self.observer.on_event(&ProgressEvent::SessionFinished {
            session_id,
            status,
            total_pages: audited,
            total_findings: findings_total,
        });

        Ok(())
    }
}
