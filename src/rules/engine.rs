//! Rule engine: ordered detector registry with a panic boundary
//!
//! Detectors are independent and side-effect-free. The engine runs the full
//! fixed set against a page context and concatenates the results; a detector
//! that panics is logged and contributes zero findings for that page, leaving
//! the other detectors and pages unaffected.

use crate::rules::catalog;
use crate::rules::context::PageContext;
use crate::rules::finding::Finding;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// One independent accessibility detector
pub trait Rule: Send + Sync {
    /// Short stable name, used in logs when the detector fails
    fn name(&self) -> &'static str;

    /// Evaluates the page and returns zero or more findings
    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding>;
}

/// Runs the fixed, ordered set of detectors against a page
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_rules(crate::rules::default_rules())
    }
}

impl RuleEngine {
    /// Builds an engine over an explicit detector list (used by tests)
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Number of registered detectors
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluates every detector against the page and concatenates findings
    ///
    /// Help references are filled from the criterion catalogue for findings
    /// that did not set one themselves.
    pub fn evaluate(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for rule in &self.rules {
            match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
                Ok(mut batch) => findings.append(&mut batch),
                Err(_) => {
                    tracing::error!(
                        "Detector {} failed on {}; it contributes no findings for this page",
                        rule.name(),
                        ctx.url
                    );
                }
            }
        }

        for finding in &mut findings {
            if finding.help_url.is_none() {
                finding.help_url = catalog::help_url(finding.kind, finding.criterion);
            }
        }

        findings
    }
}
