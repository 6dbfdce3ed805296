//! Statutory checks: accessibility statement and feedback channel (EAA)

use crate::rules::context::{element_text, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};

pub struct StatementRules;

impl Rule for StatementRules {
    fn name(&self) -> &'static str {
        "statement"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let links = ctx.select("a[href]");

        let has_statement_link = links.iter().any(|a| {
            let text = element_text(*a).to_lowercase();
            let href = a.value().attr("href").unwrap_or("").to_lowercase();
            text.contains("accessibilit") || href.contains("accessibility")
        });
        if !has_statement_link {
            findings.push(
                Finding::new(
                    IssueKind::MissingAccessibilityStatement,
                    "EAA",
                    Level::AA,
                    Severity::High,
                    "No link to an accessibility statement found",
                    "Publish an accessibility statement and link it from every page",
                )
                .with_selector("document"),
            );
        }

        let has_feedback = links.iter().any(|a| {
            let href = a.value().attr("href").unwrap_or("").to_lowercase();
            let text = element_text(*a).to_lowercase();
            href.starts_with("mailto:") || text.contains("contatt") || text.contains("contact")
        }) || !ctx.select("form textarea").is_empty();
        if !has_feedback {
            findings.push(
                Finding::new(
                    IssueKind::MissingFeedbackMechanism,
                    "EAA",
                    Level::AA,
                    Severity::Medium,
                    "No feedback channel found on the page",
                    "Provide a contact link or feedback form for accessibility issues",
                )
                .with_selector("document"),
            );
        }

        findings
    }
}
