//! Heading structure checks (criterion 1.3.1)

use crate::rules::context::{element_text, selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};

pub struct HeadingRules;

impl Rule for HeadingRules {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        let h1s = ctx.select("h1");
        if h1s.is_empty() {
            findings.push(
                Finding::new(
                    IssueKind::MissingH1,
                    "1.3.1",
                    Level::A,
                    Severity::High,
                    "Page has no h1 heading",
                    "Add a single h1 that describes the main content of the page",
                )
                .with_selector("document"),
            );
        } else if h1s.len() > 1 {
            findings.push(
                Finding::new(
                    IssueKind::MultipleH1,
                    "1.3.1",
                    Level::A,
                    Severity::Medium,
                    format!("Page has {} h1 headings", h1s.len()),
                    "Use a single h1 per page and demote the others",
                )
                .with_selector("h1"),
            );
        }

        let headings = ctx.select("h1, h2, h3, h4, h5, h6");

        let mut prev_level: Option<u32> = None;
        for heading in &headings {
            let level = heading_level(heading.value().name());
            if let (Some(prev), Some(cur)) = (prev_level, level) {
                if cur > prev + 1 {
                    findings.push(
                        Finding::new(
                            IssueKind::HeadingSequence,
                            "1.3.1",
                            Level::A,
                            Severity::Medium,
                            format!("Heading level jumps from h{} to h{}", prev, cur),
                            "Do not skip heading levels; nest headings sequentially",
                        )
                        .with_selector(selector_for(*heading))
                        .with_line(ctx.line_of(*heading)),
                    );
                }
            }
            if level.is_some() {
                prev_level = level;
            }
        }

        for heading in &headings {
            if element_text(*heading).is_empty() {
                findings.push(
                    Finding::new(
                        IssueKind::EmptyHeading,
                        "1.3.1",
                        Level::A,
                        Severity::High,
                        format!("Empty {} heading", heading.value().name()),
                        "Remove the empty heading or give it text content",
                    )
                    .with_selector(selector_for(*heading))
                    .with_line(ctx.line_of(*heading)),
                );
            }
        }

        findings
    }
}

fn heading_level(tag: &str) -> Option<u32> {
    tag.strip_prefix('h')?.parse().ok()
}
