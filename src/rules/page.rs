//! Page-level basics: skip links, title, document language
//! (criteria 2.4.1, 2.4.2, 3.1.1)

use crate::rules::context::{element_text, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};

pub struct PageBasicsRules;

impl Rule for PageBasicsRules {
    fn name(&self) -> &'static str {
        "page_basics"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        if !has_skip_link(ctx) {
            findings.push(
                Finding::new(
                    IssueKind::SkipLinks,
                    "2.4.1",
                    Level::A,
                    Severity::Medium,
                    "No skip link to the main content",
                    "Add a link at the top of the page that jumps to the main content",
                )
                .with_selector("document"),
            );
        }

        findings.extend(check_title(ctx));

        let html_has_lang = ctx
            .select("html")
            .first()
            .map(|html| {
                html.value()
                    .attr("lang")
                    .map(|l| !l.trim().is_empty())
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !html_has_lang {
            findings.push(
                Finding::new(
                    IssueKind::PageLanguage,
                    "3.1.1",
                    Level::A,
                    Severity::Medium,
                    "Document language not declared",
                    "Add a lang attribute to the html element",
                )
                .with_selector("html"),
            );
        }

        findings
    }
}

fn has_skip_link(ctx: &PageContext<'_>) -> bool {
    ctx.select(r##"a[href*="#"]"##).iter().any(|a| {
        let text = element_text(*a).to_lowercase();
        text.contains("salta") || text.contains("skip")
    })
}

fn check_title(ctx: &PageContext<'_>) -> Option<Finding> {
    let title = ctx
        .select("title")
        .first()
        .map(|t| element_text(*t))
        .unwrap_or_default();

    if title.is_empty() {
        return Some(
            Finding::new(
                IssueKind::PageTitle,
                "2.4.2",
                Level::A,
                Severity::High,
                "Page title missing or empty",
                "Add a title element that describes the page",
            )
            .with_selector("title"),
        );
    }

    let len = title.chars().count();
    if !(10..=60).contains(&len) {
        let problem = if len < 10 { "too short" } else { "too long" };
        return Some(
            Finding::new(
                IssueKind::PageTitleQuality,
                "2.4.2",
                Level::A,
                Severity::Medium,
                format!("Page title is {} ({} characters)", problem, len),
                "Aim for a descriptive title between 10 and 60 characters",
            )
            .with_selector("title"),
        );
    }

    None
}
