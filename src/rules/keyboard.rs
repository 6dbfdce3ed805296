//! Keyboard operability checks (criterion 2.1.1)

use crate::rules::context::{selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};

/// Tags that receive keyboard focus and activation natively
const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

pub struct KeyboardRules;

impl Rule for KeyboardRules {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for el in ctx.select("[onclick]") {
            let tag = el.value().name();
            if INTERACTIVE_TAGS.contains(&tag) {
                continue;
            }
            let has_key_handler =
                el.value().attr("onkeypress").is_some() || el.value().attr("onkeydown").is_some();
            if !has_key_handler {
                findings.push(
                    Finding::new(
                        IssueKind::KeyboardAccessibility,
                        "2.1.1",
                        Level::A,
                        Severity::High,
                        format!("{} has a click handler but no keyboard handler", tag),
                        "Use a native button or add a keydown handler and tabindex",
                    )
                    .with_selector(selector_for(el))
                    .with_line(ctx.line_of(el)),
                );
            }
        }

        for el in ctx.select("a[tabindex], button[tabindex], input[tabindex], \
                              select[tabindex], textarea[tabindex]")
        {
            if let Some(raw) = el.value().attr("tabindex") {
                if let Ok(value) = raw.trim().parse::<i32>() {
                    if value < -1 {
                        findings.push(
                            Finding::new(
                                IssueKind::InvalidTabindex,
                                "2.1.1",
                                Level::A,
                                Severity::Medium,
                                format!("Invalid tabindex value {}", value),
                                "Use tabindex 0 to include an element in the tab order \
                                 or -1 to remove it",
                            )
                            .with_selector(selector_for(el))
                            .with_line(ctx.line_of(el)),
                        );
                    }
                }
            }
        }

        findings
    }
}
