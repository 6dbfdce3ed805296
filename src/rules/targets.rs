//! WCAG 2.2 target size and manual-review checks
//! (criteria 2.5.8, 2.5.7, 2.4.11, 2.4.13)
//!
//! Static markup rarely pins down rendered dimensions, so the size check
//! only fires when both dimensions are declared inline; everything else
//! funnels into manual-review findings.

use crate::rules::context::{selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Confidence, Finding, IssueKind, Level, Severity};
use scraper::ElementRef;

const MIN_TARGET_PX: f64 = 24.0;

pub struct TargetSizeRules;

impl Rule for TargetSizeRules {
    fn name(&self) -> &'static str {
        "target_size"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut any_unknown = false;

        let targets = ctx.select(
            "a[href], button, input[type=\"button\"], input[type=\"submit\"], \
             input[type=\"reset\"]",
        );

        for target in targets {
            match declared_size(target) {
                (Some(w), Some(h)) => {
                    if w < MIN_TARGET_PX || h < MIN_TARGET_PX {
                        findings.push(
                            Finding::new(
                                IssueKind::TargetSizeTooSmall,
                                "2.5.8",
                                Level::AA,
                                Severity::Medium,
                                format!("Interactive target is {}x{} px", w, h),
                                "Make interactive targets at least 24x24 CSS pixels",
                            )
                            .with_selector(selector_for(target))
                            .with_line(ctx.line_of(target)),
                        );
                    }
                }
                _ => any_unknown = true,
            }
        }

        if any_unknown {
            findings.push(
                Finding::new(
                    IssueKind::ManualCheckTargetSize,
                    "2.5.8",
                    Level::AA,
                    Severity::Low,
                    "Interactive targets with undeclared dimensions; verify sizes \
                     in the rendered page",
                    "Check that every target is at least 24x24 CSS pixels",
                )
                .with_selector("document")
                .with_confidence(Confidence::Low),
            );
        }

        findings.push(manual_check(
            IssueKind::ManualCheckDraggingMovements,
            "2.5.7",
            "Verify any dragging interaction has a single-pointer alternative",
        ));
        findings.push(manual_check(
            IssueKind::ManualCheckFocusNotObscured,
            "2.4.11",
            "Verify focused elements are not hidden behind sticky headers or overlays",
        ));
        findings.push(manual_check(
            IssueKind::ManualCheckFocusAppearance,
            "2.4.13",
            "Verify the focus indicator is large and contrasting enough",
        ));

        findings
    }
}

fn manual_check(kind: IssueKind, criterion: &'static str, recommendation: &str) -> Finding {
    Finding::new(
        kind,
        criterion,
        Level::AA,
        Severity::Low,
        "Cannot be verified from static markup; manual review needed",
        recommendation,
    )
    .with_selector("document")
    .with_confidence(Confidence::Low)
}

/// Width and height declared via attributes or inline style, in CSS pixels
fn declared_size(el: ElementRef<'_>) -> (Option<f64>, Option<f64>) {
    let mut width = parse_px(el.value().attr("width").unwrap_or(""));
    let mut height = parse_px(el.value().attr("height").unwrap_or(""));

    if let Some(style) = el.value().attr("style") {
        for decl in style.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let value = parse_px(value.trim());
            match prop.as_str() {
                "width" | "min-width" => width = value.or(width),
                "height" | "min-height" => height = value.or(height),
                _ => {}
            }
        }
    }

    (width, height)
}

fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let digits = value.strip_suffix("px").unwrap_or(value).trim();
    digits.parse().ok()
}
