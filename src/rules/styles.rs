//! Style-based heuristics: inline color pairs and suppressed focus outlines
//! (criteria 1.4.3, 2.4.7)
//!
//! Contrast ratios cannot be computed without a CSS cascade and rendering,
//! so these checks only flag spots that need a manual look.

use crate::rules::context::{selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Confidence, Finding, IssueKind, Level, Severity};

pub struct StyleHeuristicRules;

impl Rule for StyleHeuristicRules {
    fn name(&self) -> &'static str {
        "style_heuristics"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for el in ctx.select("[style]") {
            let style = el.value().attr("style").unwrap_or("").to_ascii_lowercase();
            if style.contains("color") && style.contains("background") {
                findings.push(
                    Finding::new(
                        IssueKind::ColorContrast,
                        "1.4.3",
                        Level::AA,
                        Severity::Medium,
                        "Inline foreground and background colors; contrast needs \
                         manual verification",
                        "Verify the color pair meets a 4.5:1 contrast ratio",
                    )
                    .with_selector(selector_for(el))
                    .with_confidence(Confidence::Low)
                    .with_line(ctx.line_of(el)),
                );
            }
        }

        if suppresses_focus_outline(ctx.raw) {
            findings.push(
                Finding::new(
                    IssueKind::FocusVisible,
                    "2.4.7",
                    Level::AA,
                    Severity::Medium,
                    "Stylesheet removes the focus outline",
                    "Keep a visible focus indicator or provide a custom one",
                )
                .with_selector("document"),
            );
        }

        findings
    }
}

/// Whitespace-tolerant scan for `outline: none` / `outline: 0` declarations
fn suppresses_focus_outline(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    let mut rest = lower.as_str();

    while let Some(pos) = rest.find("outline") {
        let after = rest[pos + "outline".len()..].trim_start();
        if let Some(value) = after.strip_prefix(':') {
            let value = value.trim_start();
            if value.starts_with("none") || value.starts_with('0') {
                return true;
            }
        }
        rest = &rest[pos + "outline".len()..];
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn check(html: &str) -> Vec<Finding> {
        let url = Url::parse("https://example.com/").unwrap();
        let ctx = PageContext::new(html, &url);
        StyleHeuristicRules.check(&ctx)
    }

    #[test]
    fn test_inline_color_pair_flags_manual_check() {
        let findings = check(r#"<p style="color: #777; background-color: #888">x</p>"#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::ColorContrast);
        assert_eq!(findings[0].confidence, Confidence::Low);
    }

    #[test]
    fn test_color_alone_passes() {
        let findings = check(r#"<p style="color: #777">x</p>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_outline_none_in_style_block() {
        let findings = check("<style>a:focus { outline: none; }</style>");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::FocusVisible);
    }

    #[test]
    fn test_outline_zero_with_odd_spacing() {
        let findings = check("<style>button:focus{outline :  0}</style>");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::FocusVisible);
    }

    #[test]
    fn test_visible_outline_passes() {
        let findings = check("<style>a:focus { outline: 2px solid blue; }</style>");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_outline_suppression_reported_once() {
        let findings = check(
            "<style>a:focus { outline: none; } button:focus { outline: none; }</style>",
        );
        assert_eq!(findings.len(), 1);
    }
}
