//! Markup validity and name/role checks (criteria 4.1.1, 4.1.2)

use crate::rules::context::{attr_nonempty, element_text, selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};
use scraper::ElementRef;
use std::collections::HashMap;

/// ARIA attributes the detector accepts without comment
const KNOWN_ARIA_ATTRIBUTES: &[&str] = &[
    "aria-label",
    "aria-labelledby",
    "aria-describedby",
    "aria-hidden",
    "aria-expanded",
    "aria-pressed",
    "aria-checked",
    "aria-selected",
    "aria-disabled",
    "aria-required",
    "aria-invalid",
    "aria-live",
    "aria-atomic",
    "aria-relevant",
    "aria-busy",
    "aria-controls",
];

pub struct MarkupRules;

impl Rule for MarkupRules {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        let html_tags = ctx.raw.to_ascii_lowercase().matches("<html").count();
        if html_tags > 1 {
            findings.push(
                Finding::new(
                    IssueKind::HtmlValidity,
                    "4.1.1",
                    Level::A,
                    Severity::High,
                    format!("Document contains {} html elements", html_tags),
                    "Serve a single well-formed document per response",
                )
                .with_selector("html"),
            );
        }

        findings.extend(duplicate_ids(ctx));
        findings.extend(unknown_aria(ctx));
        findings.extend(missing_accessible_names(ctx));

        findings
    }
}

fn duplicate_ids(ctx: &PageContext<'_>) -> Vec<Finding> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for el in ctx.select("[id]") {
        if let Some(id) = attr_nonempty(el, "id") {
            let entry = seen.entry(id.to_string()).or_insert(0);
            if *entry == 0 {
                order.push(id.to_string());
            }
            *entry += 1;
        }
    }

    order
        .into_iter()
        .filter(|id| seen[id] > 1)
        .map(|id| {
            Finding::new(
                IssueKind::DuplicateIds,
                "4.1.1",
                Level::A,
                Severity::High,
                format!("Id {:?} appears {} times", id, seen[&id]),
                "Make every id unique within the document",
            )
            .with_selector(format!("#{}", id))
            .with_line(ctx.line_containing(&format!("id=\"{}\"", id)))
        })
        .collect()
}

fn unknown_aria(ctx: &PageContext<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();

    for el in ctx.all_elements() {
        for (name, _) in el.value().attrs() {
            if name.starts_with("aria-") && !KNOWN_ARIA_ATTRIBUTES.contains(&name) {
                findings.push(
                    Finding::new(
                        IssueKind::InvalidAriaAttribute,
                        "4.1.2",
                        Level::A,
                        Severity::Medium,
                        format!("Unknown ARIA attribute {}", name),
                        "Use a valid ARIA attribute or remove it",
                    )
                    .with_selector(selector_for(el))
                    .with_line(ctx.line_of(el)),
                );
            }
        }
    }

    findings
}

fn missing_accessible_names(ctx: &PageContext<'_>) -> Vec<Finding> {
    let controls = ctx.select(
        "button, a[href], input[type=\"submit\"], input[type=\"button\"], \
         input[type=\"image\"], [role=\"button\"]",
    );

    controls
        .into_iter()
        .filter(|el| !has_accessible_name(*el))
        .map(|el| {
            Finding::new(
                IssueKind::MissingAccessibleName,
                "4.1.2",
                Level::A,
                Severity::High,
                format!("{} without an accessible name", el.value().name()),
                "Give the control visible text, an aria-label, or an alt attribute",
            )
            .with_selector(selector_for(el))
            .with_line(ctx.line_of(el))
        })
        .collect()
}

fn has_accessible_name(el: ElementRef<'_>) -> bool {
    if !element_text(el).is_empty()
        || attr_nonempty(el, "aria-label").is_some()
        || attr_nonempty(el, "aria-labelledby").is_some()
        || attr_nonempty(el, "title").is_some()
    {
        return true;
    }

    if el.value().name() == "input" {
        let input_type = el
            .value()
            .attr("type")
            .unwrap_or("text")
            .to_ascii_lowercase();
        match input_type.as_str() {
            "image" => return attr_nonempty(el, "alt").is_some(),
            "submit" | "button" | "reset" => return attr_nonempty(el, "value").is_some(),
            _ => {}
        }
    }

    // A linked image with alt text names the link
    el.descendants()
        .filter_map(ElementRef::wrap)
        .any(|d| d.value().name() == "img" && attr_nonempty(d, "alt").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn check(html: &str) -> Vec<Finding> {
        let url = Url::parse("https://example.com/").unwrap();
        let ctx = PageContext::new(html, &url);
        MarkupRules.check(&ctx)
    }

    fn kinds(findings: &[Finding]) -> Vec<IssueKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_duplicate_html_elements() {
        let findings = check("<html><body></body></html><html></html>");
        assert!(kinds(&findings).contains(&IssueKind::HtmlValidity));
    }

    #[test]
    fn test_duplicate_ids_one_finding_per_id() {
        let findings = check(
            r#"<div id="a"></div><span id="a"></span>
               <div id="a"></div><div id="b"></div>"#,
        );
        let dupes: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == IssueKind::DuplicateIds)
            .collect();
        assert_eq!(dupes.len(), 1);
        assert!(dupes[0].description.contains("3 times"));
        assert_eq!(dupes[0].selector.as_deref(), Some("#a"));
    }

    #[test]
    fn test_unknown_aria_attribute() {
        let findings = check(r#"<div aria-bogus="1"></div>"#);
        assert_eq!(kinds(&findings), vec![IssueKind::InvalidAriaAttribute]);
        assert!(findings[0].description.contains("aria-bogus"));
    }

    #[test]
    fn test_known_aria_attribute_passes() {
        let findings = check(r#"<div aria-hidden="true"></div>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_empty_button() {
        let findings = check("<button></button>");
        assert_eq!(kinds(&findings), vec![IssueKind::MissingAccessibleName]);
    }

    #[test]
    fn test_button_with_text_passes() {
        let findings = check("<button>Save</button>");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_icon_link_with_aria_label_passes() {
        let findings = check(r#"<a href="/x" aria-label="Close"></a>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_link_named_by_image_alt() {
        let findings = check(r#"<a href="/home"><img src="/h.png" alt="Home"></a>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_image_input_without_alt() {
        let findings = check(r#"<input type="image" src="/go.png">"#);
        assert_eq!(kinds(&findings), vec![IssueKind::MissingAccessibleName]);
    }

    #[test]
    fn test_submit_with_value_passes() {
        let findings = check(r#"<input type="submit" value="Send">"#);
        assert!(findings.is_empty());
    }
}
