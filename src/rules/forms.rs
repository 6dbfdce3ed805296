//! Form labelling checks (criterion 3.3.2)

use crate::rules::context::{attr_nonempty, element_text, has_ancestor, selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};
use scraper::ElementRef;

/// Input types that carry their own visible label in the value attribute
const SELF_LABELLED_TYPES: &[&str] = &["submit", "button", "reset"];

pub struct FormLabelRules;

impl Rule for FormLabelRules {
    fn name(&self) -> &'static str {
        "form_labels"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let labels = ctx.select("label");

        for field in ctx.select("input, select, textarea") {
            let input_type = field
                .value()
                .attr("type")
                .unwrap_or("text")
                .to_ascii_lowercase();
            if input_type == "hidden" {
                continue;
            }

            if !is_labelled(field, &labels) {
                let severity = if SELF_LABELLED_TYPES.contains(&input_type.as_str()) {
                    Severity::Medium
                } else {
                    Severity::High
                };
                findings.push(
                    Finding::new(
                        IssueKind::FormLabels,
                        "3.3.2",
                        Level::A,
                        severity,
                        "Form field without an associated label",
                        "Associate a label via for/id, wrap the field in a label, \
                         or add aria-label",
                    )
                    .with_selector(selector_for(field))
                    .with_line(ctx.line_of(field)),
                );
                continue;
            }

            if is_required(field) && !has_required_indicator(field, &labels) {
                findings.push(
                    Finding::new(
                        IssueKind::MissingRequiredIndicator,
                        "3.3.2",
                        Level::A,
                        Severity::Medium,
                        "Required field without a visible required indicator",
                        "Mark required fields in the label text and with aria-required",
                    )
                    .with_selector(selector_for(field))
                    .with_line(ctx.line_of(field)),
                );
            }
        }

        findings
    }
}

fn label_for<'d>(field: ElementRef<'d>, labels: &[ElementRef<'d>]) -> Option<ElementRef<'d>> {
    let id = attr_nonempty(field, "id")?;
    labels
        .iter()
        .find(|l| l.value().attr("for") == Some(id))
        .copied()
}

fn is_labelled(field: ElementRef<'_>, labels: &[ElementRef<'_>]) -> bool {
    label_for(field, labels).is_some()
        || has_ancestor(field, "label")
        || attr_nonempty(field, "aria-label").is_some()
        || attr_nonempty(field, "aria-labelledby").is_some()
}

fn is_required(field: ElementRef<'_>) -> bool {
    field.value().attr("required").is_some() || field.value().attr("aria-required").is_some()
}

fn has_required_indicator(field: ElementRef<'_>, labels: &[ElementRef<'_>]) -> bool {
    if field.value().attr("aria-required") == Some("true") {
        return true;
    }

    let label_text = label_for(field, labels)
        .map(element_text)
        .or_else(|| {
            field
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|a| a.value().name() == "label")
                .map(element_text)
        })
        .unwrap_or_default()
        .to_lowercase();

    label_text.contains('*')
        || label_text.contains("richiesto")
        || label_text.contains("required")
        || label_text.contains("obbligatorio")
}
