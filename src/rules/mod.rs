//! Rule engine module: WCAG 2.2 detectors and the types they produce
//!
//! Each detector category lives in its own module and implements [`Rule`].
//! The fixed evaluation order matches the original audit sequence: level A
//! structural checks first, then AA heuristics, then the WCAG 2.2 additions
//! and statutory checks.

mod catalog;
mod context;
mod engine;
mod finding;

mod forms;
mod headings;
mod images;
mod keyboard;
mod markup;
mod page;
mod statement;
mod structures;
mod styles;
mod targets;

pub use catalog::{criterion, help_url, CriterionInfo, CRITERIA};
pub use context::{attr_nonempty, element_text, has_ancestor, selector_for, PageContext};
pub use engine::{Rule, RuleEngine};
pub use finding::{Confidence, Finding, IssueKind, Level, Severity};

/// The full fixed detector set, in evaluation order
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(images::ImageRules),
        Box::new(headings::HeadingRules),
        Box::new(structures::StructureRules),
        Box::new(keyboard::KeyboardRules),
        Box::new(page::PageBasicsRules),
        Box::new(forms::FormLabelRules),
        Box::new(markup::MarkupRules),
        Box::new(styles::StyleHeuristicRules),
        Box::new(targets::TargetSizeRules),
        Box::new(statement::StatementRules),
    ]
}
