//! Immutable WCAG criterion catalogue
//!
//! Metadata for every criterion the detectors emit, plus the issue-type to
//! W3C "Understanding" document map used to fill in help references.

use crate::rules::finding::{IssueKind, Level};

/// Metadata for one WCAG success criterion
#[derive(Debug, Clone, Copy)]
pub struct CriterionInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub level: Level,
}

/// All criteria covered by the detector set
///
/// `EAA` is not a WCAG criterion; it tags the statutory European
/// Accessibility Act checks.
pub const CRITERIA: &[CriterionInfo] = &[
    CriterionInfo {
        id: "1.1.1",
        name: "Non-text Content",
        level: Level::A,
    },
    CriterionInfo {
        id: "1.3.1",
        name: "Info and Relationships",
        level: Level::A,
    },
    CriterionInfo {
        id: "1.4.3",
        name: "Contrast (Minimum)",
        level: Level::AA,
    },
    CriterionInfo {
        id: "2.1.1",
        name: "Keyboard",
        level: Level::A,
    },
    CriterionInfo {
        id: "2.4.1",
        name: "Bypass Blocks",
        level: Level::A,
    },
    CriterionInfo {
        id: "2.4.2",
        name: "Page Titled",
        level: Level::A,
    },
    CriterionInfo {
        id: "2.4.7",
        name: "Focus Visible",
        level: Level::AA,
    },
    CriterionInfo {
        id: "2.4.11",
        name: "Focus Not Obscured (Minimum)",
        level: Level::AA,
    },
    CriterionInfo {
        id: "2.4.13",
        name: "Focus Appearance",
        level: Level::AA,
    },
    CriterionInfo {
        id: "2.5.7",
        name: "Dragging Movements",
        level: Level::AA,
    },
    CriterionInfo {
        id: "2.5.8",
        name: "Target Size (Minimum)",
        level: Level::AA,
    },
    CriterionInfo {
        id: "3.1.1",
        name: "Language of Page",
        level: Level::A,
    },
    CriterionInfo {
        id: "3.3.2",
        name: "Labels or Instructions",
        level: Level::A,
    },
    CriterionInfo {
        id: "4.1.1",
        name: "Parsing",
        level: Level::A,
    },
    CriterionInfo {
        id: "4.1.2",
        name: "Name, Role, Value",
        level: Level::A,
    },
    CriterionInfo {
        id: "EAA",
        name: "European Accessibility Act",
        level: Level::AA,
    },
];

/// Looks up catalogue metadata for a criterion id
pub fn criterion(id: &str) -> Option<&'static CriterionInfo> {
    CRITERIA.iter().find(|c| c.id == id)
}

const UNDERSTANDING_BASE: &str = "https://www.w3.org/WAI/WCAG22/Understanding/";

/// Returns the help reference for an issue, falling back to the generic
/// Understanding index when the criterion is in the catalogue
pub fn help_url(kind: IssueKind, criterion_id: &str) -> Option<String> {
    let page = match kind {
        IssueKind::MissingAltText | IssueKind::PoorAltTextQuality => Some("non-text-content.html"),
        IssueKind::ColorContrast => Some("contrast-minimum.html"),
        IssueKind::FormLabels | IssueKind::MissingRequiredIndicator => {
            Some("labels-or-instructions.html")
        }
        IssueKind::PageTitle | IssueKind::PageTitleQuality => Some("page-titled.html"),
        IssueKind::PageLanguage => Some("language-of-page.html"),
        IssueKind::SkipLinks => Some("bypass-blocks.html"),
        IssueKind::FocusVisible => Some("focus-visible.html"),
        IssueKind::TargetSizeTooSmall | IssueKind::ManualCheckTargetSize => {
            Some("target-size-minimum.html")
        }
        IssueKind::ManualCheckDraggingMovements => Some("dragging-movements.html"),
        _ => None,
    };

    match page {
        Some(page) => Some(format!("{}{}", UNDERSTANDING_BASE, page)),
        None => criterion(criterion_id).map(|_| UNDERSTANDING_BASE.to_string()),
    }
}
