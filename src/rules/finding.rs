//! Finding types produced by the rule engine
//!
//! A [`Finding`] is one detected accessibility condition on a page, tagged
//! with a WCAG criterion, conformance level, severity, and confidence.

use std::fmt;

/// WCAG conformance level associated with a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    A,
    AA,
    AAA,
}

impl Level {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "AA" => Some(Self::AA),
            "AAA" => Some(Self::AAA),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Confidence the detector has in a finding
///
/// Heuristic detectors (contrast, decorative images, target size) report
/// lower confidence than deterministic ones (missing title, duplicate ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Enumerated tag for every condition the rule engine can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    // Images (1.1.1)
    MissingAltText,
    PoorAltTextQuality,

    // Heading structure (1.3.1)
    MissingH1,
    MultipleH1,
    HeadingSequence,
    EmptyHeading,

    // Lists and tables (1.3.1)
    EmptyList,
    InvalidDefinitionList,
    TableMissingCaption,
    TableMissingHeaders,

    // Keyboard access (2.1.1)
    KeyboardAccessibility,
    InvalidTabindex,

    // Page basics (2.4.1, 2.4.2, 3.1.1)
    SkipLinks,
    PageTitle,
    PageTitleQuality,
    PageLanguage,

    // Forms (3.3.2)
    FormLabels,
    MissingRequiredIndicator,

    // Markup validity and ARIA (4.1.1, 4.1.2)
    HtmlValidity,
    DuplicateIds,
    InvalidAriaAttribute,
    MissingAccessibleName,

    // Style heuristics (1.4.3, 2.4.7)
    ColorContrast,
    FocusVisible,

    // WCAG 2.2 additions (2.4.11, 2.4.13, 2.5.7, 2.5.8)
    TargetSizeTooSmall,
    ManualCheckTargetSize,
    ManualCheckDraggingMovements,
    ManualCheckFocusNotObscured,
    ManualCheckFocusAppearance,

    // Statutory compliance (European Accessibility Act)
    MissingAccessibilityStatement,
    MissingFeedbackMechanism,
}

impl IssueKind {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::MissingAltText => "missing_alt_text",
            Self::PoorAltTextQuality => "poor_alt_text_quality",
            Self::MissingH1 => "missing_h1",
            Self::MultipleH1 => "multiple_h1",
            Self::HeadingSequence => "heading_sequence",
            Self::EmptyHeading => "empty_heading",
            Self::EmptyList => "empty_list",
            Self::InvalidDefinitionList => "invalid_definition_list",
            Self::TableMissingCaption => "table_missing_caption",
            Self::TableMissingHeaders => "table_missing_headers",
            Self::KeyboardAccessibility => "keyboard_accessibility",
            Self::InvalidTabindex => "invalid_tabindex",
            Self::SkipLinks => "skip_links",
            Self::PageTitle => "page_title",
            Self::PageTitleQuality => "page_title_quality",
            Self::PageLanguage => "page_language",
            Self::FormLabels => "form_labels",
            Self::MissingRequiredIndicator => "missing_required_indicator",
            Self::HtmlValidity => "html_validity",
            Self::DuplicateIds => "duplicate_ids",
            Self::InvalidAriaAttribute => "invalid_aria_attribute",
            Self::MissingAccessibleName => "missing_accessible_name",
            Self::ColorContrast => "color_contrast",
            Self::FocusVisible => "focus_visible",
            Self::TargetSizeTooSmall => "target_size_too_small",
            Self::ManualCheckTargetSize => "manual_check_target_size",
            Self::ManualCheckDraggingMovements => "manual_check_dragging_movements",
            Self::ManualCheckFocusNotObscured => "manual_check_focus_not_obscured",
            Self::ManualCheckFocusAppearance => "manual_check_focus_appearance",
            Self::MissingAccessibilityStatement => "missing_accessibility_statement",
            Self::MissingFeedbackMechanism => "missing_feedback_mechanism",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        Self::all_kinds()
            .into_iter()
            .find(|kind| kind.to_db_string() == s)
    }

    /// True for findings that only flag something for human review rather
    /// than a detected violation
    pub fn is_manual_review(&self) -> bool {
        matches!(
            self,
            Self::ManualCheckTargetSize
                | Self::ManualCheckDraggingMovements
                | Self::ManualCheckFocusNotObscured
                | Self::ManualCheckFocusAppearance
        )
    }

    pub fn all_kinds() -> Vec<Self> {
        vec![
            Self::MissingAltText,
            Self::PoorAltTextQuality,
            Self::MissingH1,
            Self::MultipleH1,
            Self::HeadingSequence,
            Self::EmptyHeading,
            Self::EmptyList,
            Self::InvalidDefinitionList,
            Self::TableMissingCaption,
            Self::TableMissingHeaders,
            Self::KeyboardAccessibility,
            Self::InvalidTabindex,
            Self::SkipLinks,
            Self::PageTitle,
            Self::PageTitleQuality,
            Self::PageLanguage,
            Self::FormLabels,
            Self::MissingRequiredIndicator,
            Self::HtmlValidity,
            Self::DuplicateIds,
            Self::InvalidAriaAttribute,
            Self::MissingAccessibleName,
            Self::ColorContrast,
            Self::FocusVisible,
            Self::TargetSizeTooSmall,
            Self::ManualCheckTargetSize,
            Self::ManualCheckDraggingMovements,
            Self::ManualCheckFocusNotObscured,
            Self::ManualCheckFocusAppearance,
            Self::MissingAccessibilityStatement,
            Self::MissingFeedbackMechanism,
        ]
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// One detected accessibility condition on a page
#[derive(Debug, Clone)]
pub struct Finding {
    pub kind: IssueKind,
    pub criterion: &'static str,
    pub level: Level,
    pub severity: Severity,
    pub confidence: Confidence,
    pub selector: Option<String>,
    pub description: String,
    pub recommendation: String,
    pub help_url: Option<String>,
    pub line: Option<u32>,
}

impl Finding {
    pub fn new(
        kind: IssueKind,
        criterion: &'static str,
        level: Level,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            criterion,
            level,
            severity,
            confidence: Confidence::Medium,
            selector: None,
            description: description.into(),
            recommendation: recommendation.into(),
            help_url: None,
            line: None,
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_kind_roundtrip() {
        for kind in IssueKind::all_kinds() {
            let db = kind.to_db_string();
            assert_eq!(
                IssueKind::from_db_string(db),
                Some(kind),
                "roundtrip failed for {:?}",
                kind
            );
        }
    }

    #[test]
    fn test_level_roundtrip() {
        for level in [Level::A, Level::AA, Level::AAA] {
            assert_eq!(Level::from_db_string(level.to_db_string()), Some(level));
        }
        assert_eq!(Level::from_db_string("B"), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_finding_builder() {
        let finding = Finding::new(
            IssueKind::PageTitle,
            "2.4.2",
            Level::A,
            Severity::High,
            "Page title missing or empty",
            "Add a descriptive title in the head section",
        )
        .with_selector("title")
        .with_confidence(Confidence::High);

        assert_eq!(finding.kind, IssueKind::PageTitle);
        assert_eq!(finding.selector.as_deref(), Some("title"));
        assert_eq!(finding.confidence, Confidence::High);
        assert!(finding.help_url.is_none());
        assert!(finding.line.is_none());
    }
}
