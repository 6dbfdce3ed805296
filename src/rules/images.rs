//! Image checks: missing alt text and alt text quality (criterion 1.1.1)

use crate::rules::context::{has_ancestor, selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Confidence, Finding, IssueKind, Level, Severity};
use scraper::ElementRef;

/// Keywords in a class attribute or filename that suggest a decorative image
const DECORATIVE_KEYWORDS: &[&str] = &["icon", "decoration", "ornament", "spacer", "bullet"];

/// Filler words that add nothing to an alt text
const FILLER_WORDS: &[&str] = &["image", "picture", "photo", "graphic", "immagine", "foto"];

pub struct ImageRules;

impl Rule for ImageRules {
    fn name(&self) -> &'static str {
        "images"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for img in ctx.select("img") {
            match img.value().attr("alt") {
                None => {
                    if !is_probably_decorative(img) {
                        findings.push(missing_alt(ctx, img));
                    }
                }
                Some(alt) if alt.trim().is_empty() => {
                    // An explicit empty alt is the decorative-image idiom;
                    // an unnamed link around it is the markup module's concern
                }
                Some(alt) => {
                    let quality = assess_alt_quality(alt, img.value().attr("src").unwrap_or(""));
                    if quality.score <= 60 {
                        findings.push(
                            Finding::new(
                                IssueKind::PoorAltTextQuality,
                                "1.1.1",
                                Level::A,
                                Severity::Medium,
                                format!(
                                    "Alt text quality could be improved: {}",
                                    quality.problems.join(", ")
                                ),
                                "Rewrite the alt text to describe the image content \
                                 specifically and concisely",
                            )
                            .with_selector(selector_for(img))
                            .with_line(ctx.line_of(img)),
                        );
                    }
                }
            }
        }

        findings
    }
}

fn missing_alt(ctx: &PageContext<'_>, img: ElementRef<'_>) -> Finding {
    Finding::new(
        IssueKind::MissingAltText,
        "1.1.1",
        Level::A,
        Severity::High,
        "Image without an appropriate text alternative",
        "Add an alt attribute describing the image content",
    )
    .with_selector(selector_for(img))
    .with_confidence(Confidence::High)
    .with_line(ctx.line_of(img))
}

/// Heuristic: is this image likely decorative?
///
/// An image inside a link is never decorative (it carries the link's
/// purpose). Otherwise decorative keywords in the class attribute or the
/// source filename count as evidence.
fn is_probably_decorative(img: ElementRef<'_>) -> bool {
    if has_ancestor(img, "a") {
        return false;
    }

    if let Some(class) = img.value().attr("class") {
        let class = class.to_ascii_lowercase();
        if DECORATIVE_KEYWORDS.iter().any(|k| class.contains(k))
            || class.contains("bg-")
            || class.contains("background")
        {
            return true;
        }
    }

    if let Some(src) = img.value().attr("src") {
        let filename = src.rsplit('/').next().unwrap_or("").to_ascii_lowercase();
        if DECORATIVE_KEYWORDS.iter().any(|k| filename.contains(k))
            || filename.contains("bg-")
            || filename.contains("bg_")
        {
            return true;
        }
    }

    false
}

struct AltQuality {
    /// 0-100; 60 or below is reported
    score: i32,
    problems: Vec<&'static str>,
}

/// Scores an alt text: start at 100, deduct 40 for under 3 chars, 20 for
/// over 125 chars, 30 when it repeats the filename, 20 for filler words
fn assess_alt_quality(alt: &str, src: &str) -> AltQuality {
    let alt = alt.trim();
    let mut score = 100;
    let mut problems = Vec::new();

    if alt.chars().count() < 3 {
        problems.push("too short");
        score -= 40;
    }

    if alt.chars().count() > 125 {
        problems.push("too long");
        score -= 20;
    }

    let filename = src.rsplit('/').next().unwrap_or("");
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    if !stem.is_empty() && alt.to_ascii_lowercase().contains(&stem.to_ascii_lowercase()) {
        problems.push("contains the filename");
        score -= 30;
    }

    let alt_lower = alt.to_ascii_lowercase();
    if FILLER_WORDS.iter().any(|w| alt_lower.contains(w)) {
        problems.push("contains filler words");
        score -= 20;
    }

    AltQuality {
        score: score.max(0),
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn check(html: &str) -> Vec<Finding> {
        let url = Url::parse("https://example.com/").unwrap();
        let ctx = PageContext::new(html, &url);
        ImageRules.check(&ctx)
    }

    #[test]
    fn test_img_without_alt_flagged() {
        let findings = check(r#"<img src="/chart.png">"#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::MissingAltText);
        assert_eq!(findings[0].criterion, "1.1.1");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_explicit_empty_alt_is_decorative() {
        let findings = check(r#"<img src="/chart.png" alt="">"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_icon_class_is_decorative() {
        let findings = check(r#"<img src="/x.png" class="nav-icon">"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_spacer_filename_is_decorative() {
        let findings = check(r#"<img src="/assets/spacer.gif">"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_linked_image_with_empty_alt_passes() {
        let findings = check(r#"<a href="/home"><img src="/assets/home-icon.png" alt=""></a>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_linked_image_without_alt_is_never_decorative() {
        // The icon filename would count as decorative outside a link
        let findings = check(r#"<a href="/home"><img src="/assets/home-icon.png"></a>"#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::MissingAltText);
    }

    #[test]
    fn test_two_char_alt_is_poor_quality() {
        let findings = check(r#"<img src="/chart.png" alt="ab">"#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::PoorAltTextQuality);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_descriptive_alt_passes() {
        let findings = check(r#"<img src="/chart.png" alt="Quarterly sales by region">"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_filename_in_alt_alone_passes() {
        // A single 30-point deduction leaves the score above the threshold
        let findings = check(r#"<img src="/team.jpg" alt="Our team at the office">"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_filename_plus_filler_is_poor_quality() {
        let findings = check(r#"<img src="/team.jpg" alt="photo of team">"#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::PoorAltTextQuality);
        assert!(findings[0].description.contains("filename"));
        assert!(findings[0].description.contains("filler"));
    }

    #[test]
    fn test_overlong_alt_with_filler_is_poor_quality() {
        let long_alt = format!("picture of {}", "a".repeat(130));
        let findings = check(&format!(r#"<img src="/x.png" alt="{}">"#, long_alt));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IssueKind::PoorAltTextQuality);
    }
}
