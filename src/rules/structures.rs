//! List and table structure checks (criterion 1.3.1)

use crate::rules::context::{attr_nonempty, selector_for, PageContext};
use crate::rules::engine::Rule;
use crate::rules::finding::{Finding, IssueKind, Level, Severity};
use scraper::ElementRef;

pub struct StructureRules;

impl Rule for StructureRules {
    fn name(&self) -> &'static str {
        "structures"
    }

    fn check(&self, ctx: &PageContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for list in ctx.select("ul, ol") {
            if !has_direct_child(list, "li") {
                findings.push(
                    Finding::new(
                        IssueKind::EmptyList,
                        "1.3.1",
                        Level::A,
                        Severity::Medium,
                        format!("{} element without li children", list.value().name()),
                        "Remove the empty list or add list items",
                    )
                    .with_selector(selector_for(list))
                    .with_line(ctx.line_of(list)),
                );
            }
        }

        for dl in ctx.select("dl") {
            let has_dt = descendant_count(dl, "dt") > 0;
            let has_dd = descendant_count(dl, "dd") > 0;
            if !has_dt || !has_dd {
                findings.push(
                    Finding::new(
                        IssueKind::InvalidDefinitionList,
                        "1.3.1",
                        Level::A,
                        Severity::Medium,
                        "Definition list without both dt and dd entries",
                        "Pair every term (dt) with at least one description (dd)",
                    )
                    .with_selector(selector_for(dl))
                    .with_line(ctx.line_of(dl)),
                );
            }
        }

        for table in ctx.select("table") {
            let rows = descendant_count(table, "tr");
            let header_cells = descendant_count(table, "th");

            // A single-row table is commonly layout; data tables have more
            if rows > 1 && header_cells == 0 {
                findings.push(
                    Finding::new(
                        IssueKind::TableMissingHeaders,
                        "1.3.1",
                        Level::A,
                        Severity::High,
                        "Data table without header cells",
                        "Mark header cells with th and scope attributes",
                    )
                    .with_selector(selector_for(table))
                    .with_line(ctx.line_of(table)),
                );
            }

            let has_caption = descendant_count(table, "caption") > 0;
            if !has_caption
                && attr_nonempty(table, "aria-label").is_none()
                && attr_nonempty(table, "aria-labelledby").is_none()
            {
                findings.push(
                    Finding::new(
                        IssueKind::TableMissingCaption,
                        "1.3.1",
                        Level::A,
                        Severity::Medium,
                        "Table without a caption or accessible name",
                        "Add a caption element or an aria-label describing the table",
                    )
                    .with_selector(selector_for(table))
                    .with_line(ctx.line_of(table)),
                );
            }
        }

        findings
    }
}

fn has_direct_child(el: ElementRef<'_>, name: &str) -> bool {
    el.children()
        .filter_map(ElementRef::wrap)
        .any(|c| c.value().name() == name)
}

fn descendant_count(el: ElementRef<'_>, name: &str) -> usize {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|d| d.value().name() == name)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn check(html: &str) -> Vec<Finding> {
        let url = Url::parse("https://example.com/").unwrap();
        let ctx = PageContext::new(html, &url);
        StructureRules.check(&ctx)
    }

    fn kinds(findings: &[Finding]) -> Vec<IssueKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_empty_ul() {
        let findings = check("<ul></ul>");
        assert_eq!(kinds(&findings), vec![IssueKind::EmptyList]);
    }

    #[test]
    fn test_ul_with_items_passes() {
        let findings = check("<ul><li>one</li></ul>");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_dl_missing_dd() {
        let findings = check("<dl><dt>term</dt></dl>");
        assert_eq!(kinds(&findings), vec![IssueKind::InvalidDefinitionList]);
    }

    #[test]
    fn test_complete_dl_passes() {
        let findings = check("<dl><dt>term</dt><dd>meaning</dd></dl>");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_data_table_without_headers() {
        let findings = check(
            "<table><caption>Sales</caption>\
             <tr><td>a</td></tr><tr><td>b</td></tr></table>",
        );
        assert_eq!(kinds(&findings), vec![IssueKind::TableMissingHeaders]);
    }

    #[test]
    fn test_single_row_table_skips_header_check() {
        let findings = check(r#"<table aria-label="layout"><tr><td>a</td></tr></table>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_table_without_caption_or_label() {
        let findings = check("<table><tr><th>h</th></tr></table>");
        assert_eq!(kinds(&findings), vec![IssueKind::TableMissingCaption]);
    }

    #[test]
    fn test_captioned_table_with_headers_passes() {
        let findings = check(
            "<table><caption>Sales</caption>\
             <tr><th>region</th></tr><tr><td>north</td></tr></table>",
        );
        assert!(findings.is_empty());
    }
}
