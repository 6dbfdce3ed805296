//! Page metadata and link extraction
//!
//! Reuses the rule engine's [`PageContext`] so the document is parsed once
//! per page and shared between metadata extraction and rule evaluation.

use crate::rules::{element_text, PageContext};

/// Structural metadata recorded on each page audit row
#[derive(Debug, Clone, Default)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub heading_count: u32,
    pub image_count: u32,
    pub link_count: u32,
    pub form_count: u32,
}

/// Extracts title, meta description, and structural counts from a page
pub fn page_metadata(ctx: &PageContext<'_>) -> PageMetadata {
    let title = ctx
        .select("title")
        .first()
        .map(|t| element_text(*t))
        .filter(|t| !t.is_empty());

    let meta_description = ctx
        .select(r#"meta[name="description"]"#)
        .first()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    PageMetadata {
        title,
        meta_description,
        heading_count: ctx.select("h1, h2, h3, h4, h5, h6").len() as u32,
        image_count: ctx.select("img").len() as u32,
        link_count: ctx.select("a[href]").len() as u32,
        form_count: ctx.select("form").len() as u32,
    }
}

/// Raw href values of every anchor on the page, in document order
///
/// Normalization and filtering is the link normalizer's job; this only
/// collects candidates.
pub fn extract_hrefs(ctx: &PageContext<'_>) -> Vec<String> {
    ctx.select("a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn context<'a>(html: &'a str, url: &'a Url) -> PageContext<'a> {
        PageContext::new(html, url)
    }

    #[test]
    fn test_page_metadata() {
        let url = Url::parse("https://example.com/").unwrap();
        let html = r#"<html><head>
            <title> Servizi </title>
            <meta name="description" content="Servizi comunali online">
        </head><body>
            <h1>Servizi</h1><h2>Anagrafe</h2>
            <img src="/a.png" alt="a"><img src="/b.png" alt="b">
            <a href="/a">a</a>
            <form></form>
        </body></html>"#;
        let ctx = context(html, &url);

        let meta = page_metadata(&ctx);
        assert_eq!(meta.title.as_deref(), Some("Servizi"));
        assert_eq!(
            meta.meta_description.as_deref(),
            Some("Servizi comunali online")
        );
        assert_eq!(meta.heading_count, 2);
        assert_eq!(meta.image_count, 2);
        assert_eq!(meta.link_count, 1);
        assert_eq!(meta.form_count, 1);
    }

    #[test]
    fn test_empty_title_is_none() {
        let url = Url::parse("https://example.com/").unwrap();
        let ctx = context("<html><head><title>  </title></head></html>", &url);
        assert!(page_metadata(&ctx).title.is_none());
    }

    #[test]
    fn test_extract_hrefs_in_document_order() {
        let url = Url::parse("https://example.com/").unwrap();
        let ctx = context(
            r##"<a href="/b">b</a><a href="/a">a</a><a name="no-href">x</a>"##,
            &url,
        );
        assert_eq!(extract_hrefs(&ctx), vec!["/b", "/a"]);
    }
}
