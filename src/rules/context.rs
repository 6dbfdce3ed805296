//! Page context handed to every detector
//!
//! Bundles the tolerantly parsed document, the raw markup, and the page URL.
//! Also hosts the selector/source-line helpers detectors use when reporting
//! where a finding lives.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Everything a detector needs to evaluate one page
pub struct PageContext<'a> {
    pub document: Html,
    pub raw: &'a str,
    pub url: &'a Url,
}

impl<'a> PageContext<'a> {
    /// Parses the raw markup into a queryable tree
    ///
    /// Parse errors are tolerated; scraper produces a best-effort tree for
    /// malformed documents.
    pub fn new(raw: &'a str, url: &'a Url) -> Self {
        Self {
            document: Html::parse_document(raw),
            raw,
            url,
        }
    }

    /// Selects elements by CSS selector
    ///
    /// All call sites use literal selectors; a selector that fails to parse
    /// is a programming error and yields no elements (logged at debug).
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(e) => {
                tracing::debug!("Invalid selector {:?}: {:?}", css, e);
                Vec::new()
            }
        }
    }

    /// All element nodes in the document, in document order
    pub fn all_elements(&self) -> Vec<ElementRef<'_>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect()
    }

    /// 1-based line number of the first line containing `needle` in the raw
    /// markup, if any
    pub fn line_containing(&self, needle: &str) -> Option<u32> {
        if needle.is_empty() {
            return None;
        }
        let pos = self.raw.find(needle)?;
        Some(self.raw[..pos].bytes().filter(|b| *b == b'\n').count() as u32 + 1)
    }

    /// Best-effort source line for an element, keyed off its id attribute
    pub fn line_of(&self, el: ElementRef<'_>) -> Option<u32> {
        let id = el.value().attr("id")?;
        self.line_containing(&format!("id=\"{}\"", id))
    }
}

/// Builds a short CSS-ish selector for reporting an element
///
/// `tag#id` when an id is present, else `tag.class.class` (first two
/// classes), else the bare tag name.
pub fn selector_for(el: ElementRef<'_>) -> String {
    let tag = el.value().name();

    if let Some(id) = el.value().attr("id") {
        if !id.trim().is_empty() {
            return format!("{}#{}", tag, id);
        }
    }

    let classes: Vec<&str> = el
        .value()
        .attr("class")
        .unwrap_or_default()
        .split_whitespace()
        .take(2)
        .collect();

    if classes.is_empty() {
        tag.to_string()
    } else {
        format!("{}.{}", tag, classes.join("."))
    }
}

/// Trimmed text content of an element
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// True if any ancestor element has the given tag name
pub fn has_ancestor(el: ElementRef<'_>, name: &str) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == name)
}

/// Attribute value if present and non-empty after trimming
pub fn attr_nonempty<'b>(el: ElementRef<'b>, name: &str) -> Option<&'b str> {
    el.value().attr(name).filter(|v| !v.trim().is_empty())
}
