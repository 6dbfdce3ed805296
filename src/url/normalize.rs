use thiserror::Error;
use url::Url;

/// File extensions treated as binary documents and never crawled
const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "7z",
];

/// Reasons a candidate href is rejected by the normalizer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkRejection {
    #[error("empty href")]
    Empty,

    #[error("unsupported scheme")]
    UnsupportedScheme,

    #[error("fragment-only link")]
    Fragment,

    #[error("host does not match site root")]
    CrossDomain,

    #[error("binary document extension")]
    BinaryDocument,

    #[error("invalid URL: {0}")]
    Invalid(String),
}

/// Normalizes a candidate href against the site root
///
/// Resolution rules:
/// - `http(s)`-prefixed hrefs pass through as-is
/// - `mailto:`, `tel:`, `javascript:`, `data:` and pure-fragment hrefs are
///   rejected
/// - root-relative hrefs (`/path`) combine with the root's scheme and host
/// - any other relative href is appended to the site root, not resolved
///   against the current page (deliberate quirk carried over from the
///   original crawler; deeply nested relative links may mis-resolve)
///
/// The resolved URL is then rejected if its host differs from the root's,
/// its path ends in a binary document extension, or it fails URL parsing.
pub fn normalize(href: &str, root: &Url) -> Result<Url, LinkRejection> {
    let href = href.trim();

    if href.is_empty() {
        return Err(LinkRejection::Empty);
    }

    if href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return Err(LinkRejection::UnsupportedScheme);
    }

    if href.starts_with('#') {
        return Err(LinkRejection::Fragment);
    }

    let absolute = if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        // origin keeps the port, host_str alone would not
        format!("{}{}", root.origin().ascii_serialization(), href)
    } else {
        format!(
            "{}/{}",
            root.as_str().trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    };

    let url = Url::parse(&absolute).map_err(|e| LinkRejection::Invalid(e.to_string()))?;

    if url.host_str() != root.host_str() || url.host_str().is_none() {
        return Err(LinkRejection::CrossDomain);
    }

    if has_binary_extension(&url) {
        return Err(LinkRejection::BinaryDocument);
    }

    Ok(url)
}

/// Checks whether the URL path's file extension is on the binary deny-list
fn has_binary_extension(url: &Url) -> bool {
    let path = url.path();
    let filename = path.rsplit('/').next().unwrap_or_default();

    match filename.rsplit_once('.') {
        Some((_, ext)) => BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_absolute_same_host_passes() {
        let result = normalize("https://example.com/about", &root()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_root_relative() {
        let result = normalize("/about", &root()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_root_relative_keeps_port() {
        let root = Url::parse("http://127.0.0.1:8080").unwrap();
        let result = normalize("/about", &root).unwrap();
        assert_eq!(result.as_str(), "http://127.0.0.1:8080/about");
    }

    #[test]
    fn test_relative_anchors_to_root() {
        // Resolution is always against the site root, never the current page
        let result = normalize("contact.html", &root()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/contact.html");
    }

    #[test]
    fn test_fragment_rejected() {
        assert_eq!(normalize("#section", &root()), Err(LinkRejection::Fragment));
    }

    #[test]
    fn test_mailto_rejected() {
        assert_eq!(
            normalize("mailto:a@example.com", &root()),
            Err(LinkRejection::UnsupportedScheme)
        );
    }

    #[test]
    fn test_tel_rejected() {
        assert_eq!(
            normalize("tel:+390123456", &root()),
            Err(LinkRejection::UnsupportedScheme)
        );
    }

    #[test]
    fn test_javascript_rejected() {
        assert_eq!(
            normalize("javascript:void(0)", &root()),
            Err(LinkRejection::UnsupportedScheme)
        );
    }

    #[test]
    fn test_cross_domain_rejected() {
        assert_eq!(
            normalize("https://other.com/x", &root()),
            Err(LinkRejection::CrossDomain)
        );
    }

    #[test]
    fn test_binary_extension_rejected() {
        assert_eq!(
            normalize("report.pdf", &root()),
            Err(LinkRejection::BinaryDocument)
        );
        assert_eq!(
            normalize("/files/archive.ZIP", &root()),
            Err(LinkRejection::BinaryDocument)
        );
    }

    #[test]
    fn test_all_binary_extensions_rejected() {
        for ext in ["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "7z"] {
            let href = format!("/download/file.{}", ext);
            assert_eq!(
                normalize(&href, &root()),
                Err(LinkRejection::BinaryDocument),
                "extension {} should be rejected",
                ext
            );
        }
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(normalize("  ", &root()), Err(LinkRejection::Empty));
    }

    #[test]
    fn test_query_preserved() {
        let result = normalize("/search?q=a11y", &root()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/search?q=a11y");
    }

    #[test]
    fn test_extensionless_path_allowed() {
        assert!(normalize("/documents", &root()).is_ok());
    }
}
