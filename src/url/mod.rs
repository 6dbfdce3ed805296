//! URL handling module for Accesso
//!
//! Provides the link normalizer used to turn raw hrefs discovered on a page
//! into crawlable same-site URLs, rejecting everything else with a typed
//! reason.

mod normalize;

pub use normalize::{normalize, LinkRejection};

use ::url::Url;

/// Normalizes a batch of candidate hrefs against the site root
///
/// Rejected hrefs are dropped (logged at trace level) and the surviving URLs
/// are deduplicated while preserving first-seen order, which is the order the
/// traversal engine enqueues them in.
pub fn normalize_all<'a, I>(hrefs: I, root: &Url) -> Vec<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for href in hrefs {
        match normalize(href, root) {
            Ok(url) => {
                if seen.insert(url.to_string()) {
                    out.push(url);
                }
            }
            Err(reason) => {
                tracing::trace!("Rejected href {:?}: {}", href, reason);
            }
        }
    }

    out
}
