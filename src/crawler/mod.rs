//! Crawler module: fetching, page parsing, and the session traversal engine
//!
//! The traversal engine drives the full pipeline for each URL: fetch,
//! parse, rule evaluation, persistence, link discovery. Fetching is
//! strictly sequential per session to bound load on the audited site.

mod engine;
mod fetcher;
mod parser;
mod progress;

pub use engine::Crawler;
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use parser::{extract_hrefs, page_metadata, PageMetadata};
pub use progress::{LogObserver, NullObserver, ProgressEvent, ProgressObserver};
