//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the auditor, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Manual redirect handling with hop cap and loop detection
//! - Error classification
//!
//! Certificate validation is disabled on purpose: public-sector sites
//! under audit frequently run with expired or mismatched certificates,
//! and the auditor must still evaluate their markup.

use crate::config::Config;
use reqwest::{redirect::Policy, Client};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
        /// Wall-clock time spent on the request chain
        elapsed_ms: u64,
        /// Number of redirect hops followed
        redirect_count: u32,
    },

    /// HTTP error status (>= 400)
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Request exceeded the configured timeout
    Timeout,

    /// Network error (connection refused, DNS failure, etc.)
    Transport {
        /// Error description
        error: String,
    },

    /// Redirect chain exceeded the configured hop cap
    RedirectLimit,

    /// Redirect chain revisited a URL
    RedirectLoop,
}

impl FetchOutcome {
    /// Short description used when logging a skipped page
    pub fn skip_reason(&self) -> String {
        match self {
            Self::Success { .. } => "success".to_string(),
            Self::HttpError { status_code } => format!("HTTP {}", status_code),
            Self::Timeout => "timeout".to_string(),
            Self::Transport { error } => format!("transport error: {}", error),
            Self::RedirectLimit => "too many redirects".to_string(),
            Self::RedirectLoop => "redirect loop".to_string(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are handled manually by [`fetch_page`] so the hop count and
/// final URL can be recorded per page.
///
/// # Arguments
///
/// * `config` - The loaded configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, following redirects manually up to `max_redirects` hops
///
/// Redirect targets are resolved against the redirecting URL. A chain
/// that revisits a URL is reported as a loop; one that exceeds the hop
/// cap as a limit. Per-page failures are values, not errors: the caller
/// skips the page and continues the crawl.
pub async fn fetch_page(client: &Client, url: &Url, max_redirects: u32) -> FetchOutcome {
    let start = Instant::now();
    let mut current = url.clone();
    let mut chain: HashSet<String> = HashSet::from([current.to_string()]);
    let mut redirect_count = 0u32;

    loop {
        let response = match client.get(current.clone()).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return FetchOutcome::Timeout,
            Err(e) => {
                return FetchOutcome::Transport {
                    error: e.to_string(),
                }
            }
        };

        let status = response.status();

        if status.is_redirection() {
            let Some(location) = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                return FetchOutcome::Transport {
                    error: format!("HTTP {} without a Location header", status.as_u16()),
                };
            };

            let Ok(next) = current.join(location) else {
                return FetchOutcome::Transport {
                    error: format!("unparseable redirect target {:?}", location),
                };
            };

            if !chain.insert(next.to_string()) {
                return FetchOutcome::RedirectLoop;
            }
            if redirect_count >= max_redirects {
                return FetchOutcome::RedirectLimit;
            }

            redirect_count += 1;
            current = next;
            continue;
        }

        if status.as_u16() >= 400 {
            return FetchOutcome::HttpError {
                status_code: status.as_u16(),
            };
        }

        return match response.text().await {
            Ok(body) => FetchOutcome::Success {
                final_url: current,
                status_code: status.as_u16(),
                body,
                elapsed_ms: start.elapsed().as_millis() as u64,
                redirect_count,
            },
            Err(e) if e.is_timeout() => FetchOutcome::Timeout,
            Err(e) => FetchOutcome::Transport {
                error: e.to_string(),
            },
        };
    }
}
