//! Session statistics display
//!
//! Formats the aggregates computed by the storage layer for the `--stats`
//! command.

use crate::storage::{SessionRecord, SessionStatistics};

/// Prints a session summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `session` - The session row being summarized
/// * `stats` - The aggregates derived from its pages and findings
pub fn print_statistics(session: &SessionRecord, stats: &SessionStatistics) {
    println!("=== Audit Session {} ===\n", session.id);

    println!("Site: {}", session.site_url);
    println!("Status: {}", session.status);
    println!("Started: {}", session.started_at);
    if let Some(finished) = &session.finished_at {
        println!("Finished: {}", finished);
    }
    println!();

    println!("Overview:");
    println!(
        "  Pages audited: {} (budget {})",
        stats.total_pages, session.max_pages
    );
    println!("  Total findings: {}", stats.total_findings);
    if let Some(avg) = stats.avg_response_time_ms {
        println!("  Average response time: {:.0}ms", avg);
    }
    println!();

    println!("Findings by Severity:");
    for (label, count) in [
        ("critical", stats.critical),
        ("high", stats.high),
        ("medium", stats.medium),
        ("low", stats.low),
    ] {
        let percentage = if stats.total_findings > 0 {
            (count as f64 / stats.total_findings as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    println!("Findings by WCAG Level:");
    println!("  A: {}", stats.level_a);
    println!("  AA: {}", stats.level_aa);
    println!("  AAA: {}", stats.level_aaa);

    if stats.total_pages > 0 {
        let per_page = stats.total_findings as f64 / stats.total_pages as f64;
        println!("\nAverage findings per page: {:.1}", per_page);
    }
}
