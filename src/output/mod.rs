//! Output module: session statistics display
//!
//! Report generators (HTML/CSV renderers, statement builders) consume the
//! same database read-only; this module only covers the CLI-facing summary.

mod stats;

pub use stats::print_statistics;
