//! Page view models for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each view is plain data loaded through the shared [`QueryCache`] or the
//! API client, plus a `Display` impl that renders it as text. Formatting
//! rules live in `models::format` so they stay testable without a runtime.
//!
//! [`QueryCache`]: crate::state::cache::QueryCache

pub mod ads;
pub mod dashboard;
pub mod devices;
pub mod reports;

pub use ads::AdsView;
pub use dashboard::DashboardView;
pub use devices::DevicesView;
pub use reports::ReportsView;

use std::fmt;

/// Write a `"label: value"` line padded to a common label width.
fn card(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {label:<18} {value}")
}
