//! Analytics report for a date range, optionally narrowed to one device or
//! one ad.
//!
//! DESIGN
//! ======
//! Reports are not cached. Every load goes to `/api/reports/stats` with the
//! current filter, so changing the filter always shows fresh totals.

#[cfg(test)]
#[path = "reports_test.rs"]
mod reports_test;

use std::fmt;

use models::format::{or_dash, short_date, thousands};
use models::{ReportFilter, ReportStats};

use super::card;
use crate::net::{ApiClient, ApiError};

const ALL: &str = "All";

#[derive(Clone, Debug, PartialEq)]
pub struct ReportsView {
    pub filter: ReportFilter,
    pub stats: ReportStats,
}

impl ReportsView {
    /// # Errors
    ///
    /// Returns the API error if the report cannot be fetched.
    pub async fn load(api: &ApiClient, filter: ReportFilter) -> Result<Self, ApiError> {
        let stats = api.report_stats(&filter).await?;
        Ok(Self { filter, stats })
    }

    #[must_use]
    pub fn from_stats(filter: ReportFilter, stats: ReportStats) -> Self {
        Self { filter, stats }
    }

    /// The four headline cards, in display order.
    #[must_use]
    pub fn cards(&self) -> [(&'static str, String); 4] {
        let stats = &self.stats;
        [
            ("Total Views", thousands(stats.total_views)),
            ("Avg Views / Day", format!("{:.1}", stats.avg_views_per_day)),
            ("Charging Events", thousands(stats.total_charging_events)),
            ("QR Scans", thousands(stats.total_qr_scans)),
        ]
    }

    /// `"YYYY-MM-DD to YYYY-MM-DD"`, with `-` for an open bound.
    #[must_use]
    pub fn range_label(&self) -> String {
        let start = self.filter.start.map(short_date);
        let end = self.filter.end.map(short_date);
        format!("{} to {}", or_dash(start.as_deref()), or_dash(end.as_deref()))
    }
}

impl fmt::Display for ReportsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reports")?;
        card(f, "Range", &self.range_label())?;
        card(f, "Device", self.filter.device_id.as_deref().unwrap_or(ALL))?;
        card(f, "Ad", self.filter.ad_id.as_deref().unwrap_or(ALL))?;
        writeln!(f)?;
        for (label, value) in self.cards() {
            card(f, label, &value)?;
        }

        writeln!(f)?;
        writeln!(f, "Top Locations")?;
        if self.stats.top_locations.is_empty() {
            writeln!(f, "  No data yet")?;
        }
        for location in &self.stats.top_locations {
            writeln!(f, "  {:<28} {:>10}", location.location_name, thousands(location.views))?;
        }

        writeln!(f)?;
        writeln!(f, "Top Ads")?;
        if self.stats.top_ads.is_empty() {
            writeln!(f, "  No data yet")?;
        }
        for ad in &self.stats.top_ads {
            writeln!(f, "  {:<28} {:>10}", ad.name, thousands(ad.views))?;
        }

        writeln!(f)?;
        writeln!(f, "Views by Date")?;
        if self.stats.views_by_date.is_empty() {
            writeln!(f, "  No data yet")?;
        }
        for day in &self.stats.views_by_date {
            writeln!(f, "  {:<28} {:>10}", day.date, thousands(day.views))?;
        }
        Ok(())
    }
}
