//! Aggregated analytics served by the report endpoints.
//!
//! DESIGN
//! ======
//! Aggregation is owned by the backend. The client only describes the
//! filter it wants and renders whatever totals come back; it never
//! computes or fabricates report numbers itself.

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};

/// Length of the default report window, ending now.
pub const DEFAULT_REPORT_DAYS: i64 = 30;

/// Longest report window accepted, in days.
pub const MAX_REPORT_DAYS: i64 = 3650;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReportRangeError {
    #[error("report window must be between 1 and {MAX_REPORT_DAYS} days, got {0}")]
    InvalidDays(i64),
}

/// Totals shown on the landing dashboard (`/api/reports/dashboard`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub views: ViewCounts,
    pub devices: DeviceCounts,
    #[serde(default)]
    pub top_locations: Vec<LocationViews>,
    #[serde(default)]
    pub top_ads: Vec<AdViews>,
    pub charging_events: u64,
    #[serde(rename = "qrScans")]
    pub qr_scans: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    pub today: u64,
    pub week: u64,
    pub month: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCounts {
    pub active: u64,
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationViews {
    #[serde(default)]
    pub device_id: Option<String>,
    pub location_name: String,
    pub views: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdViews {
    #[serde(default)]
    pub ad_id: Option<String>,
    /// Dashboard responses call this `name`, report responses `adName`.
    #[serde(alias = "adName")]
    pub name: String,
    pub views: u64,
}

/// Views on a single day of the report window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
}

/// Filtered report totals (`/api/reports/stats`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_views: u64,
    pub total_charging_events: u64,
    #[serde(rename = "totalQRScans")]
    pub total_qr_scans: u64,
    pub avg_views_per_day: f64,
    #[serde(default)]
    pub top_locations: Vec<LocationViews>,
    #[serde(default)]
    pub top_ads: Vec<AdViews>,
    #[serde(default)]
    pub views_by_date: Vec<DailyViews>,
}

/// Date range and optional device/ad narrowing for report queries.
///
/// `None` for `device_id` or `ad_id` means "all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
    pub device_id: Option<String>,
    pub ad_id: Option<String>,
}

impl ReportFilter {
    /// The `days`-long window ending at `now`, across all devices and ads.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRangeError::InvalidDays`] unless `days` is within
    /// `1..=MAX_REPORT_DAYS` and the start of the window is representable.
    pub fn last_days(now: OffsetDateTime, days: i64) -> Result<Self, ReportRangeError> {
        if !(1..=MAX_REPORT_DAYS).contains(&days) {
            return Err(ReportRangeError::InvalidDays(days));
        }
        let start = days
            .checked_mul(SECONDS_PER_DAY)
            .map(Duration::seconds)
            .and_then(|window| now.checked_sub(window))
            .ok_or(ReportRangeError::InvalidDays(days))?;
        Ok(Self {
            start: Some(start),
            end: Some(now),
            device_id: None,
            ad_id: None,
        })
    }

    /// Query parameters for the report stats endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound cannot be rendered as RFC 3339.
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, time::error::Format> {
        let mut pairs = self.range_pairs()?;
        if let Some(device_id) = &self.device_id {
            pairs.push(("deviceId", device_id.clone()));
        }
        if let Some(ad_id) = &self.ad_id {
            pairs.push(("adId", ad_id.clone()));
        }
        Ok(pairs)
    }

    /// Query parameters for the CSV export, which only honours the date range.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound cannot be rendered as RFC 3339.
    pub fn range_pairs(&self) -> Result<Vec<(&'static str, String)>, time::error::Format> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(start) = self.start {
            pairs.push(("startDate", start.format(&Rfc3339)?));
        }
        if let Some(end) = self.end {
            pairs.push(("endDate", end.format(&Rfc3339)?));
        }
        Ok(pairs)
    }
}

/// File name offered for a CSV export made on `date`.
#[must_use]
pub fn export_file_name(date: Date) -> String {
    format!(
        "dooh-report-{:04}-{:02}-{:02}.csv",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
