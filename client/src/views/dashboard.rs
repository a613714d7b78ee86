//! Landing dashboard: headline counters plus top locations and top ads.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::fmt;

use models::DashboardStats;
use models::format::thousands;

use super::card;
use crate::net::ApiError;
use crate::state::cache::QueryCache;

pub const NO_LOCATIONS_MESSAGE: &str = "No data yet";
pub const NO_ADS_MESSAGE: &str = "No ads yet";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardView {
    pub stats: DashboardStats,
}

impl DashboardView {
    /// # Errors
    ///
    /// Returns the API error if the dashboard totals cannot be fetched.
    pub async fn load(cache: &QueryCache) -> Result<Self, ApiError> {
        Ok(Self::from_stats(cache.dashboard().await?))
    }

    #[must_use]
    pub fn from_stats(stats: DashboardStats) -> Self {
        Self { stats }
    }

    /// `(label, value)` for each headline card, in display order.
    #[must_use]
    pub fn cards(&self) -> Vec<(&'static str, String)> {
        let stats = &self.stats;
        vec![
            ("Views Today", thousands(stats.views.today)),
            ("Views This Week", thousands(stats.views.week)),
            (
                "Active Devices",
                format!("{} / {}", stats.devices.active, stats.devices.total),
            ),
            ("Charging Events", thousands(stats.charging_events)),
            ("QR Scans", thousands(stats.qr_scans)),
        ]
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard")?;
        for (label, value) in self.cards() {
            card(f, label, &value)?;
        }

        writeln!(f)?;
        writeln!(f, "Top Locations")?;
        if self.stats.top_locations.is_empty() {
            writeln!(f, "  {NO_LOCATIONS_MESSAGE}")?;
        }
        for (rank, location) in self.stats.top_locations.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} ({} views)",
                rank + 1,
                location.location_name,
                thousands(location.views)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Top Ads")?;
        if self.stats.top_ads.is_empty() {
            writeln!(f, "  {NO_ADS_MESSAGE}")?;
        }
        for (rank, ad) in self.stats.top_ads.iter().enumerate() {
            writeln!(f, "  {}. {} ({} views)", rank + 1, ad.name, thousands(ad.views))?;
        }
        Ok(())
    }
}
