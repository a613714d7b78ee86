//! Ad inventory table.

#[cfg(test)]
#[path = "ads_test.rs"]
mod ads_test;

use std::fmt;

use models::Ad;
use models::format::{duration_label, file_size_mb, or_dash, short_date};

use crate::net::ApiError;
use crate::state::cache::QueryCache;

pub const EMPTY_MESSAGE: &str = "No ads yet";

/// One formatted table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdRow {
    pub id: String,
    pub name: String,
    pub client: String,
    pub media_type: &'static str,
    pub duration: String,
    pub size: String,
    pub created: String,
}

impl From<&Ad> for AdRow {
    fn from(ad: &Ad) -> Self {
        Self {
            id: ad.id.clone(),
            name: ad.name.clone(),
            client: or_dash(ad.client_name.as_deref()).to_owned(),
            media_type: ad.media_type.as_str(),
            duration: duration_label(ad.duration),
            size: file_size_mb(ad.file_size),
            created: short_date(ad.created_at),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdsView {
    pub rows: Vec<AdRow>,
}

impl AdsView {
    /// # Errors
    ///
    /// Returns the API error if the ad list cannot be fetched.
    pub async fn load(cache: &QueryCache) -> Result<Self, ApiError> {
        Ok(Self::from_ads(&cache.ads().await?))
    }

    #[must_use]
    pub fn from_ads(ads: &[Ad]) -> Self {
        Self { rows: ads.iter().map(AdRow::from).collect() }
    }
}

impl fmt::Display for AdsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "{EMPTY_MESSAGE}");
        }
        writeln!(
            f,
            "{:<12} {:<24} {:<16} {:<6} {:>8} {:>10} {:<10}",
            "ID", "NAME", "CLIENT", "TYPE", "DURATION", "SIZE", "CREATED"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:<24} {:<16} {:<6} {:>8} {:>10} {:<10}",
                row.id, row.name, row.client, row.media_type, row.duration, row.size, row.created
            )?;
        }
        Ok(())
    }
}
