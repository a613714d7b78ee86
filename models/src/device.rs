//! Display devices and their online/offline classification.
//!
//! Status comes solely from the server-supplied `status` field. The "last
//! seen" label is derived client-side for display only and never reclassifies
//! a device.

#[cfg(test)]
#[path = "device_test.rs"]
mod device_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Battery percentage below which a device is flagged as low.
pub const LOW_BATTERY_PERCENT: f64 = 15.0;

/// Elapsed whole minutes still reported as "Just now".
pub const JUST_NOW_MINUTES: i64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

/// A registered display device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Server-assigned identifier used in API paths.
    pub id: String,
    /// Hardware identifier reported by the device itself.
    pub device_id: String,
    pub name: String,
    pub location_name: String,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub gps_latitude: Option<f64>,
    #[serde(default)]
    pub gps_longitude: Option<f64>,
    pub status: DeviceStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
    /// Battery charge in percent.
    #[serde(default)]
    pub battery_level: Option<f64>,
    /// Platform version string reported by the device.
    #[serde(default)]
    pub android_version: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub registered_at: Option<OffsetDateTime>,
}

impl Device {
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }

    #[must_use]
    pub fn is_battery_low(&self) -> bool {
        self.battery_level.is_some_and(|level| level < LOW_BATTERY_PERCENT)
    }

    /// `"lat, lon"` to four decimals, or `None` unless both coordinates are
    /// present and non-zero.
    #[must_use]
    pub fn gps_label(&self) -> Option<String> {
        match (self.gps_latitude, self.gps_longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => {
                Some(format!("{lat:.4}, {lon:.4}"))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn last_seen_label(&self, now: OffsetDateTime) -> String {
        last_seen_label(self.last_seen, now)
    }
}

/// Whole minutes elapsed since `last_seen`, rounded down. A timestamp in the
/// future counts as zero.
#[must_use]
pub fn minutes_since(last_seen: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (now - last_seen).whole_minutes().max(0)
}

/// Human label for device freshness: `"Just now"` or `"{n}m ago"`.
#[must_use]
pub fn last_seen_label(last_seen: OffsetDateTime, now: OffsetDateTime) -> String {
    let minutes = minutes_since(last_seen, now);
    if minutes < JUST_NOW_MINUTES {
        "Just now".to_owned()
    } else {
        format!("{minutes}m ago")
    }
}

/// Split devices into `(online, offline)`, preserving input order.
#[must_use]
pub fn partition_by_status(devices: &[Device]) -> (Vec<&Device>, Vec<&Device>) {
    devices.iter().partition(|device| device.is_online())
}

/// Device list tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Online,
    Offline,
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Online => device.status == DeviceStatus::Online,
            Self::Offline => device.status == DeviceStatus::Offline,
        }
    }

    #[must_use]
    pub fn apply(self, devices: &[Device]) -> Vec<&Device> {
        devices.iter().filter(|device| self.matches(device)).collect()
    }

    /// Message shown when the tab has no devices.
    #[must_use]
    pub fn empty_message(self) -> &'static str {
        match self {
            Self::All => "No devices registered yet",
            Self::Online => "No online devices",
            Self::Offline => "No offline devices",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter `{0}` (expected all, online or offline)")]
pub struct ParseStatusFilterError(String);

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(ParseStatusFilterError(s.to_owned())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Online => "Online",
            Self::Offline => "Offline",
        })
    }
}
