//! Raw device/ad events. The admin tools only ever see them aggregated.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    View,
    ChargingStart,
    ChargingEnd,
    QrScan,
}

/// A single recorded event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub id: String,
    pub device_id: String,
    pub ad_id: String,
    pub event_type: EventType,
    pub screen: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Seconds on screen, for views.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub rotation_slot: Option<u32>,
}
