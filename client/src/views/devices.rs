//! Device fleet overview with status tabs.
//!
//! Status comes from the server; "last seen" is computed against the clock
//! passed in so rendering is deterministic under test.

#[cfg(test)]
#[path = "devices_test.rs"]
mod devices_test;

use std::fmt;

use models::format::or_dash;
use models::{Device, StatusFilter};
use time::OffsetDateTime;

use crate::net::ApiError;
use crate::state::cache::QueryCache;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceCard {
    pub name: String,
    pub hardware_id: String,
    pub status: &'static str,
    pub location: String,
    pub address: Option<String>,
    pub battery: Option<String>,
    pub battery_low: bool,
    pub last_seen: String,
    pub gps: Option<String>,
}

impl DeviceCard {
    #[must_use]
    pub fn new(device: &Device, now: OffsetDateTime) -> Self {
        Self {
            name: device.name.clone(),
            hardware_id: device.device_id.clone(),
            status: device.status.label(),
            location: device.location_name.clone(),
            address: device.location_address.clone(),
            battery: device.battery_level.map(|level| format!("{level:.0}%")),
            battery_low: device.is_battery_low(),
            last_seen: device.last_seen_label(now),
            gps: device.gps_label(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevicesView {
    pub filter: StatusFilter,
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub cards: Vec<DeviceCard>,
}

impl DevicesView {
    /// # Errors
    ///
    /// Returns the API error if the device list cannot be fetched.
    pub async fn load(cache: &QueryCache, filter: StatusFilter) -> Result<Self, ApiError> {
        let devices = cache.devices().await?;
        Ok(Self::from_devices(&devices, filter, OffsetDateTime::now_utc()))
    }

    #[must_use]
    pub fn from_devices(devices: &[Device], filter: StatusFilter, now: OffsetDateTime) -> Self {
        let (online, offline) = models::device::partition_by_status(devices);
        Self {
            filter,
            total: devices.len(),
            online: online.len(),
            offline: offline.len(),
            cards: filter
                .apply(devices)
                .into_iter()
                .map(|device| DeviceCard::new(device, now))
                .collect(),
        }
    }

    /// Header line above the tabs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} total devices · {} online", self.total, self.online)
    }

    /// `(tab, count)` in tab order.
    #[must_use]
    pub fn tabs(&self) -> [(StatusFilter, usize); 3] {
        [
            (StatusFilter::All, self.total),
            (StatusFilter::Online, self.online),
            (StatusFilter::Offline, self.offline),
        ]
    }
}

impl fmt::Display for DevicesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        let tabs: Vec<String> = self
            .tabs()
            .iter()
            .map(|(tab, count)| {
                if *tab == self.filter {
                    format!("[{tab} ({count})]")
                } else {
                    format!("{tab} ({count})")
                }
            })
            .collect();
        writeln!(f, "{}", tabs.join("  "))?;

        if self.cards.is_empty() {
            return writeln!(f, "\n{}", self.filter.empty_message());
        }
        for card in &self.cards {
            writeln!(f)?;
            writeln!(f, "{} [{}]", card.name, card.status)?;
            writeln!(f, "  ID        {}", card.hardware_id)?;
            writeln!(f, "  Location  {}", card.location)?;
            if let Some(address) = &card.address {
                writeln!(f, "            {address}")?;
            }
            let badge = if card.battery_low { " (Low)" } else { "" };
            writeln!(f, "  Battery   {}{badge}", or_dash(card.battery.as_deref()))?;
            writeln!(f, "  Last seen {}", card.last_seen)?;
            if let Some(gps) = &card.gps {
                writeln!(f, "  GPS       {gps}")?;
            }
        }
        Ok(())
    }
}
