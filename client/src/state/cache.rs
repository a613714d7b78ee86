//! Fetched collections shared between views, invalidated by mutations.
//!
//! DESIGN
//! ======
//! Each key holds an optional value and a generation counter. A fetch that
//! started before an invalidation is not written back, so a view reading
//! after a successful mutation always refetches instead of seeing a stale
//! list that raced the invalidation.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::future::Future;
use std::sync::Arc;

use models::{Ad, DashboardStats, Device};
use tokio::sync::Mutex;

use crate::net::{ApiClient, ApiError};

/// Identifies one cached collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Ads,
    Devices,
    DashboardStats,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { value: None, generation: 0 }
    }
}

impl<T> Slot<T> {
    fn invalidate(&mut self) {
        self.value = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[derive(Debug, Default)]
struct Slots {
    ads: Slot<Vec<Ad>>,
    devices: Slot<Vec<Device>>,
    dashboard: Slot<DashboardStats>,
}

/// Shared query cache. Clones see the same entries.
#[derive(Clone, Debug)]
pub struct QueryCache {
    api: ApiClient,
    slots: Arc<Mutex<Slots>>,
}

impl QueryCache {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, slots: Arc::new(Mutex::new(Slots::default())) }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `GET /api/ads`, served from cache when present.
    ///
    /// # Errors
    ///
    /// Propagates the API error of a cache-miss fetch.
    pub async fn ads(&self) -> Result<Vec<Ad>, ApiError> {
        self.fetch(|slots| &mut slots.ads, QueryKey::Ads, self.api.list_ads()).await
    }

    /// `GET /api/devices`, served from cache when present.
    ///
    /// # Errors
    ///
    /// Propagates the API error of a cache-miss fetch.
    pub async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        self.fetch(|slots| &mut slots.devices, QueryKey::Devices, self.api.list_devices())
            .await
    }

    /// `GET /api/reports/dashboard`, served from cache when present.
    ///
    /// # Errors
    ///
    /// Propagates the API error of a cache-miss fetch.
    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.fetch(
            |slots| &mut slots.dashboard,
            QueryKey::DashboardStats,
            self.api.dashboard_stats(),
        )
        .await
    }

    /// Drop the entry so the next read refetches.
    pub async fn invalidate(&self, key: QueryKey) {
        let mut slots = self.slots.lock().await;
        match key {
            QueryKey::Ads => slots.ads.invalidate(),
            QueryKey::Devices => slots.devices.invalidate(),
            QueryKey::DashboardStats => slots.dashboard.invalidate(),
        }
        tracing::debug!(?key, "query invalidated");
    }

    pub async fn is_cached(&self, key: QueryKey) -> bool {
        let slots = self.slots.lock().await;
        match key {
            QueryKey::Ads => slots.ads.value.is_some(),
            QueryKey::Devices => slots.devices.value.is_some(),
            QueryKey::DashboardStats => slots.dashboard.value.is_some(),
        }
    }

    async fn fetch<T: Clone>(
        &self,
        slot: impl Fn(&mut Slots) -> &mut Slot<T>,
        key: QueryKey,
        load: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        let generation = {
            let mut slots = self.slots.lock().await;
            let entry = slot(&mut *slots);
            if let Some(value) = &entry.value {
                return Ok(value.clone());
            }
            entry.generation
        };

        // The lock is not held across the request.
        let value = load.await?;

        let mut slots = self.slots.lock().await;
        let entry = slot(&mut *slots);
        if entry.generation == generation {
            entry.value = Some(value.clone());
        } else {
            tracing::debug!(?key, "discarding fetch that raced an invalidation");
        }
        Ok(value)
    }
}
