use super::*;
use crate::test_support::{self, MockBackend, MockState};
use models::DeviceStatus;

async fn cache_for(state: MockState) -> (MockBackend, QueryCache) {
    let backend = MockBackend::spawn(state).await;
    let cache = QueryCache::new(backend.client().await);
    (backend, cache)
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let (backend, cache) = cache_for(MockState {
        ads: vec![test_support::ad("a1", "Winter")],
        ..MockState::default()
    })
    .await;

    assert_eq!(cache.ads().await.unwrap().len(), 1);
    assert_eq!(cache.ads().await.unwrap().len(), 1);
    assert_eq!(backend.request_count("GET /api/ads"), 1);
    assert!(cache.is_cached(QueryKey::Ads).await);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let (backend, cache) = cache_for(MockState {
        devices: vec![test_support::device("d1", DeviceStatus::Online)],
        ..MockState::default()
    })
    .await;

    cache.devices().await.unwrap();
    backend.state().devices.push(test_support::device("d2", DeviceStatus::Offline));
    assert_eq!(cache.devices().await.unwrap().len(), 1);

    cache.invalidate(QueryKey::Devices).await;
    assert!(!cache.is_cached(QueryKey::Devices).await);
    assert_eq!(cache.devices().await.unwrap().len(), 2);
    assert_eq!(backend.request_count("GET /api/devices"), 2);
}

#[tokio::test]
async fn invalidating_one_key_keeps_others() {
    let (backend, cache) = cache_for(MockState::default()).await;

    cache.ads().await.unwrap();
    cache.dashboard().await.unwrap();
    cache.invalidate(QueryKey::Ads).await;

    assert!(!cache.is_cached(QueryKey::Ads).await);
    assert!(cache.is_cached(QueryKey::DashboardStats).await);
    cache.dashboard().await.unwrap();
    assert_eq!(backend.request_count("GET /api/reports/dashboard"), 1);
}

#[tokio::test]
async fn failed_fetch_is_not_cached() {
    let backend = MockBackend::spawn(MockState::default()).await;
    let cache = QueryCache::new(ApiClient::new(&backend.config()).unwrap());

    assert!(cache.ads().await.unwrap_err().is_unauthorized());
    assert!(!cache.is_cached(QueryKey::Ads).await);
}

#[tokio::test]
async fn fetch_racing_an_invalidation_is_not_stored() {
    let (_backend, cache) = cache_for(MockState::default()).await;
    let stale = async {
        cache.invalidate(QueryKey::Ads).await;
        Ok::<_, ApiError>(vec![test_support::ad("stale", "Stale")])
    };

    let value = cache.fetch(|slots| &mut slots.ads, QueryKey::Ads, stale).await.unwrap();
    assert_eq!(value[0].id, "stale");
    assert!(!cache.is_cached(QueryKey::Ads).await);
}
