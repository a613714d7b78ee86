use super::*;
use crate::test_support::{self, MockBackend, MockState};

#[tokio::test]
async fn delete_refreshes_ad_list() {
    let backend = MockBackend::spawn(MockState {
        ads: vec![test_support::ad("a1", "Winter"), test_support::ad("a2", "Summer")],
        ..MockState::default()
    })
    .await;
    let cache = QueryCache::new(backend.client().await);
    assert_eq!(cache.ads().await.unwrap().len(), 2);

    delete_ad(&cache, "a1").await.unwrap();
    let ads = cache.ads().await.unwrap();
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].id, "a2");
}

#[tokio::test]
async fn failed_delete_keeps_cached_list() {
    let backend = MockBackend::spawn(MockState {
        ads: vec![test_support::ad("a1", "Winter")],
        fail_mutations: true,
        ..MockState::default()
    })
    .await;
    let cache = QueryCache::new(backend.client().await);
    cache.ads().await.unwrap();

    assert!(delete_ad(&cache, "a1").await.is_err());
    assert!(cache.is_cached(QueryKey::Ads).await);
}
