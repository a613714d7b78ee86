use super::*;
use crate::test_support::{MockBackend, MockState};
use models::MediaType;
use models::upload::DEFAULT_DURATION_SECS;

#[tokio::test]
async fn submit_without_file_makes_no_request() {
    let backend = MockBackend::spawn(MockState::default()).await;
    let cache = QueryCache::new(backend.client().await);
    let mut dialog = UploadDialog::new();
    dialog.set_name("Orphan");

    assert!(!dialog.can_submit());
    assert!(dialog.submit(&cache).await.is_none());
    assert_eq!(dialog.status().error_message(), Some(UPLOAD_FAILED_MESSAGE));
    assert!(backend.state().requests.is_empty());
}

#[tokio::test]
async fn successful_upload_invalidates_ads_and_resets() {
    let backend = MockBackend::spawn(MockState::default()).await;
    let cache = QueryCache::new(backend.client().await);
    cache.ads().await.unwrap();

    let mut dialog = UploadDialog::new();
    dialog.select_file(Some(UploadFile::new("winter.mp4", "video/mp4", vec![0; 32])));
    dialog.set_client_name("Coca Cola");
    dialog.set_duration(45);

    let ad = dialog.submit(&cache).await.unwrap();
    assert_eq!(ad.name, "winter.mp4");
    assert_eq!(ad.media_type, MediaType::Video);
    assert_eq!(*dialog.status(), MutationStatus::Success);
    assert!(dialog.file().is_none());
    assert_eq!(dialog.fields().duration, DEFAULT_DURATION_SECS);

    assert!(!cache.is_cached(QueryKey::Ads).await);
    assert_eq!(cache.ads().await.unwrap().len(), 1);

    let state = backend.state();
    assert_eq!(state.uploads[0].fields["duration"], "45");
    assert_eq!(state.uploads[0].fields["type"], "video");
}

#[tokio::test]
async fn failed_upload_keeps_fields() {
    let backend = MockBackend::spawn(MockState { fail_mutations: true, ..MockState::default() }).await;
    let cache = QueryCache::new(backend.client().await);

    let mut dialog = UploadDialog::new();
    dialog.select_file(Some(UploadFile::new("poster.png", "image/png", vec![1])));
    dialog.set_name("Poster");

    assert!(dialog.submit(&cache).await.is_none());
    assert!(dialog.status().is_error());
    assert_eq!(dialog.fields().name, "Poster");
    assert!(dialog.can_submit());
}

#[tokio::test]
async fn select_path_reads_file_and_guesses_mime() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mov");
    std::fs::write(&path, b"moov").unwrap();

    let mut dialog = UploadDialog::new();
    dialog.select_path(&path).await.unwrap();

    let file = dialog.file().unwrap();
    assert_eq!(file.file_name, "clip.mov");
    assert_eq!(file.mime_type, "video/quicktime");
    assert_eq!(file.size(), 4);
}
