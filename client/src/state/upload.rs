//! Ad upload dialog state.
//!
//! ERROR HANDLING
//! ==============
//! Every failure (no file, transport, server) collapses into the same static
//! message; the underlying cause is only logged.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::path::Path;

use models::upload::mime_for_path;
use models::{Ad, UploadFields, UploadFile, UploadPayload};

use super::cache::{QueryCache, QueryKey};
use super::mutation::MutationStatus;

pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";

#[derive(Clone, Debug, Default)]
pub struct UploadDialog {
    file: Option<UploadFile>,
    fields: UploadFields,
    status: MutationStatus,
}

impl UploadDialog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.file = file;
    }

    /// Read `path` from disk and select it, declaring a MIME type guessed
    /// from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn select_path(&mut self, path: &Path) -> std::io::Result<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.file = Some(UploadFile::new(file_name, mime_for_path(path), bytes));
        Ok(())
    }

    #[must_use]
    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.fields.name);
    }

    pub fn set_client_name(&mut self, client_name: &str) {
        client_name.clone_into(&mut self.fields.client_name);
    }

    pub fn set_duration(&mut self, duration: u32) {
        self.fields.duration = duration;
    }

    #[must_use]
    pub fn fields(&self) -> &UploadFields {
        &self.fields
    }

    #[must_use]
    pub fn status(&self) -> &MutationStatus {
        &self.status
    }

    /// The submit button is enabled only with a file and no upload in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.status.is_pending()
    }

    /// Upload the selected file. Without a file this fails immediately and
    /// no request is made.
    pub async fn submit(&mut self, cache: &QueryCache) -> Option<Ad> {
        let payload = match UploadPayload::build(self.file.clone(), &self.fields) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%error, "upload rejected before sending");
                self.status = MutationStatus::Error(UPLOAD_FAILED_MESSAGE);
                return None;
            }
        };

        self.status = MutationStatus::Pending;
        match cache.api().upload_ad(payload).await {
            Ok(ad) => {
                cache.invalidate(QueryKey::Ads).await;
                self.reset();
                self.status = MutationStatus::Success;
                Some(ad)
            }
            Err(error) => {
                tracing::warn!(%error, "upload failed");
                self.status = MutationStatus::Error(UPLOAD_FAILED_MESSAGE);
                None
            }
        }
    }

    /// Clear the file and every field back to defaults.
    pub fn reset(&mut self) {
        self.file = None;
        self.fields = UploadFields::default();
        self.status = MutationStatus::Idle;
    }
}
