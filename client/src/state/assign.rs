//! Ad-assignment dialog for a single device.
//!
//! SYSTEM CONTEXT
//! ==============
//! Opened from the devices view. Holds the per-screen selection only while
//! open; a successful submit invalidates cached devices and closes the
//! dialog, a failed one keeps the selection and raises the error flag.

#[cfg(test)]
#[path = "assign_test.rs"]
mod assign_test;

use models::{Ad, Assignment, AssignmentSelection, Device, Screen};

use super::cache::{QueryCache, QueryKey};
use super::mutation::MutationStatus;
use crate::net::ApiError;

pub const ASSIGN_FAILED_MESSAGE: &str = "Assignment failed. Please try again.";

#[derive(Clone, Debug)]
pub struct AssignDialog {
    device: Device,
    ads: Vec<Ad>,
    selection: AssignmentSelection,
    status: MutationStatus,
    open: bool,
}

impl AssignDialog {
    /// Open the dialog for `device`, loading the available ads.
    ///
    /// # Errors
    ///
    /// Returns an error if the ad list cannot be fetched.
    pub async fn open(cache: &QueryCache, device: Device) -> Result<Self, ApiError> {
        let ads = cache.ads().await?;
        Ok(Self::with_ads(device, ads))
    }

    #[must_use]
    pub fn with_ads(device: Device, ads: Vec<Ad>) -> Self {
        Self {
            device,
            ads,
            selection: AssignmentSelection::new(),
            status: MutationStatus::Idle,
            open: true,
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("Assign Ads to {}", self.device.name)
    }

    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    #[must_use]
    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    #[must_use]
    pub fn find_ad(&self, ad_id: &str) -> Option<&Ad> {
        self.ads.iter().find(|ad| ad.id == ad_id)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn status(&self) -> &MutationStatus {
        &self.status
    }

    #[must_use]
    pub fn selection(&self) -> &AssignmentSelection {
        &self.selection
    }

    pub fn toggle(&mut self, ad_id: &str, screen: Screen) -> bool {
        self.selection.toggle(ad_id, screen)
    }

    pub fn set_premium(&mut self, ad_id: Option<&str>) {
        self.selection.set_premium(ad_id);
    }

    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        self.selection.build()
    }

    /// Submit every selected assignment in one request.
    ///
    /// Returns the resulting status; the dialog is closed iff it is
    /// [`MutationStatus::Success`].
    pub async fn submit(&mut self, cache: &QueryCache) -> MutationStatus {
        self.status = MutationStatus::Pending;
        let assignments = self.assignments();
        match cache.api().assign_ads(&self.device.id, assignments).await {
            Ok(()) => {
                cache.invalidate(QueryKey::Devices).await;
                self.close();
                self.status = MutationStatus::Success;
            }
            Err(error) => {
                tracing::warn!(device_id = %self.device.id, %error, "assignment failed");
                self.status = MutationStatus::Error(ASSIGN_FAILED_MESSAGE);
            }
        }
        self.status.clone()
    }

    /// Discard the selection and close.
    pub fn close(&mut self) {
        self.selection.clear();
        self.status = MutationStatus::Idle;
        self.open = false;
    }
}
