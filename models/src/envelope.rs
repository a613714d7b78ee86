//! `{ success, ... }` wrappers the backend puts around every JSON response.

#[cfg(test)]
#[path = "envelope_test.rs"]
mod envelope_test;

use serde::{Deserialize, Serialize};

use crate::ad::Ad;
use crate::device::Device;
use crate::user::User;

/// Common access to the `success` flag of a response envelope.
pub trait Envelope {
    fn success(&self) -> bool;

    /// Server-supplied explanation for a `success: false` body, if any.
    fn message(&self) -> Option<&str> {
        None
    }
}

macro_rules! envelope {
    ($name:ident { $field:ident: $ty:ty }) => {
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default = "default_success")]
            pub success: bool,
            pub $field: $ty,
        }

        impl Envelope for $name {
            fn success(&self) -> bool {
                self.success
            }
        }
    };
}

envelope!(AdsEnvelope { ads: Vec<Ad> });
envelope!(DevicesEnvelope { devices: Vec<Device> });
envelope!(UserEnvelope { user: User });

/// `{ success, stats }` as returned by the report endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub stats: T,
}

impl<T> Envelope for StatsEnvelope<T> {
    fn success(&self) -> bool {
        self.success
    }
}

/// Response of `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub token: String,
    pub user: User,
}

impl Envelope for AuthResponse {
    fn success(&self) -> bool {
        self.success
    }
}

/// Response of `POST /api/ads/upload`: either `{ success, ad }` or the bare ad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAd {
    Wrapped {
        #[serde(default = "default_success")]
        success: bool,
        ad: Ad,
    },
    Bare(Ad),
}

impl CreatedAd {
    #[must_use]
    pub fn into_ad(self) -> Ad {
        match self {
            Self::Wrapped { ad, .. } | Self::Bare(ad) => ad,
        }
    }
}

impl Envelope for CreatedAd {
    fn success(&self) -> bool {
        match self {
            Self::Wrapped { success, .. } => *success,
            Self::Bare(_) => true,
        }
    }
}

/// Confirmation body of mutations such as delete and assign.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl Envelope for MessageEnvelope {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

fn default_success() -> bool {
    true
}
