//! Ad creatives as listed by `/api/ads`.

#[cfg(test)]
#[path = "ad_test.rs"]
mod ad_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Media kind of an ad creative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
}

impl MediaType {
    /// Infer the media kind from a declared MIME type.
    ///
    /// Only `video/*` maps to [`MediaType::Video`]; every other declared type,
    /// including an empty one, is treated as an image.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Wire name (`"video"` or `"image"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded ad creative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name shown to operators.
    pub name: String,
    /// Video or image.
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Public URL of the stored creative.
    pub url: String,
    /// Playback duration in seconds.
    pub duration: u32,
    /// Advertiser label, if one was entered at upload time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Stored size in bytes, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
