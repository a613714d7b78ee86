//! Per-screen ad selection and the assignment list sent to a device.
//!
//! DESIGN
//! ======
//! Selection state is two explicit ordered sets of ad IDs plus one optional
//! premium ad ID, so toggling and building can be exercised without any
//! dialog around them. Holding a single premium ID is what keeps "at most one
//! premium ad per device" true on the client side.

#[cfg(test)]
#[path = "assignment_test.rs"]
mod assignment_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a screen index is outside the two physical surfaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScreenError {
    #[error("invalid screen index: {0} (expected 0 or 1)")]
    InvalidIndex(u8),
}

/// One of the two display surfaces on a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Screen {
    /// Screen 0.
    Top,
    /// Screen 1.
    Bottom,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Top, Screen::Bottom];

    /// Wire index of this screen.
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }

    /// Heading used by the assignment dialog.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "Screen 0 (Top)",
            Self::Bottom => "Screen 1 (Bottom)",
        }
    }
}

impl TryFrom<u8> for Screen {
    type Error = ScreenError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Top),
            1 => Ok(Self::Bottom),
            other => Err(ScreenError::InvalidIndex(other)),
        }
    }
}

impl Serialize for Screen {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for Screen {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Screen::try_from(raw).map_err(D::Error::custom)
    }
}

/// Playback priority of an assigned ad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    /// Shown while a phone is charging at the device.
    Premium,
}

impl Priority {
    /// `Premium` iff `ad_id` is the designated premium ad.
    #[must_use]
    pub fn for_ad(ad_id: &str, premium: Option<&str>) -> Self {
        if premium == Some(ad_id) {
            Self::Premium
        } else {
            Self::Normal
        }
    }
}

/// One ad on one screen with a priority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub ad_id: String,
    pub screen: Screen,
    pub priority: Priority,
}

/// Body of `POST /api/devices/{id}/assign`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub ads: Vec<Assignment>,
}

/// Ordered set of ad IDs checked for a single screen.
///
/// Order is first-selection order; re-selecting an ad after unchecking it
/// moves it to the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenSelection {
    ad_ids: Vec<String>,
}

impl ScreenSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `ad_id`. Returns `true` if the ad is now selected.
    pub fn toggle(&mut self, ad_id: &str) -> bool {
        if let Some(pos) = self.ad_ids.iter().position(|id| id == ad_id) {
            self.ad_ids.remove(pos);
            false
        } else {
            self.ad_ids.push(ad_id.to_owned());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, ad_id: &str) -> bool {
        self.ad_ids.iter().any(|id| id == ad_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ad_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ad_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ad_ids.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.ad_ids.clear();
    }
}

impl<S: AsRef<str>> FromIterator<S> for ScreenSelection {
    /// Builds a selection by toggling each ID in turn, so duplicates cancel.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            selection.toggle(id.as_ref());
        }
        selection
    }
}

/// Selection state of an open assignment dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentSelection {
    top: ScreenSelection,
    bottom: ScreenSelection,
    premium: Option<String>,
}

impl AssignmentSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `ad_id` on `screen`. Returns `true` if the ad is now selected.
    pub fn toggle(&mut self, ad_id: &str, screen: Screen) -> bool {
        self.selection_mut(screen).toggle(ad_id)
    }

    #[must_use]
    pub fn is_selected(&self, ad_id: &str, screen: Screen) -> bool {
        self.selection(screen).contains(ad_id)
    }

    #[must_use]
    pub fn selection(&self, screen: Screen) -> &ScreenSelection {
        match screen {
            Screen::Top => &self.top,
            Screen::Bottom => &self.bottom,
        }
    }

    fn selection_mut(&mut self, screen: Screen) -> &mut ScreenSelection {
        match screen {
            Screen::Top => &mut self.top,
            Screen::Bottom => &mut self.bottom,
        }
    }

    /// Designate the premium ad. `None` or an empty ID clears it.
    pub fn set_premium(&mut self, ad_id: Option<&str>) {
        self.premium = ad_id.filter(|id| !id.is_empty()).map(ToOwned::to_owned);
    }

    #[must_use]
    pub fn premium(&self) -> Option<&str> {
        self.premium.as_deref()
    }

    /// Discard all selections and the premium choice.
    pub fn clear(&mut self) {
        self.top.clear();
        self.bottom.clear();
        self.premium = None;
    }

    /// Flatten the current selection into the list submitted to the device.
    #[must_use]
    pub fn build(&self) -> Vec<Assignment> {
        build_assignments(&self.top, &self.bottom, self.premium())
    }
}

/// Produce one assignment per selected (ad, screen) pair.
///
/// Screen 0 entries come first in selection order, then screen 1 entries.
/// An entry is `premium` iff its ad ID equals `premium`.
#[must_use]
pub fn build_assignments(
    top: &ScreenSelection,
    bottom: &ScreenSelection,
    premium: Option<&str>,
) -> Vec<Assignment> {
    Screen::ALL
        .into_iter()
        .zip([top, bottom])
        .flat_map(|(screen, selection)| {
            selection.iter().map(move |ad_id| Assignment {
                ad_id: ad_id.to_owned(),
                screen,
                priority: Priority::for_ad(ad_id, premium),
            })
        })
        .collect()
}
