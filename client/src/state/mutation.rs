//! Pending/error flags for a single asynchronous mutation.

/// Lifecycle of one mutation as seen by the dialog that triggered it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    /// Static, user-facing message. Causes are logged, not shown.
    Error(&'static str),
}

impl MutationStatus {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}
