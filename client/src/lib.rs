//! Client library for the DOOH ad-network admin tools.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` talks to the backend REST API, `state` holds the shared session,
//! query cache and dialog state, and `views` turns fetched data into page
//! view models. The `cli` crate is the only front-end today.

pub mod config;
pub mod net;
pub mod state;
pub mod views;

#[cfg(test)]
mod test_support;

pub use config::{ClientConfig, ConfigError};
pub use net::{ApiClient, ApiError};
pub use state::auth::{AuthContext, AuthError, FileTokenStore, MemoryTokenStore, Redirect, TokenStore};
pub use state::cache::{QueryCache, QueryKey};
pub use state::mutation::MutationStatus;
