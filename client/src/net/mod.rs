//! Networking modules for the ad-network REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues authenticated JSON/multipart requests and `error` defines the
//! failures those requests can surface.

pub mod api;
pub mod error;

pub use api::ApiClient;
pub use error::ApiError;
