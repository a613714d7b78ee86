//! Shared data model and pure client logic for the DOOH admin tools.
//!
//! This crate owns the JSON representation exchanged with the ad-network
//! backend, plus the pieces of client logic that never touch the network:
//! per-screen ad selection, assignment building, upload payload building,
//! device status classification, and display formatting. Both `client` and
//! `cli` depend on it.

pub mod ad;
pub mod assignment;
pub mod device;
pub mod envelope;
pub mod format;
pub mod report;
pub mod stat;
pub mod upload;
pub mod user;

pub use ad::{Ad, MediaType};
pub use assignment::{
    AssignRequest, Assignment, AssignmentSelection, Priority, Screen, ScreenError, ScreenSelection,
    build_assignments,
};
pub use device::{Device, DeviceStatus, StatusFilter};
pub use envelope::{
    AdsEnvelope, AuthResponse, CreatedAd, DevicesEnvelope, Envelope, MessageEnvelope, StatsEnvelope,
    UserEnvelope,
};
pub use report::{DashboardStats, ReportFilter, ReportRangeError, ReportStats};
pub use stat::{EventType, Stat};
pub use upload::{UploadError, UploadFields, UploadFile, UploadPayload};
pub use user::{LoginRequest, User};
