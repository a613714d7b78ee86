//! Session, cache and dialog state shared across views.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the process-wide session, `cache` holds fetched collections,
//! and `assign`/`upload` are the two dialogs that mutate backend data.

pub mod ads;
pub mod assign;
pub mod auth;
pub mod cache;
pub mod mutation;
pub mod upload;
