//! Core of the wbgt ecosystem.
//!
//! - `record` and `slot`: measurement records, sites and time slots
//! - `sync`: the offline-first sync engine between the local cache and the remote store
//! - `local` / `remote`: the two stores the engine reconciles
//! - `calendar`, `detail`, `heat`: views derived from the record set
//! - `validate`: form-level checks that run before the engine is called

pub mod calendar;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod detail;
pub mod error;
pub mod heat;
pub mod local;
pub mod record;
pub mod remote;
pub mod slot;
pub mod sync;
pub mod validate;

pub use error::{WbgtError, WbgtResult};
pub use record::{Record, Site};
pub use slot::TimeSlot;
pub use sync::SyncEngine;
