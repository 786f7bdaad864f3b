//! Core traits for the host directory
//!
//! - [`RecordStore`]: Backing store the directory loads from and appends to

pub mod record_store;

pub use record_store::RecordStore;
