//! Runtime layer for hitstat.
//!
//! Owns the session state, reads and decodes uploaded files, and drives
//! each decoded grid through ingestion into the session.

pub mod loader;
pub mod session;
pub mod upload;

pub use hitstat_core as core;
pub use hitstat_data as data;
