//! Core types for hitstat.
//!
//! Holds the untyped cell model handed over by spreadsheet decoders, the
//! cell normalizers, the typed monthly and daily datasets, the shared error
//! type, display formatting helpers and the command-line settings.

pub mod cell;
pub mod error;
pub mod formatting;
pub mod models;
pub mod normalizers;
pub mod settings;

pub use error::{Result, StatsError};
