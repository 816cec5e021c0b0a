//! Ingestion and aggregation layer for hitstat.
//!
//! Classifies raw spreadsheet grids as monthly menu-hit tables or daily
//! active-user tables, parses them into typed datasets, and computes the
//! rollup statistics and chart series consumed by the presentation layer.

pub mod aggregator;
pub mod charts;
pub mod classifier;
pub mod daily;
pub mod ingest;
pub mod monthly;

pub use hitstat_core as core;
pub use ingest::{ingest_grid, ParseOutcome, Parsed};
