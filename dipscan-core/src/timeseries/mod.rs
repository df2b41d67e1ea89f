//! Time-series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `normalize`: reshape raw provider rows into a canonical series
//! - `interval`: resolve a sampling interval against a provider point budget

/// Interval resolution against fixed-size provider windows.
pub mod interval;
/// Normalization and resampling of raw provider rows.
pub mod normalize;
