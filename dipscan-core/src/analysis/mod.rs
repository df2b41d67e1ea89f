//! Derived analyses over canonical price series.
//!
//! Modules include:
//! - `bucket`: time-of-day aggregation and the cheapest-bucket search
//! - `ladder`: the tiered DCA order-ladder simulator
//! - `schedule`: daily vs. twice-monthly purchase schedule comparison

/// Time-of-day bucket aggregation.
pub mod bucket;
/// DCA ladder simulation and tier suggestion.
pub mod ladder;
/// Purchase schedule comparison over daily closes.
pub mod schedule;
