//! Domain types and logic for the deposit report.

pub mod deposits;
pub mod metrics;
pub mod money;
pub mod payload;
pub mod ranges;
