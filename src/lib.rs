//! Rental property deal analysis.
//!
//! [`core`] holds the pure analysis engine: amortization, the rent heuristic,
//! expense aggregation, return ratios and the deal score. [`api`] wraps it in a
//! validated HTTP service and command-line interface.

pub mod api;
pub mod core;
