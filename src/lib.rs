//! Weighted grade tracking.
//!
//! [`grading`] holds the pure calculation engine. [`store`] owns the
//! category list and its JSON persistence, [`config`] the optional YAML
//! settings, and [`output`] renders engine results for the terminal.

pub mod config;
pub mod grading;
pub mod output;
pub mod store;
pub mod telemetry;
