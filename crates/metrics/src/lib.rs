//! Metrics collection and export for courier.
//!
//! Metric names live in per-area modules ([`formatter`], [`dispatch`],
//! [`processor`]) so every crate records against the same names. Recording goes through the `metrics`
//! facade; when no recorder is installed the macros are no-ops.
//!
//! ```rust,ignore
//! use courier_metrics::{counter, formatter, labels};
//!
//! counter!(formatter::INVOCATIONS_TOTAL, labels::COMPONENT => "log").increment(1);
//! ```
//!
//! # Features
//!
//! - `prometheus`: install a Prometheus recorder and render the text format

mod definitions;
mod error;
mod recorder;

pub use {
    definitions::*,
    error::{Error, Result},
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
