//! Dispatch core.
//!
//! For each exchange sent to an endpoint (`component:path`), the dispatcher
//! invokes the component's resolved formatter exactly once and threads the
//! exchange through the component's processor chain. Formatter and processor
//! failures are logged and counted and never block delivery; only invalid
//! arguments reach the caller.

pub mod dispatcher;
pub mod endpoint;
pub mod stats;
pub mod telemetry;

pub use {
    dispatcher::{Component, Dispatcher, DispatcherBuilder, EXCHANGE_LOG_TARGET},
    endpoint::EndpointKey,
    stats::{FormatterStats, FormatterStatsSnapshot},
    telemetry::init_tracing,
};

#[cfg(feature = "metrics")]
pub use telemetry::init_metrics;
