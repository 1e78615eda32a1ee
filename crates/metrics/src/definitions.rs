//! Metric name and label definitions.
//!
//! Centralizing these keeps names consistent across crates and documents what
//! is available.

/// Exchange formatter metrics
pub mod formatter {
    /// Total number of formatter invocations
    pub const INVOCATIONS_TOTAL: &str = "courier_formatter_invocations_total";
    /// Formatter invocations that returned an error
    pub const FAILURES_TOTAL: &str = "courier_formatter_failures_total";
    /// Exchanges rendered with the default rendering (no formatter resolved)
    pub const FALLBACK_RENDERS_TOTAL: &str = "courier_formatter_fallback_renders_total";
    /// Formatter duration in seconds
    pub const DURATION_SECONDS: &str = "courier_formatter_duration_seconds";
}

/// Dispatch metrics
pub mod dispatch {
    /// Total number of exchanges dispatched
    pub const EXCHANGES_TOTAL: &str = "courier_dispatch_exchanges_total";
    /// Dispatches rejected before reaching any stage
    pub const REJECTED_TOTAL: &str = "courier_dispatch_rejected_total";
    /// End-to-end dispatch duration in seconds
    pub const DURATION_SECONDS: &str = "courier_dispatch_duration_seconds";
    /// Formatter resolutions performed (startup and reloads)
    pub const RESOLUTIONS_TOTAL: &str = "courier_dispatch_formatter_resolutions_total";
}

/// Processor metrics
pub mod processor {
    /// Total number of processor executions
    pub const EXECUTIONS_TOTAL: &str = "courier_processor_executions_total";
    /// Executions that ended in a guard mismatch
    pub const GUARD_MISMATCHES_TOTAL: &str = "courier_processor_guard_mismatches_total";
    /// Executions that returned an error
    pub const ERRORS_TOTAL: &str = "courier_processor_errors_total";
}

/// Common label keys
pub mod labels {
    pub const COMPONENT: &str = "component";
    pub const PROCESSOR: &str = "processor";
    pub const SOURCE: &str = "source";
    pub const OUTCOME: &str = "outcome";
}

/// Standard histogram buckets
pub mod buckets {
    /// Stage duration buckets (in seconds)
    /// Covers 10µs to 1s
    pub const STAGE_DURATION: &[f64] = &[
        0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
    ];
}
