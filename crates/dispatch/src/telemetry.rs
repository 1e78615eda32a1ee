//! Tracing (and optionally metrics) setup from configuration.

use {
    courier_common::{Error, Result},
    courier_config::LoggingSettings,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `settings.level`. Fails if a subscriber is already
/// installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .try_init()
            .map_err(Error::other)
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init()
            .map_err(Error::other)
    }
}

/// Install the metrics recorder described by `settings`.
#[cfg(feature = "metrics")]
pub fn init_metrics(
    settings: &courier_config::MetricsSettings,
) -> courier_metrics::Result<courier_metrics::MetricsHandle> {
    let mut global_labels: Vec<(String, String)> = settings
        .global_labels
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    global_labels.sort();
    courier_metrics::init_metrics(courier_metrics::MetricsRecorderConfig {
        enabled: settings.enabled,
        global_labels,
    })
}
