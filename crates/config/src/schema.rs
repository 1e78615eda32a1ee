/// Config schema types (components, registry bindings, dispatch, logging, metrics).
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    /// Per-component settings keyed by component name (the endpoint scheme,
    /// e.g. `log` for `log:orders`).
    pub components: HashMap<String, ComponentSettings>,
    /// Formatters bound in the named registry, keyed by binding name.
    pub registry: HashMap<String, FormatterSettings>,
    pub dispatch: DispatchSettings,
    pub logging: LoggingSettings,
    pub metrics: MetricsSettings,
}

/// Settings for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSettings {
    /// Whether exchanges reaching this component are formatted and logged.
    pub format: bool,
    /// Level the rendered exchange is logged at.
    pub level: LogLevel,
    /// Explicit formatter binding. Takes precedence over the registry.
    pub formatter: Option<FormatterSettings>,
}

impl Default for ComponentSettings {
    fn default() -> Self {
        Self {
            format: true,
            level: LogLevel::default(),
            formatter: None,
        }
    }
}

/// Settings for a counting formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterSettings {
    /// Amount added to the invocation counter per call. Must be non-zero.
    pub step: u64,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self { step: 1 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Where the formatter runs relative to the processor chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatOrder {
    #[default]
    BeforeProcessors,
    AfterProcessors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub format_order: FormatOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub global_labels: HashMap<String, String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: CourierConfig = toml::from_str("").unwrap();
        assert!(cfg.components.is_empty());
        assert!(cfg.registry.is_empty());
        assert_eq!(cfg.dispatch.format_order, FormatOrder::BeforeProcessors);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.metrics.enabled);
    }

    #[test]
    fn component_defaults_fill_missing_fields() {
        let cfg: CourierConfig = toml::from_str(
            r#"
            [components.log]
            level = "debug"

            [components.log.formatter]
            "#,
        )
        .unwrap();
        let log = &cfg.components["log"];
        assert!(log.format);
        assert_eq!(log.level, LogLevel::Debug);
        assert_eq!(log.formatter, Some(FormatterSettings { step: 1 }));
    }

    #[test]
    fn format_order_uses_snake_case() {
        let cfg: CourierConfig = serde_json::from_str(
            r#"{"dispatch": {"format_order": "after_processors"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.dispatch.format_order, FormatOrder::AfterProcessors);
    }
}
