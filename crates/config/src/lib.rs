//! Configuration loading, validation and env substitution.
//!
//! Config files: `courier.toml`, `courier.yaml` or `courier.json`.
//! Searched in `./` then the user config directory.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, discover_in, load_config, parse_config},
    schema::{
        ComponentSettings, CourierConfig, DispatchSettings, FormatOrder, FormatterSettings,
        LogLevel, LoggingSettings, MetricsSettings,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
