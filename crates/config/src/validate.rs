//! Semantic validation of a loaded configuration.

use courier_common::LOG_FORMATTER_BINDING;

use crate::schema::{CourierConfig, FormatterSettings};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. `components.log.formatter.step`
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: String, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

/// Check a configuration for values the dispatcher would reject and for
/// bindings that can never take effect.
pub fn validate(config: &CourierConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    let mut components: Vec<_> = config.components.iter().collect();
    components.sort_by(|a, b| a.0.cmp(b.0));
    for (name, settings) in components {
        if name.is_empty() || name.contains(':') {
            result.push(
                Severity::Error,
                format!("components.{name}"),
                "component names must be non-empty and must not contain ':'",
            );
        }
        if let Some(fmt) = &settings.formatter {
            check_step(&mut result, format!("components.{name}.formatter.step"), fmt);
            if !settings.format {
                result.push(
                    Severity::Info,
                    format!("components.{name}.formatter"),
                    "formatter is configured but formatting is disabled for this component",
                );
            }
        }
    }

    let mut bindings: Vec<_> = config.registry.iter().collect();
    bindings.sort_by(|a, b| a.0.cmp(b.0));
    for (name, fmt) in bindings {
        check_step(&mut result, format!("registry.{name}.step"), fmt);
        if name != LOG_FORMATTER_BINDING {
            let hint = if name.eq_ignore_ascii_case(LOG_FORMATTER_BINDING) {
                format!(" (did you mean \"{LOG_FORMATTER_BINDING}\"?)")
            } else {
                String::new()
            };
            result.push(
                Severity::Warning,
                format!("registry.{name}"),
                format!(
                    "formatter bound as \"{name}\" is never used for log formatting; only \
                     \"{LOG_FORMATTER_BINDING}\" is looked up{hint}"
                ),
            );
        }
    }

    result
}

fn check_step(result: &mut ValidationResult, path: String, fmt: &FormatterSettings) {
    if fmt.step == 0 {
        result.push(Severity::Error, path, "step must be greater than zero");
    }
}
