use std::{fmt, sync::Arc};

use {
    courier_common::{ExchangeFormatter, LOG_FORMATTER_BINDING, Registry},
    tracing::debug,
};

/// Component-level configuration read by the resolver.
#[derive(Clone)]
pub struct ComponentConfig {
    name: String,
    formatter: Option<Arc<dyn ExchangeFormatter>>,
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn ExchangeFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn set_formatter(&mut self, formatter: Option<Arc<dyn ExchangeFormatter>>) {
        self.formatter = formatter;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicitly assigned formatter, if any.
    pub fn formatter(&self) -> Option<&Arc<dyn ExchangeFormatter>> {
        self.formatter.as_ref()
    }
}

impl fmt::Debug for ComponentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentConfig")
            .field("name", &self.name)
            .field("formatter", &self.formatter.as_ref().map(|x| x.name()))
            .finish()
    }
}

/// Which configuration source supplied the active formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterSource {
    Explicit,
    Registry,
}

impl fmt::Display for FormatterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("explicit"),
            Self::Registry => f.write_str("registry"),
        }
    }
}

#[derive(Clone)]
pub struct ResolvedFormatter {
    pub formatter: Arc<dyn ExchangeFormatter>,
    pub source: FormatterSource,
}

impl fmt::Debug for ResolvedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFormatter")
            .field("formatter", &self.formatter.name())
            .field("source", &self.source)
            .finish()
    }
}

/// Pick the active formatter for a component.
///
/// An explicit binding always wins. Otherwise only the binding named
/// [`LOG_FORMATTER_BINDING`] is consulted, and only if it holds a formatter.
/// Bindings under other names are never considered.
pub fn resolve_formatter(
    config: &ComponentConfig,
    registry: &dyn Registry,
) -> Option<ResolvedFormatter> {
    if let Some(formatter) = config.formatter() {
        debug!(
            component = config.name(),
            formatter = formatter.name(),
            "using explicit formatter"
        );
        return Some(ResolvedFormatter {
            formatter: Arc::clone(formatter),
            source: FormatterSource::Explicit,
        });
    }

    match registry.lookup(LOG_FORMATTER_BINDING) {
        Some(binding) => {
            let kind = binding.kind();
            match binding.into_formatter() {
                Some(formatter) => {
                    debug!(
                        component = config.name(),
                        formatter = formatter.name(),
                        "using registry formatter"
                    );
                    Some(ResolvedFormatter {
                        formatter,
                        source: FormatterSource::Registry,
                    })
                },
                None => {
                    debug!(
                        component = config.name(),
                        binding = LOG_FORMATTER_BINDING,
                        kind,
                        "reserved binding is not a formatter, ignoring"
                    );
                    None
                },
            }
        },
        None => {
            debug!(component = config.name(), "no custom formatter");
            None
        },
    }
}
