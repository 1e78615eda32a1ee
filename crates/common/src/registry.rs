//! Named-binding registry.
//!
//! A plain key-value store. Consumers look values up by exact name only; the
//! registry is never scanned for "anything that implements X".

use std::{fmt, sync::Arc};

use {dashmap::DashMap, tracing::debug};

use crate::formatter::ExchangeFormatter;

/// Reserved name under which a log formatter is discovered.
pub const LOG_FORMATTER_BINDING: &str = "logFormatter";

/// A value bound in the registry.
#[derive(Clone)]
pub enum Binding {
    Formatter(Arc<dyn ExchangeFormatter>),
    Value(serde_json::Value),
}

impl Binding {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Formatter(_) => "formatter",
            Self::Value(_) => "value",
        }
    }

    pub fn into_formatter(self) -> Option<Arc<dyn ExchangeFormatter>> {
        match self {
            Self::Formatter(f) => Some(f),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formatter(fmt) => write!(f, "Binding::Formatter({})", fmt.name()),
            Self::Value(v) => write!(f, "Binding::Value({v})"),
        }
    }
}

/// Read side of a named-binding store.
pub trait Registry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Binding>;
}

/// Thread-safe in-memory registry.
#[derive(Default)]
pub struct InMemoryRegistry {
    bindings: DashMap<String, Binding>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `binding` under `name`, returning the previous binding if any.
    pub fn bind(&self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        let name = name.into();
        debug!(name = %name, kind = binding.kind(), "registry binding added");
        self.bindings.insert(name, binding)
    }

    pub fn bind_formatter(
        &self,
        name: impl Into<String>,
        formatter: Arc<dyn ExchangeFormatter>,
    ) -> Option<Binding> {
        self.bind(name, Binding::Formatter(formatter))
    }

    pub fn unbind(&self, name: &str) -> Option<Binding> {
        self.bindings.remove(name).map(|(_, b)| b)
    }

    /// All bound names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Registry for InMemoryRegistry {
    fn lookup(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).map(|e| e.value().clone())
    }
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    fn lookup(&self, name: &str) -> Option<Binding> {
        (**self).lookup(name)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{Exchange, Result},
    };

    struct Named(&'static str);

    impl ExchangeFormatter for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn format(&self, exchange: &Exchange) -> Result<String> {
            Ok(exchange.to_string())
        }
    }

    #[test]
    fn lookup_is_by_exact_name() {
        let registry = InMemoryRegistry::new();
        registry.bind_formatter("anotherFormatter", Arc::new(Named("other")));

        assert!(registry.lookup(LOG_FORMATTER_BINDING).is_none());
        assert!(registry.lookup("logformatter").is_none());
        assert!(registry.lookup("anotherFormatter").is_some());
    }

    #[test]
    fn rebinding_replaces_and_returns_previous() {
        let registry = InMemoryRegistry::new();
        assert!(
            registry
                .bind_formatter(LOG_FORMATTER_BINDING, Arc::new(Named("first")))
                .is_none()
        );
        let previous = registry
            .bind_formatter(LOG_FORMATTER_BINDING, Arc::new(Named("second")))
            .unwrap();
        assert_eq!(previous.into_formatter().unwrap().name(), "first");

        let current = registry.lookup(LOG_FORMATTER_BINDING).unwrap();
        assert_eq!(current.into_formatter().unwrap().name(), "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn value_binding_is_not_a_formatter() {
        let registry = InMemoryRegistry::new();
        registry.bind(LOG_FORMATTER_BINDING, Binding::Value(serde_json::json!("x")));
        let binding = registry.lookup(LOG_FORMATTER_BINDING).unwrap();
        assert_eq!(binding.kind(), "value");
        assert!(binding.into_formatter().is_none());
    }

    #[test]
    fn unbind_and_names() {
        let registry = InMemoryRegistry::new();
        registry.bind("b", Binding::Value(serde_json::json!(1)));
        registry.bind("a", Binding::Value(serde_json::json!(2)));
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(registry.unbind("a").is_some());
        assert!(registry.unbind("a").is_none());
        assert_eq!(registry.names(), vec!["b".to_string()]);
    }
}
