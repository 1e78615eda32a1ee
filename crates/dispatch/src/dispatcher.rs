use std::{
    collections::{HashMap, HashSet},
    fmt,
    num::NonZeroU64,
    sync::{Arc, RwLock},
    time::Instant,
};

use {
    courier_common::{
        Error, Exchange, ExchangeFormatter, InMemoryRegistry, Processor, Registry, Result,
    },
    courier_config::{ComponentSettings, CourierConfig, FormatOrder, LogLevel},
    courier_format::{
        ComponentConfig, CountingFormatter, FormatterSource, ResolvedFormatter, resolve_formatter,
    },
    courier_processors::ProcessorChain,
    tracing::{debug, error, info, trace, warn},
};

#[cfg(feature = "metrics")]
use courier_metrics::{
    counter, dispatch as dispatch_metrics, formatter as formatter_metrics, histogram, labels,
};

use crate::{endpoint::EndpointKey, stats::FormatterStats};

/// Tracing target that rendered exchanges are logged under.
pub const EXCHANGE_LOG_TARGET: &str = "courier::exchange";

/// A component: its formatter configuration, log options and processors.
#[derive(Clone)]
pub struct Component {
    config: ComponentConfig,
    format_enabled: bool,
    level: LogLevel,
    chain: ProcessorChain,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: ComponentConfig::new(name),
            format_enabled: true,
            level: LogLevel::default(),
            chain: ProcessorChain::new(),
        }
    }

    /// Build a component from its configuration entry. An explicit formatter
    /// entry becomes a [`CountingFormatter`] named `<component>-formatter`.
    pub fn from_settings(name: &str, settings: &ComponentSettings) -> Result<Self> {
        let mut component = Self::new(name)
            .with_level(settings.level)
            .with_format_enabled(settings.format);
        if let Some(fmt) = &settings.formatter {
            let formatter = counting_formatter(format!("{name}-formatter"), fmt.step)?;
            component = component.with_formatter(Arc::new(formatter));
        }
        Ok(component)
    }

    /// Explicit formatter binding; takes precedence over the registry.
    pub fn with_formatter(mut self, formatter: Arc<dyn ExchangeFormatter>) -> Self {
        self.config = self.config.with_formatter(formatter);
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// When disabled, no formatter runs and nothing is logged; processors
    /// still run.
    pub fn with_format_enabled(mut self, enabled: bool) -> Self {
        self.format_enabled = enabled;
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn Processor>) -> Self {
        self.chain.push(processor);
        self
    }

    pub fn with_chain(mut self, chain: ProcessorChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("config", &self.config)
            .field("format_enabled", &self.format_enabled)
            .field("level", &self.level)
            .field("chain", &self.chain)
            .finish()
    }
}

fn counting_formatter(name: String, step: u64) -> Result<CountingFormatter> {
    let step = NonZeroU64::new(step)
        .ok_or_else(|| Error::invalid_argument(format!("formatter {name}: step must be > 0")))?;
    Ok(CountingFormatter::new(name).with_step(step))
}

fn validate_component_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(':') {
        return Err(Error::invalid_argument(format!(
            "invalid component name {name:?}"
        )));
    }
    Ok(())
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Collects components, the registry and dispatch options.
#[derive(Default)]
pub struct DispatcherBuilder {
    components: Vec<Component>,
    processors: Vec<(String, Arc<dyn Processor>)>,
    registry: Option<Arc<dyn Registry>>,
    format_order: FormatOrder,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from loaded configuration.
    ///
    /// Registry entries become [`CountingFormatter`]s bound under their
    /// configured names in a fresh [`InMemoryRegistry`].
    pub fn from_config(config: &CourierConfig) -> Result<Self> {
        let registry = InMemoryRegistry::new();
        for (name, fmt) in &config.registry {
            let formatter = counting_formatter(name.clone(), fmt.step)?;
            registry.bind_formatter(name.clone(), Arc::new(formatter));
        }

        let mut names: Vec<&String> = config.components.keys().collect();
        names.sort();
        let mut builder = Self::new()
            .registry(Arc::new(registry))
            .format_order(config.dispatch.format_order);
        for name in names {
            let component = Component::from_settings(name, &config.components[name])?;
            builder = builder.component(component);
        }
        Ok(builder)
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Append a processor to a component added earlier or later in the build.
    pub fn processor(
        mut self,
        component: impl Into<String>,
        processor: Arc<dyn Processor>,
    ) -> Self {
        self.processors.push((component.into(), processor));
        self
    }

    pub fn registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn format_order(mut self, order: FormatOrder) -> Self {
        self.format_order = order;
        self
    }

    /// Validate components and resolve each one's formatter.
    pub fn build(self) -> Result<Dispatcher> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(InMemoryRegistry::new()));

        let mut seen = HashSet::new();
        let mut components: HashMap<String, Component> = HashMap::new();
        for component in self.components {
            validate_component_name(component.name())?;
            if !seen.insert(component.name().to_string()) {
                return Err(Error::invalid_argument(format!(
                    "component {:?} registered twice",
                    component.name()
                )));
            }
            components.insert(component.name().to_string(), component);
        }

        for (name, processor) in self.processors {
            let Some(component) = components.get_mut(&name) else {
                return Err(Error::invalid_argument(format!(
                    "processor {} targets unknown component {name:?}",
                    processor.name()
                )));
            };
            component.chain.push(processor);
        }

        let states = components
            .into_iter()
            .map(|(name, component)| {
                let state = ComponentState::resolve(component, &*registry, Arc::default());
                (name, Arc::new(state))
            })
            .collect();

        info!(
            components = seen.len(),
            order = ?self.format_order,
            "dispatcher ready"
        );

        Ok(Dispatcher {
            components: RwLock::new(states),
            registry: RwLock::new(registry),
            format_order: self.format_order,
        })
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────────────

/// Resolved, immutable view of one component. Replaced wholesale on reload.
struct ComponentState {
    component: Component,
    resolved: Option<ResolvedFormatter>,
    stats: Arc<FormatterStats>,
}

impl ComponentState {
    fn resolve(component: Component, registry: &dyn Registry, stats: Arc<FormatterStats>) -> Self {
        let resolved = resolve_formatter(&component.config, registry);
        match &resolved {
            Some(r) => debug!(
                component = component.name(),
                formatter = r.formatter.name(),
                source = %r.source,
                "formatter resolved"
            ),
            None => debug!(component = component.name(), "no custom formatter, using default rendering"),
        }
        #[cfg(feature = "metrics")]
        counter!(dispatch_metrics::RESOLUTIONS_TOTAL, labels::COMPONENT => component.name().to_string())
            .increment(1);
        Self {
            component,
            resolved,
            stats,
        }
    }
}

/// Formats and processes exchanges for a set of components.
///
/// Formatter resolution happens at build time and on explicit reload, never
/// per exchange. `dispatch` may be called concurrently from many tasks.
pub struct Dispatcher {
    components: RwLock<HashMap<String, Arc<ComponentState>>>,
    registry: RwLock<Arc<dyn Registry>>,
    format_order: FormatOrder,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Send one exchange to `endpoint_key` (`component:path`).
    ///
    /// The component's formatter runs exactly once, before or after the
    /// processor chain depending on [`FormatOrder`]. Formatter and processor
    /// failures are logged and counted; neither stops delivery. A failing
    /// processor ends the chain and the exchange is returned as it stands.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a malformed key or unknown component.
    /// No other error reaches the caller.
    pub async fn dispatch(&self, mut exchange: Exchange, endpoint_key: &str) -> Result<Exchange> {
        let started = Instant::now();
        let endpoint = match EndpointKey::parse(endpoint_key) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                #[cfg(feature = "metrics")]
                counter!(dispatch_metrics::REJECTED_TOTAL).increment(1);
                return Err(e);
            },
        };
        let state = self.state(endpoint.component())?;

        let result = match self.format_order {
            FormatOrder::BeforeProcessors => {
                self.log_exchange(&state, &endpoint, &exchange);
                state.component.chain.run(&mut exchange).await
            },
            FormatOrder::AfterProcessors => {
                let result = state.component.chain.run(&mut exchange).await;
                self.log_exchange(&state, &endpoint, &exchange);
                result
            },
        };

        #[cfg(feature = "metrics")]
        {
            counter!(dispatch_metrics::EXCHANGES_TOTAL, labels::COMPONENT => endpoint.component().to_string())
                .increment(1);
            histogram!(dispatch_metrics::DURATION_SECONDS, labels::COMPONENT => endpoint.component().to_string())
                .record(started.elapsed().as_secs_f64());
        }
        debug!(
            endpoint = %endpoint,
            exchange_id = %exchange.id(),
            elapsed_us = started.elapsed().as_micros() as u64,
            ok = result.is_ok(),
            "exchange dispatched"
        );

        Ok(exchange)
    }

    fn state(&self, component: &str) -> Result<Arc<ComponentState>> {
        let components = self.components.read().unwrap_or_else(|e| e.into_inner());
        components.get(component).cloned().ok_or_else(|| {
            #[cfg(feature = "metrics")]
            counter!(dispatch_metrics::REJECTED_TOTAL).increment(1);
            Error::invalid_argument(format!("unknown component {component:?}"))
        })
    }

    /// Render the exchange once and emit it at the component's level.
    fn log_exchange(&self, state: &ComponentState, endpoint: &EndpointKey, exchange: &Exchange) {
        if !state.component.format_enabled {
            return;
        }

        let rendered = match &state.resolved {
            Some(resolved) => {
                let start = Instant::now();
                let result = resolved.formatter.format(exchange);
                let latency = start.elapsed();
                #[cfg(feature = "metrics")]
                {
                    counter!(formatter_metrics::INVOCATIONS_TOTAL, labels::COMPONENT => endpoint.component().to_string(), labels::SOURCE => resolved.source.to_string())
                        .increment(1);
                    histogram!(formatter_metrics::DURATION_SECONDS, labels::COMPONENT => endpoint.component().to_string())
                        .record(latency.as_secs_f64());
                }
                match result {
                    Ok(rendered) => {
                        state.stats.record_success(latency);
                        rendered
                    },
                    Err(e) => {
                        state.stats.record_failure(latency);
                        #[cfg(feature = "metrics")]
                        counter!(formatter_metrics::FAILURES_TOTAL, labels::COMPONENT => endpoint.component().to_string())
                            .increment(1);
                        warn!(
                            endpoint = %endpoint,
                            formatter = resolved.formatter.name(),
                            exchange_id = %exchange.id(),
                            error = %e,
                            "exchange formatter failed, continuing delivery"
                        );
                        return;
                    },
                }
            },
            None => {
                state.stats.record_fallback();
                #[cfg(feature = "metrics")]
                counter!(formatter_metrics::FALLBACK_RENDERS_TOTAL, labels::COMPONENT => endpoint.component().to_string())
                    .increment(1);
                exchange.to_string()
            },
        };

        let component = endpoint.component();
        let path = endpoint.path();
        match state.component.level {
            LogLevel::Trace => {
                trace!(target: EXCHANGE_LOG_TARGET, component, path, "{rendered}")
            },
            LogLevel::Debug => {
                debug!(target: EXCHANGE_LOG_TARGET, component, path, "{rendered}")
            },
            LogLevel::Info => {
                info!(target: EXCHANGE_LOG_TARGET, component, path, "{rendered}")
            },
            LogLevel::Warn => {
                warn!(target: EXCHANGE_LOG_TARGET, component, path, "{rendered}")
            },
            LogLevel::Error => {
                error!(target: EXCHANGE_LOG_TARGET, component, path, "{rendered}")
            },
        }
    }

    // ── Reload ──────────────────────────────────────────────────────────────

    // The components lock is always taken before the registry lock, so the
    // table is re-resolved against the registry that is current when it is
    // written.

    /// Swap in a new registry and re-resolve every component.
    pub fn reload_registry(&self, registry: Arc<dyn Registry>) {
        let mut components = self.components.write().unwrap_or_else(|e| e.into_inner());
        *self.registry.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&registry);
        Self::reresolve(&mut components, &*registry);
    }

    /// Re-resolve every component against the current registry, e.g. after
    /// bindings were added to or removed from it.
    pub fn refresh(&self) {
        let mut components = self.components.write().unwrap_or_else(|e| e.into_inner());
        let registry = self.current_registry();
        Self::reresolve(&mut components, &*registry);
    }

    fn reresolve(
        components: &mut HashMap<String, Arc<ComponentState>>,
        registry: &dyn Registry,
    ) {
        for state in components.values_mut() {
            *state = Arc::new(ComponentState::resolve(
                state.component.clone(),
                registry,
                Arc::clone(&state.stats),
            ));
        }
        info!(components = components.len(), "formatters re-resolved");
    }

    /// Replace (or clear, with `None`) a component's explicit formatter and
    /// re-resolve that component.
    pub fn set_formatter(
        &self,
        component: &str,
        formatter: Option<Arc<dyn ExchangeFormatter>>,
    ) -> Result<()> {
        let mut components = self.components.write().unwrap_or_else(|e| e.into_inner());
        let registry = self.current_registry();
        let Some(state) = components.get_mut(component) else {
            return Err(Error::invalid_argument(format!(
                "unknown component {component:?}"
            )));
        };
        let mut updated = state.component.clone();
        updated.config.set_formatter(formatter);
        *state = Arc::new(ComponentState::resolve(
            updated,
            &*registry,
            Arc::clone(&state.stats),
        ));
        Ok(())
    }

    // ── Introspection ───────────────────────────────────────────────────────

    /// Which binding supplied the component's formatter; `None` when the
    /// component is unknown or uses the default rendering.
    pub fn formatter_source(&self, component: &str) -> Option<FormatterSource> {
        self.state(component)
            .ok()
            .and_then(|s| s.resolved.as_ref().map(|r| r.source))
    }

    /// The component's active formatter, if one was resolved.
    pub fn active_formatter(&self, component: &str) -> Option<Arc<dyn ExchangeFormatter>> {
        self.state(component)
            .ok()
            .and_then(|s| s.resolved.as_ref().map(|r| Arc::clone(&r.formatter)))
    }

    pub fn formatter_stats(&self, component: &str) -> Option<Arc<FormatterStats>> {
        self.state(component).ok().map(|s| Arc::clone(&s.stats))
    }

    /// Exchanges whose processor chain ended in an error.
    pub fn processor_failures(&self, component: &str) -> Option<u64> {
        self.state(component).ok().map(|s| s.component.chain.failures())
    }

    pub fn registry(&self) -> Arc<dyn Registry> {
        self.current_registry()
    }

    fn current_registry(&self) -> Arc<dyn Registry> {
        let registry = self.registry.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*registry)
    }

    /// Registered component names, sorted.
    pub fn component_names(&self) -> Vec<String> {
        let components = self.components.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = components.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn format_order(&self) -> FormatOrder {
        self.format_order
    }
}
