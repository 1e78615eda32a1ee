#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    num::NonZeroU64,
    sync::{Arc, Mutex},
};

use {
    courier_common::{
        Error, Exchange, ExchangeFormatter, InMemoryRegistry, LOG_FORMATTER_BINDING, Registry,
        Result,
    },
    courier_config::FormatOrder,
    courier_dispatch::{Component, Dispatcher},
    courier_format::{CountingFormatter, FormatterSource},
    courier_processors::{AgeIncrementer, InOutProcessor, Profile},
};

const KEYS: [&str; 4] = ["log:X", "log:X", "log:X2", "log:X2"];

async fn send_all(dispatcher: &Dispatcher) {
    for key in KEYS {
        dispatcher
            .dispatch(Exchange::new("Hello World"), key)
            .await
            .unwrap();
    }
}

fn registry_with(name: &str, formatter: Arc<dyn ExchangeFormatter>) -> Arc<InMemoryRegistry> {
    let registry = InMemoryRegistry::new();
    registry.bind_formatter(name, formatter);
    Arc::new(registry)
}

struct BrokenFormatter;

impl ExchangeFormatter for BrokenFormatter {
    fn name(&self) -> &str {
        "broken"
    }

    fn format(&self, _exchange: &Exchange) -> Result<String> {
        Err(Error::formatter("broken", "template missing"))
    }
}

/// Records whether each exchange already carried an output when formatted.
#[derive(Default)]
struct OutputProbe {
    seen: Mutex<Vec<bool>>,
}

impl ExchangeFormatter for OutputProbe {
    fn name(&self) -> &str {
        "probe"
    }

    fn format(&self, exchange: &Exchange) -> Result<String> {
        self.seen.lock().unwrap().push(exchange.has_output());
        Ok(exchange.to_string())
    }
}

#[tokio::test]
async fn explicit_formatter_counts_every_exchange() {
    let formatter = Arc::new(CountingFormatter::new("custom"));
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log").with_formatter(formatter.clone()))
        .build()
        .unwrap();

    send_all(&dispatcher).await;
    assert_eq!(formatter.count(), 4);
    assert_eq!(
        dispatcher.formatter_source("log"),
        Some(FormatterSource::Explicit)
    );
}

#[tokio::test]
async fn reserved_registry_binding_is_used() {
    let formatter = Arc::new(CountingFormatter::new(LOG_FORMATTER_BINDING));
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log"))
        .registry(registry_with(LOG_FORMATTER_BINDING, formatter.clone()))
        .build()
        .unwrap();

    send_all(&dispatcher).await;
    assert_eq!(formatter.count(), 4);
    assert_eq!(
        dispatcher.formatter_source("log"),
        Some(FormatterSource::Registry)
    );
}

#[tokio::test]
async fn other_registry_names_are_ignored() {
    let formatter = Arc::new(CountingFormatter::new("anotherFormatter"));
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log"))
        .registry(registry_with("anotherFormatter", formatter.clone()))
        .build()
        .unwrap();

    send_all(&dispatcher).await;
    assert_eq!(formatter.count(), 0);
    assert_eq!(dispatcher.formatter_source("log"), None);
    assert_eq!(dispatcher.formatter_stats("log").unwrap().fallbacks(), 4);
}

#[tokio::test]
async fn explicit_formatter_beats_registry() {
    let explicit = Arc::new(CountingFormatter::new("explicit"));
    let registered = Arc::new(CountingFormatter::new(LOG_FORMATTER_BINDING));
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log").with_formatter(explicit.clone()))
        .registry(registry_with(LOG_FORMATTER_BINDING, registered.clone()))
        .build()
        .unwrap();

    send_all(&dispatcher).await;
    assert_eq!(explicit.count(), 4);
    assert_eq!(registered.count(), 0);
}

#[tokio::test]
async fn step_applies_per_exchange() {
    let formatter = Arc::new(
        CountingFormatter::new("custom").with_step(NonZeroU64::new(10).unwrap()),
    );
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log").with_formatter(formatter.clone()))
        .build()
        .unwrap();

    send_all(&dispatcher).await;
    assert_eq!(formatter.count(), 40);
}

#[tokio::test]
async fn failing_formatter_does_not_block_delivery() {
    let profile = Arc::new(Profile::new());
    let dispatcher = Dispatcher::builder()
        .component(
            Component::new("reflect")
                .with_formatter(Arc::new(BrokenFormatter))
                .with_processor(Arc::new(InOutProcessor::new(AgeIncrementer::new(
                    profile.clone(),
                )))),
        )
        .build()
        .unwrap();

    let ex = dispatcher
        .dispatch(Exchange::in_out(41), "reflect:age")
        .await
        .unwrap();
    assert_eq!(ex.output().and_then(|p| p.extract::<i64>()), Some(42));

    let stats = dispatcher.formatter_stats("reflect").unwrap();
    assert_eq!(stats.calls(), 1);
    assert_eq!(stats.failures(), 1);
}

#[tokio::test]
async fn disabled_formatting_skips_formatter_but_runs_processors() {
    let formatter = Arc::new(CountingFormatter::new("custom"));
    let profile = Arc::new(Profile::new());
    let dispatcher = Dispatcher::builder()
        .component(
            Component::new("reflect")
                .with_format_enabled(false)
                .with_formatter(formatter.clone())
                .with_processor(Arc::new(InOutProcessor::new(AgeIncrementer::new(
                    profile.clone(),
                )))),
        )
        .build()
        .unwrap();

    dispatcher
        .dispatch(Exchange::in_out(1), "reflect:age")
        .await
        .unwrap();
    assert_eq!(formatter.count(), 0);
    assert_eq!(profile.increments(), 1);
}

#[tokio::test]
async fn format_order_controls_what_the_formatter_sees() {
    for (order, expected) in [
        (FormatOrder::BeforeProcessors, false),
        (FormatOrder::AfterProcessors, true),
    ] {
        let probe = Arc::new(OutputProbe::default());
        let dispatcher = Dispatcher::builder()
            .format_order(order)
            .component(
                Component::new("reflect")
                    .with_formatter(probe.clone())
                    .with_processor(Arc::new(InOutProcessor::new(AgeIncrementer::new(
                        Arc::new(Profile::new()),
                    )))),
            )
            .build()
            .unwrap();

        dispatcher
            .dispatch(Exchange::in_out(5), "reflect:age")
            .await
            .unwrap();
        assert_eq!(*probe.seen.lock().unwrap(), vec![expected], "{order:?}");
    }
}

#[tokio::test]
async fn reload_registry_switches_formatter() {
    let first = Arc::new(CountingFormatter::new("first"));
    let second = Arc::new(CountingFormatter::new("second"));
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log"))
        .registry(registry_with(LOG_FORMATTER_BINDING, first.clone()))
        .build()
        .unwrap();

    dispatcher
        .dispatch(Exchange::new("a"), "log:X")
        .await
        .unwrap();
    dispatcher.reload_registry(registry_with(LOG_FORMATTER_BINDING, second.clone()));
    dispatcher
        .dispatch(Exchange::new("b"), "log:X")
        .await
        .unwrap();

    assert_eq!(first.count(), 1);
    assert_eq!(second.count(), 1);
    // stats survive the reload
    assert_eq!(dispatcher.formatter_stats("log").unwrap().calls(), 2);
}

#[tokio::test]
async fn refresh_picks_up_new_bindings() {
    let registry = Arc::new(InMemoryRegistry::new());
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log"))
        .registry(registry.clone())
        .build()
        .unwrap();
    assert_eq!(dispatcher.formatter_source("log"), None);

    let formatter = Arc::new(CountingFormatter::new(LOG_FORMATTER_BINDING));
    registry.bind_formatter(LOG_FORMATTER_BINDING, formatter.clone());
    // resolution is not redone per exchange
    dispatcher
        .dispatch(Exchange::new("a"), "log:X")
        .await
        .unwrap();
    assert_eq!(formatter.count(), 0);

    dispatcher.refresh();
    dispatcher
        .dispatch(Exchange::new("b"), "log:X")
        .await
        .unwrap();
    assert_eq!(formatter.count(), 1);
}

#[tokio::test]
async fn set_formatter_overrides_and_clears() {
    let registered = Arc::new(CountingFormatter::new(LOG_FORMATTER_BINDING));
    let explicit = Arc::new(CountingFormatter::new("explicit"));
    let dispatcher = Dispatcher::builder()
        .component(Component::new("log"))
        .registry(registry_with(LOG_FORMATTER_BINDING, registered.clone()))
        .build()
        .unwrap();

    let override_with: Arc<dyn ExchangeFormatter> = explicit.clone();
    dispatcher.set_formatter("log", Some(override_with)).unwrap();
    dispatcher
        .dispatch(Exchange::new("a"), "log:X")
        .await
        .unwrap();
    assert_eq!(explicit.count(), 1);
    assert_eq!(registered.count(), 0);

    dispatcher.set_formatter("log", None).unwrap();
    assert_eq!(
        dispatcher.formatter_source("log"),
        Some(FormatterSource::Registry)
    );
    dispatcher
        .dispatch(Exchange::new("b"), "log:X")
        .await
        .unwrap();
    assert_eq!(registered.count(), 1);

    let err = dispatcher.set_formatter("missing", None).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatch_counts_every_exchange() {
    const EXCHANGES: usize = 200;

    let formatter = Arc::new(CountingFormatter::new("custom"));
    let dispatcher = Arc::new(
        Dispatcher::builder()
            .component(Component::new("log").with_formatter(formatter.clone()))
            .build()
            .unwrap(),
    );

    let tasks = (0..EXCHANGES).map(|i| {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            let key = if i % 2 == 0 { "log:X" } else { "log:X2" };
            dispatcher.dispatch(Exchange::new(i as i64), key).await
        })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(formatter.count(), EXCHANGES as u64);
    assert_eq!(
        dispatcher.formatter_stats("log").unwrap().calls(),
        EXCHANGES as u64
    );
}

#[test]
fn concurrent_reloads_leave_table_matching_registry() {
    let dispatcher = Arc::new(
        Dispatcher::builder()
            .component(Component::new("log"))
            .component(Component::new("audit"))
            .build()
            .unwrap(),
    );

    let threads: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                for round in 0..50 {
                    let name = format!("formatter-{i}-{round}");
                    dispatcher.reload_registry(registry_with(
                        LOG_FORMATTER_BINDING,
                        Arc::new(CountingFormatter::new(name)),
                    ));
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let registered = dispatcher
        .registry()
        .lookup(LOG_FORMATTER_BINDING)
        .and_then(|b| b.into_formatter())
        .unwrap();
    for component in ["log", "audit"] {
        assert_eq!(
            dispatcher.active_formatter(component).unwrap().name(),
            registered.name()
        );
    }
}
