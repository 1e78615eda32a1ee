//! Formatter that counts its own invocations.

use std::{
    num::NonZeroU64,
    sync::atomic::{AtomicU64, Ordering},
};

use courier_common::{Exchange, ExchangeFormatter, Result};

/// Renders the exchange's `Display` form and adds a fixed step to an atomic
/// counter on every call.
///
/// The counter only grows. Only its total is exposed.
#[derive(Debug)]
pub struct CountingFormatter {
    name: String,
    step: NonZeroU64,
    counter: AtomicU64,
}

impl CountingFormatter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step: NonZeroU64::MIN,
            counter: AtomicU64::new(0),
        }
    }

    /// Use a step other than 1, e.g. 10 to tell two formatters apart in
    /// assertions.
    pub fn with_step(mut self, step: NonZeroU64) -> Self {
        self.step = step;
        self
    }

    pub fn step(&self) -> u64 {
        self.step.get()
    }

    /// Accumulated total: number of calls times the step.
    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

impl ExchangeFormatter for CountingFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, exchange: &Exchange) -> Result<String> {
        self.counter.fetch_add(self.step.get(), Ordering::AcqRel);
        Ok(exchange.to_string())
    }
}
