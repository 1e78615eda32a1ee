use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use {
    courier_common::{Error, Exchange, ProcessOutcome, Processor, Result},
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use courier_metrics::{counter, labels, processor as processor_metrics};

/// Ordered list of processors applied to one exchange.
///
/// A guard mismatch never stops the chain. An error does: it is logged,
/// counted and returned as [`Error::Processor`] naming the failing processor.
///
/// Clones share the failure counter.
#[derive(Clone, Default)]
pub struct ProcessorChain {
    processors: Vec<Arc<dyn Processor>>,
    failures: Arc<AtomicU64>,
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processor (builder style).
    pub fn with(mut self, processor: Arc<dyn Processor>) -> Self {
        self.processors.push(processor);
        self
    }

    pub fn push(&mut self, processor: Arc<dyn Processor>) {
        self.processors.push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Runs that ended in a processor error.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Run every processor in order, returning each one's outcome.
    pub async fn run(&self, exchange: &mut Exchange) -> Result<Vec<ProcessOutcome>> {
        let mut outcomes = Vec::with_capacity(self.processors.len());

        for processor in &self.processors {
            let name = processor.name();
            match processor.process(exchange).await {
                Ok(outcome) => {
                    debug!(
                        processor = name,
                        exchange_id = %exchange.id(),
                        ?outcome,
                        "processor finished"
                    );
                    #[cfg(feature = "metrics")]
                    {
                        counter!(processor_metrics::EXECUTIONS_TOTAL, labels::PROCESSOR => name.to_string())
                            .increment(1);
                        if outcome == ProcessOutcome::GuardMismatch {
                            counter!(processor_metrics::GUARD_MISMATCHES_TOTAL, labels::PROCESSOR => name.to_string())
                                .increment(1);
                        }
                    }
                    outcomes.push(outcome);
                },
                Err(e) => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        processor = name,
                        exchange_id = %exchange.id(),
                        error = %e,
                        "processor failed"
                    );
                    #[cfg(feature = "metrics")]
                    counter!(processor_metrics::ERRORS_TOTAL, labels::PROCESSOR => name.to_string())
                        .increment(1);
                    return Err(match e {
                        e @ Error::Processor { .. } => e,
                        other => Error::processor(name, other),
                    });
                },
            }
        }

        Ok(outcomes)
    }
}

impl fmt::Debug for ProcessorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
