use async_trait::async_trait;

use crate::{Result, exchange::Exchange};

/// What a single processor invocation did to the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The input matched the processor's type guard and the transform ran.
    Applied,
    /// The input did not match; nothing was read past the guard and nothing
    /// was written. Not an error.
    GuardMismatch,
}

impl ProcessOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Reads an exchange's input and optionally writes its output.
#[async_trait]
pub trait Processor: Send + Sync {
    /// A human-readable name for this processor.
    fn name(&self) -> &str;

    async fn process(&self, exchange: &mut Exchange) -> Result<ProcessOutcome>;
}
