//! Statically typed transforms and the adapters that guard them.

use {
    async_trait::async_trait,
    courier_common::{Exchange, FromPayload, Payload, ProcessOutcome, Processor, Result},
    tracing::debug,
};

/// A transform that consumes the input payload and updates some collaborator.
/// It never produces an output.
#[async_trait]
pub trait InOnly: Send + Sync {
    /// The exact payload type accepted.
    type Input: FromPayload + Send;

    fn name(&self) -> &str;

    async fn accept(&self, input: Self::Input) -> Result<()>;
}

/// A transform that derives an output from the input payload.
#[async_trait]
pub trait InOut: Send + Sync {
    /// The exact payload type accepted.
    type Input: FromPayload + Send;
    type Output: Into<Payload> + Send;

    fn name(&self) -> &str;

    async fn transform(&self, input: Self::Input) -> Result<Self::Output>;
}

fn guard_mismatch(processor: &str, expected: &str, exchange: &Exchange) -> ProcessOutcome {
    debug!(
        processor,
        expected,
        actual = exchange.input().type_name(),
        exchange_id = %exchange.id(),
        "input does not match processor guard, skipping"
    );
    ProcessOutcome::GuardMismatch
}

/// Runs an [`InOnly`] transform when the input matches its type. The output
/// slot is never written.
pub struct InOnlyProcessor<T> {
    inner: T,
}

impl<T: InOnly> InOnlyProcessor<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: InOnly> Processor for InOnlyProcessor<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<ProcessOutcome> {
        let Some(input) = exchange.input_as::<T::Input>() else {
            return Ok(guard_mismatch(
                self.name(),
                <T::Input as FromPayload>::TYPE_NAME,
                exchange,
            ));
        };
        self.inner.accept(input).await?;
        Ok(ProcessOutcome::Applied)
    }
}

/// Runs an [`InOut`] transform when the input matches its type and writes the
/// result to the output slot. On mismatch or error both slots are untouched.
pub struct InOutProcessor<T> {
    inner: T,
}

impl<T: InOut> InOutProcessor<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: InOut> Processor for InOutProcessor<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<ProcessOutcome> {
        let Some(input) = exchange.input_as::<T::Input>() else {
            return Ok(guard_mismatch(
                self.name(),
                <T::Input as FromPayload>::TYPE_NAME,
                exchange,
            ));
        };
        let output = self.inner.transform(input).await?;
        exchange.set_output(output);
        Ok(ProcessOutcome::Applied)
    }
}
