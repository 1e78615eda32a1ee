use crate::{Result, exchange::Exchange};

/// Renders an exchange to a display string for log output.
///
/// Implementations must not mutate the exchange. Calls arrive concurrently
/// from many dispatch tasks, so any internal state (such as an invocation
/// counter) must be synchronized.
pub trait ExchangeFormatter: Send + Sync {
    /// A human-readable name for this formatter.
    fn name(&self) -> &str;

    /// Render `exchange`.
    ///
    /// Report failures by returning `Err`; the dispatcher logs and counts them
    /// and delivery continues. A panic is not caught: it unwinds through
    /// `dispatch` (or aborts the process under `panic = "abort"`) and the
    /// exchange is not delivered.
    fn format(&self, exchange: &Exchange) -> Result<String>;
}
