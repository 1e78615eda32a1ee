//! Exchange formatters and the precedence policy that picks one per component.
//!
//! Resolution order (first match wins):
//! 1. Explicit formatter on the component configuration
//! 2. Registry binding under [`LOG_FORMATTER_BINDING`]
//! 3. None: callers fall back to the exchange's `Display` rendering

pub mod counting;
pub mod resolve;

pub use {
    counting::CountingFormatter,
    courier_common::LOG_FORMATTER_BINDING,
    resolve::{ComponentConfig, FormatterSource, ResolvedFormatter, resolve_formatter},
};
