//! Shared types used across all courier crates: the [`Exchange`] envelope and
//! its [`Payload`], the formatter and processor capability traits, the named
//! binding [`Registry`], and the common error type.

pub mod error;
pub mod exchange;
pub mod formatter;
pub mod payload;
pub mod processor;
pub mod registry;

pub use {
    error::{Error, Result},
    exchange::{Exchange, ExchangeId, ExchangePattern},
    formatter::ExchangeFormatter,
    payload::{FromPayload, Payload},
    processor::{ProcessOutcome, Processor},
    registry::{Binding, InMemoryRegistry, LOG_FORMATTER_BINDING, Registry},
};
