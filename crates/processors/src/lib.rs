//! Processors that read and rewrite an exchange's payload.
//!
//! Concrete transforms implement [`InOnly`] or [`InOut`] and declare the exact
//! input type they accept. The [`InOnlyProcessor`] and [`InOutProcessor`]
//! adapters perform the type check once and turn a mismatch into
//! [`ProcessOutcome::GuardMismatch`](courier_common::ProcessOutcome).

pub mod chain;
pub mod profile;
pub mod typed;

pub use {
    chain::ProcessorChain,
    profile::{Age, AgeIncrementer, NameRecorder, Profile},
    typed::{InOnly, InOnlyProcessor, InOut, InOutProcessor},
};
