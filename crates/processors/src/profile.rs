//! Reference processors backed by a shared [`Profile`] collaborator.
//!
//! [`NameRecorder`] is input-only: a text body becomes the profile's name.
//! [`AgeIncrementer`] is input/output: an integer body is increased by one
//! and written to the output slot. Its guard ([`Age`]) excludes `i64::MAX`.

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use {
    async_trait::async_trait,
    courier_common::{Error, FromPayload, Payload, Result},
};

use crate::typed::{InOnly, InOut};

/// Mutable collaborator shared by many concurrent processor invocations.
#[derive(Debug, Default)]
pub struct Profile {
    name: RwLock<Option<String>>,
    increments: AtomicU64,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<String> {
        self.name.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write().unwrap_or_else(|e| e.into_inner()) = Some(name.into());
    }

    /// Returns `age + 1`.
    pub fn increase_age(&self, age: i64) -> Result<i64> {
        let next = age
            .checked_add(1)
            .ok_or_else(|| Error::invalid_argument(format!("age {age} cannot be increased")))?;
        self.increments.fetch_add(1, Ordering::AcqRel);
        Ok(next)
    }

    /// Number of successful [`Profile::increase_age`] calls.
    pub fn increments(&self) -> u64 {
        self.increments.load(Ordering::Acquire)
    }
}

/// Sets the profile name from a text body.
pub struct NameRecorder {
    profile: Arc<Profile>,
}

impl NameRecorder {
    pub fn new(profile: Arc<Profile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }
}

#[async_trait]
impl InOnly for NameRecorder {
    type Input = String;

    fn name(&self) -> &str {
        "name-recorder"
    }

    async fn accept(&self, input: String) -> Result<()> {
        self.profile.set_name(input);
        Ok(())
    }
}

/// An integer body that can still be incremented.
///
/// `i64::MAX` is rejected by the guard, so an accepted age always produces
/// an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(i64);

impl Age {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromPayload for Age {
    const TYPE_NAME: &'static str = "int below i64::MAX";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Int(i) if *i < i64::MAX => Some(Self(*i)),
            _ => None,
        }
    }
}

/// Writes `input + 1` to the output slot for an integer body.
pub struct AgeIncrementer {
    profile: Arc<Profile>,
}

impl AgeIncrementer {
    pub fn new(profile: Arc<Profile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }
}

#[async_trait]
impl InOut for AgeIncrementer {
    type Input = Age;
    type Output = i64;

    fn name(&self) -> &str {
        "age-incrementer"
    }

    async fn transform(&self, input: Age) -> Result<i64> {
        self.profile.increase_age(input.get())
    }
}
