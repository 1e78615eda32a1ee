//! The in-flight message envelope.

use std::{collections::BTreeMap, fmt};

use {
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

use crate::payload::{FromPayload, Payload};

/// Opaque exchange identity, stable for the exchange's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID-{}", self.0)
    }
}

/// Message exchange pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangePattern {
    /// One-way: the sender does not expect a reply.
    #[default]
    InOnly,
    /// Request/reply: the output slot carries the reply.
    InOut,
}

impl fmt::Display for ExchangePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Envelope carrying a message's input and output payloads.
///
/// The output slot is `None` until a processor sets it, so an unset output is
/// distinguishable from an output that holds an empty or null payload.
#[derive(Debug, Clone)]
pub struct Exchange {
    id: ExchangeId,
    pattern: ExchangePattern,
    input: Payload,
    output: Option<Payload>,
    headers: BTreeMap<String, String>,
}

impl Exchange {
    pub fn new(input: impl Into<Payload>) -> Self {
        Self {
            id: ExchangeId::new(),
            pattern: ExchangePattern::default(),
            input: input.into(),
            output: None,
            headers: BTreeMap::new(),
        }
    }

    /// Request/reply exchange.
    pub fn in_out(input: impl Into<Payload>) -> Self {
        Self::new(input).with_pattern(ExchangePattern::InOut)
    }

    pub fn with_pattern(mut self, pattern: ExchangePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn id(&self) -> ExchangeId {
        self.id
    }

    pub fn pattern(&self) -> ExchangePattern {
        self.pattern
    }

    pub fn input(&self) -> &Payload {
        &self.input
    }

    /// Typed view of the input payload; `None` on a type mismatch.
    pub fn input_as<T: FromPayload>(&self) -> Option<T> {
        T::from_payload(&self.input)
    }

    pub fn set_input(&mut self, input: impl Into<Payload>) {
        self.input = input.into();
    }

    pub fn output(&self) -> Option<&Payload> {
        self.output.as_ref()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn set_output(&mut self, output: impl Into<Payload>) {
        self.output = Some(output.into());
    }

    /// Remove and return the output payload, leaving the slot unset.
    pub fn take_output(&mut self) -> Option<Payload> {
        self.output.take()
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exchange[Id: {}, ExchangePattern: {}, Body: {}",
            self.id, self.pattern, self.input
        )?;
        if !self.headers.is_empty() {
            f.write_str(", Headers: {")?;
            for (i, (name, value)) in self.headers.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}={value}")?;
            }
            f.write_str("}")?;
        }
        if let Some(out) = &self.output {
            write!(f, ", Out: {out}")?;
        }
        f.write_str("]")
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_plain_uuid() {
        let id = ExchangeId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.0.to_string()));
        let back: ExchangeId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn output_starts_unset() {
        let ex = Exchange::new("Hello World");
        assert!(ex.output().is_none());
        assert!(!ex.has_output());
    }

    #[test]
    fn unset_output_differs_from_empty_output() {
        let mut ex = Exchange::new("x");
        ex.set_output("");
        assert_eq!(ex.output(), Some(&Payload::Text(String::new())));

        let mut other = Exchange::new("x");
        other.set_output(Payload::Null);
        assert_eq!(other.output(), Some(&Payload::Null));

        let unset = Exchange::new("x");
        assert_ne!(ex.output(), unset.output());
        assert_ne!(other.output(), unset.output());
    }

    #[test]
    fn take_output_clears_slot() {
        let mut ex = Exchange::in_out(5);
        ex.set_output(6);
        assert_eq!(ex.take_output(), Some(Payload::Int(6)));
        assert!(ex.output().is_none());
    }

    #[test]
    fn identity_is_stable_and_unique() {
        let mut ex = Exchange::new(1);
        let id = ex.id();
        ex.set_input(2);
        ex.set_output(3);
        assert_eq!(ex.id(), id);
        assert_ne!(Exchange::new(1).id(), id);
    }

    #[test]
    fn display_includes_body_and_headers() {
        let ex = Exchange::new("Hello World").with_header("source", "test");
        let rendered = ex.to_string();
        assert!(rendered.starts_with("Exchange[Id: ID-"));
        assert!(rendered.contains("ExchangePattern: InOnly"));
        assert!(rendered.contains("Body: Hello World"));
        assert!(rendered.contains("Headers: {source=test}"));
        assert!(!rendered.contains("Out:"));
    }

    #[test]
    fn typed_input_access() {
        let ex = Exchange::new(5);
        assert_eq!(ex.input_as::<i64>(), Some(5));
        assert_eq!(ex.input_as::<String>(), None);
    }
}
