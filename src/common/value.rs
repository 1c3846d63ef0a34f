// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Typed attribute values exposed by event records.
//!
//! Predicates compare attributes of the candidate event against constants or
//! against attributes of previously captured events. Values borrow text from
//! the record where possible (`Cow::Borrowed`) so attribute lookup on the hot
//! matching path does not allocate.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// A single attribute value read from an event record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Boolean flag (e.g. `success`).
    Bool(bool),
    /// Signed integer (e.g. `period`, `timestamp` in microseconds).
    Int(i64),
    /// Floating point number (e.g. coordinates, xG).
    Float(f64),
    /// Text (e.g. team or player identifiers).
    Text(Cow<'a, str>),
}

impl Value<'_> {
    /// Converts into a value that owns its text.
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i),
            Value::Float(f) => Value::Float(f),
            Value::Text(s) => Value::Text(Cow::Owned(s.into_owned())),
        }
    }

    /// Borrows this value without cloning owned text.
    #[must_use]
    pub fn reborrow(&self) -> Value<'_> {
        match self {
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::Float(f) => Value::Float(*f),
            Value::Text(s) => Value::Text(Cow::Borrowed(s.as_ref())),
        }
    }

    /// Compares two values, allowing `Int`/`Float` cross comparison.
    ///
    /// Returns `None` for values of unrelated types and for NaN.
    #[must_use]
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.as_ref().cmp(b.as_ref())),
            _ => None,
        }
    }

    /// Loose equality: numeric values compare across `Int`/`Float`, values
    /// of unrelated types are never equal.
    #[must_use]
    pub fn loosely_equals(&self, other: &Value<'_>) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value<'_> {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value<'_> {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}
