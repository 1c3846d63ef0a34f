// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Predicates over a candidate event and the current bindings.
//!
//! A [`Predicate`] is a pure, shareable closure. It returns
//! `Ok(true)`/`Ok(false)` when it can decide, and a [`PredicateError`] when
//! it cannot (unbound capture, missing attribute, incomparable values). The
//! engine treats an error exactly like `Ok(false)`: the current branch fails
//! and matching backtracks.
//!
//! # Capture references
//!
//! Predicates such as [`same_as`] and [`elapsed_since`] resolve a capture by
//! name to the first event of its most recent binding (see
//! [`Bindings::get`]).

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::common::event::Record;
use crate::common::timestamp::{duration_to_micros, elapsed_micros};
use crate::common::value::Value;
use crate::error::PredicateError;
use crate::pattern::bindings::Bindings;

/// Comparison operator for attribute and elapsed-time predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CmpOp {
    /// Evaluates `lhs <op> rhs`.
    #[must_use]
    pub const fn evaluate(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Gte => lhs >= rhs,
            Self::Lte => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Lt => lhs < rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }

    /// Evaluates the operator against the ordering of `lhs` relative to `rhs`.
    #[must_use]
    pub const fn holds_for(self, ordering: Ordering) -> bool {
        match self {
            Self::Gte => !matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
        }
    }

    /// Operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

type PredicateFn<E> =
    dyn Fn(&E, &Bindings<'_, E>) -> Result<bool, PredicateError> + Send + Sync;

/// A test applied to one candidate event.
pub struct Predicate<E> {
    label: Arc<str>,
    test: Arc<PredicateFn<E>>,
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            test: Arc::clone(&self.test),
        }
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl<E: 'static> Predicate<E> {
    /// Wraps an arbitrary test.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&E, &Bindings<'_, E>) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self::labeled("fn", test)
    }

    /// Wraps an arbitrary test with a label shown in `Debug` output.
    pub fn labeled<F>(label: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&E, &Bindings<'_, E>) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Both predicates hold. `other` is not evaluated when `self` is false.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let label = format!("({} & {})", self.label, other.label);
        Self::labeled(label, move |event, bindings| {
            Ok(self.evaluate(event, bindings)? && other.evaluate(event, bindings)?)
        })
    }

    /// Either predicate holds. `other` is not evaluated when `self` is true.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let label = format!("({} | {})", self.label, other.label);
        Self::labeled(label, move |event, bindings| {
            Ok(self.evaluate(event, bindings)? || other.evaluate(event, bindings)?)
        })
    }

    /// Negation. An evaluation error stays an error, so the negation of an
    /// unresolvable predicate is still treated as false.
    #[must_use]
    pub fn not(self) -> Self {
        let label = format!("!{}", self.label);
        Self::labeled(label, move |event, bindings| {
            Ok(!self.evaluate(event, bindings)?)
        })
    }
}

impl<E> Predicate<E> {
    /// Evaluates the predicate.
    pub fn evaluate(&self, event: &E, bindings: &Bindings<'_, E>) -> Result<bool, PredicateError> {
        (self.test)(event, bindings)
    }

    /// Label shown in `Debug` output.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

fn missing(name: &str) -> PredicateError {
    PredicateError::MissingAttribute(name.to_string())
}

fn unbound(name: &str) -> PredicateError {
    PredicateError::UnboundCapture(name.to_string())
}

/// Matches every event.
pub fn any<E: 'static>() -> Predicate<E> {
    Predicate::labeled("any", |_, _| Ok(true))
}

/// Matches events whose type tag equals `event_type`.
pub fn kind<E: Record + 'static>(event_type: &str) -> Predicate<E> {
    let tag: Arc<str> = Arc::from(event_type);
    let label = format!("kind({tag})");
    Predicate::labeled(label, move |event: &E, _| Ok(event.event_type() == &*tag))
}

/// Matches events with a successful result. Events without a result
/// indicator do not match.
pub fn success<E: Record + 'static>() -> Predicate<E> {
    Predicate::labeled("success", |event: &E, _| Ok(event.success() == Some(true)))
}

/// Matches events whose attribute `name` loosely equals `value`.
pub fn attr_eq<E: Record + 'static>(name: &str, value: impl Into<Value<'static>>) -> Predicate<E> {
    attr_cmp(name, CmpOp::Eq, value)
}

/// Matches events whose attribute `name` compares to `value` with `op`.
pub fn attr_cmp<E: Record + 'static>(
    name: &str,
    op: CmpOp,
    value: impl Into<Value<'static>>,
) -> Predicate<E> {
    let name: Arc<str> = Arc::from(name);
    let value: Value<'static> = value.into();
    let label = format!("{name} {} {value}", op.symbol());
    Predicate::labeled(label, move |event: &E, _| {
        let actual = event.lookup(&name).ok_or_else(|| missing(&name))?;
        let ordering = actual
            .compare(&value)
            .ok_or_else(|| PredicateError::Incomparable(name.to_string()))?;
        Ok(op.holds_for(ordering))
    })
}

/// Matches events whose `attribute` equals the same attribute of the event
/// captured as `capture`.
pub fn same_as<E: Record + 'static>(capture: &str, attribute: &str) -> Predicate<E> {
    capture_cmp(capture, attribute, true)
}

/// Matches events whose `attribute` differs from the same attribute of the
/// event captured as `capture`.
pub fn not_same_as<E: Record + 'static>(capture: &str, attribute: &str) -> Predicate<E> {
    capture_cmp(capture, attribute, false)
}

fn capture_cmp<E: Record + 'static>(capture: &str, attribute: &str, equal: bool) -> Predicate<E> {
    let capture: Arc<str> = Arc::from(capture);
    let attribute: Arc<str> = Arc::from(attribute);
    let name = if equal { "same_as" } else { "not_same_as" };
    let label = format!("{attribute} {name}({capture}.{attribute})");
    Predicate::labeled(label, move |event: &E, bindings: &Bindings<'_, E>| {
        let captured = bindings.get(&capture).ok_or_else(|| unbound(&capture))?;
        let theirs = captured.lookup(&attribute).ok_or_else(|| missing(&attribute))?;
        let ours = event.lookup(&attribute).ok_or_else(|| missing(&attribute))?;
        Ok(ours.loosely_equals(&theirs) == equal)
    })
}

/// Compares the time elapsed since the event captured as `capture` against
/// `threshold` with `op`, e.g. `elapsed_since("recover", CmpOp::Lt, 5s)`.
pub fn elapsed_since<E: Record + 'static>(
    capture: &str,
    op: CmpOp,
    threshold: Duration,
) -> Predicate<E> {
    let capture: Arc<str> = Arc::from(capture);
    let threshold_us = duration_to_micros(threshold);
    let label = format!("elapsed_since({capture}) {} {threshold:?}", op.symbol());
    Predicate::labeled(label, move |event: &E, bindings: &Bindings<'_, E>| {
        let captured = bindings.get(&capture).ok_or_else(|| unbound(&capture))?;
        let elapsed = elapsed_micros(captured.timestamp_us(), event.timestamp_us());
        Ok(op.evaluate(elapsed, threshold_us))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::event::{Event, EventKind};

    fn pass(team: &str, ts: i64) -> Event {
        Event::new(EventKind::Pass, ts).with_team(team)
    }

    fn shot(team: &str, ts: i64) -> Event {
        Event::new(EventKind::Shot, ts).with_team(team)
    }

    #[test]
    fn test_cmp_op_evaluate() {
        assert!(CmpOp::Gte.evaluate(10, 10));
        assert!(!CmpOp::Gte.evaluate(9, 10));
        assert!(CmpOp::Lte.evaluate(10, 10));
        assert!(!CmpOp::Lte.evaluate(11, 10));
        assert!(CmpOp::Gt.evaluate(11, 10));
        assert!(!CmpOp::Gt.evaluate(10, 10));
        assert!(CmpOp::Lt.evaluate(9, 10));
        assert!(!CmpOp::Lt.evaluate(10, 10));
        assert!(CmpOp::Eq.evaluate(10, 10));
        assert!(!CmpOp::Eq.evaluate(11, 10));
        assert!(CmpOp::Ne.evaluate(11, 10));
        assert!(!CmpOp::Ne.evaluate(10, 10));
    }

    #[test]
    fn test_cmp_op_holds_for_matches_evaluate() {
        let ops = [CmpOp::Gte, CmpOp::Lte, CmpOp::Gt, CmpOp::Lt, CmpOp::Eq, CmpOp::Ne];
        for op in ops {
            for (lhs, rhs) in [(1, 2), (2, 2), (3, 2)] {
                assert_eq!(
                    op.holds_for(i64::cmp(&lhs, &rhs)),
                    op.evaluate(lhs, rhs),
                    "{} on ({lhs}, {rhs})",
                    op.symbol()
                );
            }
        }
    }

    #[test]
    fn test_kind_and_success() {
        let events = [pass("a", 0).with_success(true), shot("a", 1), pass("a", 2)];
        let refs: Vec<&Event> = events.iter().collect();
        let b = Bindings::new(&refs);
        let p = kind::<Event>("pass").and(success());
        assert_eq!(p.evaluate(&events[0], &b), Ok(true));
        assert_eq!(p.evaluate(&events[1], &b), Ok(false));
        // No result indicator means not successful.
        assert_eq!(p.evaluate(&events[2], &b), Ok(false));
    }

    #[test]
    fn test_attr_eq_and_missing() {
        let e = pass("a", 0).with_attribute("height", Value::from("high"));
        let refs = [&e];
        let b = Bindings::new(&refs);
        assert_eq!(attr_eq::<Event>("height", "high").evaluate(&e, &b), Ok(true));
        assert_eq!(attr_eq::<Event>("height", "ground").evaluate(&e, &b), Ok(false));
        assert_eq!(
            attr_eq::<Event>("body_part", "head").evaluate(&e, &b),
            Err(PredicateError::MissingAttribute("body_part".into()))
        );
    }

    #[test]
    fn test_attr_cmp_numeric_and_incomparable() {
        let e = pass("a", 0).with_attribute("length", Value::Float(31.5));
        let refs = [&e];
        let b = Bindings::new(&refs);
        assert_eq!(attr_cmp::<Event>("length", CmpOp::Gt, 30_i64).evaluate(&e, &b), Ok(true));
        assert_eq!(attr_cmp::<Event>("length", CmpOp::Lt, 30.0).evaluate(&e, &b), Ok(false));
        assert_eq!(
            attr_cmp::<Event>("length", CmpOp::Eq, "long").evaluate(&e, &b),
            Err(PredicateError::Incomparable("length".into()))
        );
    }

    #[test]
    fn test_same_as_resolves_capture() {
        let events = [pass("a", 0), pass("a", 1), shot("b", 2)];
        let refs: Vec<&Event> = events.iter().collect();
        let mut b = Bindings::new(&refs);
        b.bind("p1", 0..1);
        let same = same_as::<Event>("p1", "team");
        let differs = not_same_as::<Event>("p1", "team");
        assert_eq!(same.evaluate(&events[1], &b), Ok(true));
        assert_eq!(same.evaluate(&events[2], &b), Ok(false));
        assert_eq!(differs.evaluate(&events[2], &b), Ok(true));
        assert_eq!(differs.evaluate(&events[1], &b), Ok(false));
    }

    #[test]
    fn test_unbound_capture_is_error_for_both_polarities() {
        let e = pass("a", 0);
        let refs = [&e];
        let b = Bindings::new(&refs);
        let err = Err(PredicateError::UnboundCapture("p1".into()));
        assert_eq!(same_as::<Event>("p1", "team").evaluate(&e, &b), err);
        assert_eq!(not_same_as::<Event>("p1", "team").evaluate(&e, &b), err);
        assert_eq!(same_as::<Event>("p1", "team").not().evaluate(&e, &b), err);
    }

    #[test]
    fn test_same_as_missing_attribute_on_capture() {
        let events = [Event::new(EventKind::Carry, 0), pass("a", 1)];
        let refs: Vec<&Event> = events.iter().collect();
        let mut b = Bindings::new(&refs);
        b.bind("c", 0..1);
        assert_eq!(
            same_as::<Event>("c", "team").evaluate(&events[1], &b),
            Err(PredicateError::MissingAttribute("team".into()))
        );
    }

    #[test]
    fn test_elapsed_since() {
        let events = [pass("a", 0), pass("a", 4_000_000), pass("a", 16_000_000)];
        let refs: Vec<&Event> = events.iter().collect();
        let mut b = Bindings::new(&refs);
        b.bind("recover", 0..1);
        let within = elapsed_since::<Event>("recover", CmpOp::Lt, Duration::from_secs(5));
        let after = elapsed_since::<Event>("recover", CmpOp::Gt, Duration::from_secs(15));
        assert_eq!(within.evaluate(&events[1], &b), Ok(true));
        assert_eq!(within.evaluate(&events[2], &b), Ok(false));
        assert_eq!(after.evaluate(&events[2], &b), Ok(true));
    }

    #[test]
    fn test_and_short_circuits_errors() {
        let e = shot("a", 0);
        let refs = [&e];
        let b = Bindings::new(&refs);
        // kind fails first, so the unbound reference is never evaluated.
        let p = kind::<Event>("pass").and(same_as("p1", "team"));
        assert_eq!(p.evaluate(&e, &b), Ok(false));
        let q = kind::<Event>("shot").or(same_as("p1", "team"));
        assert_eq!(q.evaluate(&e, &b), Ok(true));
    }

    #[test]
    fn test_custom_predicate() {
        let e = pass("a", 0).with_player("p7");
        let refs = [&e];
        let b = Bindings::new(&refs);
        let p = Predicate::<Event>::new(|ev, _| Ok(ev.player == Some("p7".to_string())));
        assert_eq!(p.evaluate(&e, &b), Ok(true));
        assert_eq!(p.label(), "fn");
    }

    #[test]
    fn test_labels() {
        let p = kind::<Event>("pass").and(same_as("p1", "team")).not();
        assert_eq!(p.label(), "!(kind(pass) & team same_as(p1.team))");
        assert_eq!(format!("{:?}", any::<Event>()), "any");
    }
}
