//! Event records consumed by the pattern engine.
//!
//! The engine never inspects concrete event types. Everything it needs goes
//! through the [`Record`] trait: a type tag, team and player references, a
//! timestamp, a success flag, an optional period and a named attribute lookup.
//! Vendor deserializers implement [`Record`] for their own structs; [`Event`]
//! is a ready-made implementation used by tests, benchmarks and callers that
//! build event streams by hand.
//!
//! # Ordering
//!
//! Records must be presented in chronological order. [`sort_events`] performs
//! an O(n) presorted check before falling back to a stable sort, so calling it
//! on already ordered data is cheap.

use std::collections::BTreeMap;
use std::fmt;

use crate::common::value::Value;

/// Attribute accessor interface for a single timestamped event.
///
/// Only [`event_type`](Record::event_type), [`team`](Record::team),
/// [`player`](Record::player), [`timestamp_us`](Record::timestamp_us) and
/// [`success`](Record::success) are required. [`lookup`](Record::lookup)
/// resolves the builtin attribute names first and then defers to
/// [`attribute`](Record::attribute) for anything vendor specific.
pub trait Record {
    /// Event type tag, e.g. `"pass"` or `"shot"`.
    fn event_type(&self) -> &str;

    /// Team reference, if the event is attributed to a team.
    fn team(&self) -> Option<&str>;

    /// Player reference, if the event is attributed to a player.
    fn player(&self) -> Option<&str>;

    /// Timestamp in microseconds. Non-decreasing along the input sequence.
    fn timestamp_us(&self) -> i64;

    /// Result indicator. `None` when the event type has no result.
    fn success(&self) -> Option<bool>;

    /// Match period (half). Patterns never match across periods when run
    /// through [`Query`](crate::query::Query).
    fn period(&self) -> Option<u32> {
        None
    }

    /// Vendor specific attribute lookup.
    fn attribute(&self, _name: &str) -> Option<Value<'_>> {
        None
    }

    /// Resolves a named attribute.
    ///
    /// Builtin names: `type`, `team`, `player`, `timestamp`, `success`,
    /// `period`. Other names go to [`attribute`](Record::attribute).
    fn lookup(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "type" => Some(Value::from(self.event_type())),
            "team" => self.team().map(Value::from),
            "player" => self.player().map(Value::from),
            "timestamp" => Some(Value::Int(self.timestamp_us())),
            "success" => self.success().map(Value::Bool),
            "period" => self.period().map(Value::from),
            _ => self.attribute(name),
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn event_type(&self) -> &str {
        (**self).event_type()
    }

    fn team(&self) -> Option<&str> {
        (**self).team()
    }

    fn player(&self) -> Option<&str> {
        (**self).player()
    }

    fn timestamp_us(&self) -> i64 {
        (**self).timestamp_us()
    }

    fn success(&self) -> Option<bool> {
        (**self).success()
    }

    fn period(&self) -> Option<u32> {
        (**self).period()
    }

    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        (**self).attribute(name)
    }

    fn lookup(&self, name: &str) -> Option<Value<'_>> {
        (**self).lookup(name)
    }
}

/// On-ball action type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pass attempt.
    Pass,
    /// A shot attempt.
    Shot,
    /// A carry (dribble without opponent).
    Carry,
    /// A take-on (dribble past an opponent).
    TakeOn,
    /// Any other vendor event type, kept verbatim.
    Other(String),
}

impl EventKind {
    /// Returns the type tag used by [`Record::event_type`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "pass",
            Self::Shot => "shot",
            Self::Carry => "carry",
            Self::TakeOn => "take_on",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete event record.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Action type.
    pub kind: EventKind,
    /// Team identifier.
    pub team: Option<String>,
    /// Player identifier.
    pub player: Option<String>,
    /// Timestamp in microseconds since the start of the period.
    pub timestamp_us: i64,
    /// Period (half) number, 1-based.
    pub period: u32,
    /// Result indicator.
    pub success: Option<bool>,
    /// Extra vendor attributes.
    pub attributes: BTreeMap<String, Value<'static>>,
}

impl Event {
    /// Creates an event of the given kind at `timestamp_us` in period 1.
    #[must_use]
    pub const fn new(kind: EventKind, timestamp_us: i64) -> Self {
        Self {
            kind,
            team: None,
            player: None,
            timestamp_us,
            period: 1,
            success: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the team.
    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Sets the player.
    #[must_use]
    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    /// Sets the period.
    #[must_use]
    pub const fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Sets the result indicator.
    #[must_use]
    pub const fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    /// Adds a vendor attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value<'_>) -> Self {
        self.attributes.insert(name.into(), value.into_owned());
        self
    }
}

impl Record for Event {
    fn event_type(&self) -> &str {
        self.kind.as_str()
    }

    fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    fn timestamp_us(&self) -> i64 {
        self.timestamp_us
    }

    fn success(&self) -> Option<bool> {
        self.success
    }

    fn period(&self) -> Option<u32> {
        Some(self.period)
    }

    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        self.attributes.get(name).map(Value::reborrow)
    }
}

/// Returns true if timestamps are non-decreasing.
pub fn is_chronological<E: Record>(events: &[E]) -> bool {
    events
        .windows(2)
        .all(|w| w[0].timestamp_us() <= w[1].timestamp_us())
}

/// Sorts events by timestamp (ascending).
///
/// Already ordered input is detected in O(n) and left untouched. Otherwise a
/// stable sort is used so events sharing a timestamp keep their vendor order,
/// which for event data encodes the actual sequence of play.
pub fn sort_events<E: Record>(events: &mut [E]) {
    if is_chronological(events) {
        return;
    }
    events.sort_by_key(|e| e.timestamp_us());
}
