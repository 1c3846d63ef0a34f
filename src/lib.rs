//! # `event_patterns`: regular-expression-style search over event streams
//!
//! Finds recurring tactical patterns in chronologically ordered sequences of
//! typed events (passes, shots, carries, take-ons and anything else a vendor
//! feed provides). Patterns are built from predicates over single events and
//! combined with sequence, repetition, alternation and capture groups.
//! Predicates may refer back to events captured earlier in the same match,
//! e.g. "a shot by the same team as the pass that started the move".
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`common`] | `Record` event interface, `Event`, attribute `Value`s, timestamp helpers |
//! | [`pattern`] | Pattern tree, predicates, bindings, compilation, matching engine, textual syntax |
//! | [`search`] | Leftmost, non-overlapping search over a slice of events |
//! | [`query`] | Event type filtering and per-period search |
//! | [`config`] | `SearchConfig`, loadable from TOML |
//! | [`error`] | Error types |
//!
//! ## Example
//!
//! ```
//! use event_patterns::pattern::predicate::{kind, same_as, success};
//! use event_patterns::{search, CompiledPattern, Event, EventKind, Pattern};
//!
//! let events = [
//!     Event::new(EventKind::Pass, 0).with_team("home").with_success(true),
//!     Event::new(EventKind::Pass, 1_000_000).with_team("home"),
//!     Event::new(EventKind::Shot, 2_500_000).with_team("home"),
//! ];
//!
//! let same_team = |tag: &str| Pattern::literal(kind::<Event>(tag).and(same_as("p1", "team")));
//! let pattern = Pattern::capture("p1", kind::<Event>("pass").and(success()))
//!     .then(same_team("pass").one_or_more().unwrap())
//!     .then(same_team("shot"));
//! let compiled = CompiledPattern::compile(pattern).unwrap();
//!
//! let matches = search(&events, &compiled);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].span(), 0..3);
//! assert_eq!(matches[0].capture("p1").unwrap().start, 0);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber:
//! compilation and search summaries at `debug`, step budget exhaustion and
//! unordered input at `warn`, predicates that could not be evaluated at
//! `trace`.

pub mod common;
pub mod config;
pub mod error;
pub mod pattern;
pub mod query;
pub mod search;

pub use common::event::{sort_events, Event, EventKind, Record};
pub use common::value::Value;
pub use config::SearchConfig;
pub use error::{ConfigError, MalformedPatternError, ParseError, PredicateError, QueryError};
pub use pattern::ast::Pattern;
pub use pattern::bindings::Bindings;
pub use pattern::executor::{Capture, MatchResult};
pub use pattern::parser::parse_pattern;
pub use pattern::predicate::{CmpOp, Predicate};
pub use pattern::program::CompiledPattern;
pub use query::{Query, QueryMatch};
pub use search::{match_at, search, search_with};
