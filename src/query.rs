// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Queries: a compiled pattern plus the event filtering around a search.
//!
//! A [`Query`] narrows a match's events to the types it cares about and
//! searches each period separately, so no match ever spans a half-time
//! break.
//!
//! ```
//! use event_patterns::pattern::predicate::kind;
//! use event_patterns::{Event, EventKind, Query};
//!
//! let events = [
//!     Event::new(EventKind::Pass, 0),
//!     Event::new(EventKind::Carry, 1),
//!     Event::new(EventKind::Shot, 2),
//!     Event::new(EventKind::Pass, 3).with_period(2),
//! ];
//! let predicates = [kind::<Event>("pass"), kind("shot")];
//! let query = Query::parse("(?1)(?2)", &predicates)
//!     .unwrap()
//!     .with_event_types(["pass", "shot"]);
//!
//! let found = query.run(&events);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].period, Some(1));
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::common::event::Record;
use crate::config::SearchConfig;
use crate::error::QueryError;
use crate::pattern::executor::MatchResult;
use crate::pattern::parser::parse_pattern;
use crate::pattern::predicate::Predicate;
use crate::pattern::program::CompiledPattern;
use crate::search::search_refs;

/// A match found by [`Query::run`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct QueryMatch<'a, E> {
    /// Period the match lies in.
    pub period: Option<u32>,
    /// The match. Indices refer to the period's filtered events, not the
    /// input slice.
    pub result: MatchResult<'a, E>,
}

/// A reusable search over event data.
#[derive(Debug, Clone)]
pub struct Query<E> {
    pattern: CompiledPattern<E>,
    event_types: Vec<String>,
    config: SearchConfig,
}

impl<E: Record> Query<E> {
    /// Creates a query over every event type with the default configuration.
    #[must_use]
    pub fn new(pattern: CompiledPattern<E>) -> Self {
        Self {
            pattern,
            event_types: Vec::new(),
            config: SearchConfig::default(),
        }
    }

    /// Parses and compiles a textual pattern (see
    /// [`parse_pattern`](crate::pattern::parser::parse_pattern)).
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the string is malformed or the pattern it
    /// describes cannot be compiled.
    pub fn parse(input: &str, predicates: &[Predicate<E>]) -> Result<Self, QueryError>
    where
        E: 'static,
    {
        let pattern = parse_pattern(input, predicates)?;
        Ok(Self::new(CompiledPattern::compile(pattern)?))
    }

    /// Restricts the search to events whose type is in `event_types`. An
    /// empty list keeps every event.
    #[must_use]
    pub fn with_event_types<I, S>(mut self, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types = event_types.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the search configuration.
    #[must_use]
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// The compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &CompiledPattern<E> {
        &self.pattern
    }

    /// Event types kept by the filter. Empty means all.
    #[must_use]
    pub fn event_types(&self) -> &[String] {
        &self.event_types
    }

    fn keeps(&self, event: &E) -> bool {
        self.event_types.is_empty()
            || self
                .event_types
                .iter()
                .any(|t| t.as_str() == event.event_type())
    }

    /// Runs the query.
    ///
    /// Events are filtered by type, grouped by [`Record::period`] and each
    /// group is searched on its own. Results are ordered by period id (events
    /// without a period first), then by start index.
    pub fn run<'a>(&self, events: &'a [E]) -> Vec<QueryMatch<'a, E>> {
        let mut periods: BTreeMap<Option<u32>, Vec<&'a E>> = BTreeMap::new();
        for event in events.iter().filter(|e| self.keeps(e)) {
            periods.entry(event.period()).or_default().push(event);
        }

        let mut found = Vec::new();
        for (period, view) in &periods {
            found.extend(
                search_refs(view, &self.pattern, &self.config)
                    .into_iter()
                    .map(|result| QueryMatch {
                        period: *period,
                        result,
                    }),
            );
        }

        debug!(
            events = events.len(),
            periods = periods.len(),
            matches = found.len(),
            "query complete"
        );
        found
    }
}
