// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Search driver: every non-overlapping match of a pattern in a sequence.
//!
//! Scanning starts at index 0. A match `[start, end)` is recorded and the
//! scan resumes at `end`; a failed attempt moves the start forward by one.
//! This is the leftmost, non-overlapping behaviour of a classic regex
//! `find_iter`. Every compiled pattern consumes at least one event, so the
//! scan always makes progress and terminates.
//!
//! `search` is total: predicate errors only fail the branch they occur on.
//! With the default configuration every attempt runs to completion, so the
//! result depends only on the events and the pattern. A caller that sets
//! [`SearchConfig::max_steps_per_attempt`] trades that for bounded time: an
//! attempt that runs out of steps is reported as no match at that start
//! index.

use tracing::{debug, warn};

use crate::common::event::{is_chronological, Record};
use crate::config::SearchConfig;
use crate::pattern::bindings::Bindings;
use crate::pattern::executor::{Attempt, Executor, MatchResult};
use crate::pattern::program::CompiledPattern;

/// Finds all matches of `pattern` in `events` with the default
/// [`SearchConfig`].
///
/// Results are in strictly increasing start order and never overlap.
/// `events` should be in chronological order (see
/// [`sort_events`](crate::common::event::sort_events)); unordered input is
/// searched as given and logged at `warn`.
///
/// # Examples
///
/// ```
/// use event_patterns::pattern::predicate::kind;
/// use event_patterns::{search, CompiledPattern, Event, EventKind, Pattern};
///
/// let events = [
///     Event::new(EventKind::Pass, 0),
///     Event::new(EventKind::Pass, 1),
///     Event::new(EventKind::Pass, 2),
/// ];
/// let pattern = Pattern::literal(kind::<Event>("pass")).between(1, 2).unwrap();
/// let compiled = CompiledPattern::compile(pattern).unwrap();
///
/// let spans: Vec<_> = search(&events, &compiled).iter().map(|m| m.span()).collect();
/// assert_eq!(spans, vec![0..2, 2..3]);
/// ```
pub fn search<'a, E: Record>(
    events: &'a [E],
    pattern: &CompiledPattern<E>,
) -> Vec<MatchResult<'a, E>> {
    search_with(events, pattern, &SearchConfig::default())
}

/// Like [`search`], with explicit configuration.
pub fn search_with<'a, E: Record>(
    events: &'a [E],
    pattern: &CompiledPattern<E>,
    config: &SearchConfig,
) -> Vec<MatchResult<'a, E>> {
    let refs: Vec<&'a E> = events.iter().collect();
    search_refs(&refs, pattern, config)
}

/// Attempts a single match of `pattern` starting exactly at `start`.
///
/// Returns `None` if no match begins there, if `start` is past the end, or
/// if the attempt exhausted a configured step budget.
pub fn match_at<'a, E: Record>(
    events: &'a [E],
    pattern: &CompiledPattern<E>,
    start: usize,
    config: &SearchConfig,
) -> Option<MatchResult<'a, E>> {
    let refs: Vec<&'a E> = events.iter().collect();
    let mut executor = Executor::new(pattern, &refs, config.max_steps_per_attempt);
    match executor.attempt(start) {
        Attempt::Matched(end) => Some(MatchResult::from_bindings(
            &refs,
            start..end,
            executor.bindings(),
        )),
        Attempt::Failed => None,
        Attempt::Exhausted => {
            warn!(
                start,
                max_steps = ?config.max_steps_per_attempt,
                "match attempt exceeded its step budget"
            );
            None
        }
    }
}

/// Search over a borrowed view, so filtered subsets need no copies.
pub(crate) fn search_refs<'a, E: Record>(
    refs: &[&'a E],
    pattern: &CompiledPattern<E>,
    config: &SearchConfig,
) -> Vec<MatchResult<'a, E>> {
    if !is_chronological(refs) {
        warn!(
            events = refs.len(),
            "events are not in chronological order; searching in input order"
        );
    }

    let mut executor = Executor::new(pattern, refs, config.max_steps_per_attempt);
    let leading = if config.prefilter {
        pattern.leading_literal()
    } else {
        None
    };
    // The leading literal always runs before anything is bound.
    let unbound = Bindings::new(refs);

    let mut matches = Vec::new();
    let mut exhausted = 0usize;
    let mut start = 0;
    while start < refs.len() {
        if let Some(first) = leading {
            if !matches!(first.evaluate(refs[start], &unbound), Ok(true)) {
                start += 1;
                continue;
            }
        }

        match executor.attempt(start) {
            Attempt::Matched(end) => {
                debug_assert!(end > start, "compiled patterns never match empty");
                matches.push(MatchResult::from_bindings(
                    refs,
                    start..end,
                    executor.bindings(),
                ));
                start = end;
            }
            Attempt::Failed => start += 1,
            Attempt::Exhausted => {
                warn!(
                    start,
                    max_steps = ?config.max_steps_per_attempt,
                    "match attempt exceeded its step budget; treated as no match"
                );
                exhausted += 1;
                start += 1;
            }
        }
    }

    debug!(
        events = refs.len(),
        matches = matches.len(),
        exhausted,
        "search complete"
    );
    matches
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::common::event::{Event, EventKind};
    use crate::pattern::ast::Pattern;
    use crate::pattern::predicate::{any, kind, same_as};
    use proptest::prelude::*;

    const TAGS: [&str; 3] = ["pass", "shot", "carry"];

    fn events_from(spec: &[(u8, u8)]) -> Vec<Event> {
        spec.iter()
            .zip(0i64..)
            .map(|(&(k, team), ts)| {
                let kind = match k {
                    0 => EventKind::Pass,
                    1 => EventKind::Shot,
                    _ => EventKind::Carry,
                };
                Event::new(kind, ts).with_team(if team == 0 { "A" } else { "B" })
            })
            .collect()
    }

    fn lit(tag: &str) -> Pattern<Event> {
        Pattern::literal(kind(tag))
    }

    fn pattern_by_index(i: usize) -> CompiledPattern<Event> {
        let p = match i {
            0 => lit("pass"),
            1 => lit("pass").then(lit("shot")),
            2 => lit("pass").between(1, 2).unwrap(),
            3 => lit("pass").one_or_more().unwrap().then(lit("shot")),
            4 => lit("pass").or(lit("carry")).then(lit("shot")),
            5 => Pattern::sequence([
                lit("pass").named("p1"),
                Pattern::literal(kind::<Event>("pass").and(same_as("p1", "team")))
                    .zero_or_more()
                    .unwrap(),
                Pattern::literal(kind::<Event>("shot").and(same_as("p1", "team"))),
            ]),
            6 => Pattern::group("g", lit("pass").or(lit("carry")).between(1, 3).unwrap())
                .then(Pattern::literal(any())),
            _ => Pattern::literal(any())
                .then(Pattern::optional(lit("pass")).unwrap())
                .then(lit("shot").or(lit("carry"))),
        };
        CompiledPattern::compile(p).unwrap()
    }

    fn arb_events() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..3, 0u8..2), 0..40)
    }

    proptest! {
        #[test]
        fn matches_ordered_and_disjoint(spec in arb_events(), which in 0usize..8) {
            let events = events_from(&spec);
            let pattern = pattern_by_index(which);
            let matches = search(&events, &pattern);
            for m in &matches {
                prop_assert!(m.start < m.end);
                prop_assert!(m.end <= events.len());
            }
            for pair in matches.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
                prop_assert!(pair[0].start < pair[1].start);
            }
        }

        #[test]
        fn matched_events_are_contiguous_input(spec in arb_events(), which in 0usize..8) {
            let events = events_from(&spec);
            let pattern = pattern_by_index(which);
            for m in search(&events, &pattern) {
                prop_assert_eq!(m.events.len(), m.len());
                for (offset, event) in m.events.iter().enumerate() {
                    prop_assert!(std::ptr::eq(*event, &events[m.start + offset]));
                }
            }
        }

        #[test]
        fn search_is_deterministic(spec in arb_events(), which in 0usize..8) {
            let events = events_from(&spec);
            let pattern = pattern_by_index(which);
            prop_assert_eq!(search(&events, &pattern), search(&events, &pattern));
        }

        #[test]
        fn prefilter_is_transparent(spec in arb_events(), which in 0usize..8) {
            let events = events_from(&spec);
            let pattern = pattern_by_index(which);
            let off = SearchConfig::default().with_prefilter(false);
            prop_assert_eq!(search(&events, &pattern), search_with(&events, &pattern, &off));
        }

        #[test]
        fn single_literal_hits_every_matching_index(spec in arb_events(), tag in 0usize..3) {
            let events = events_from(&spec);
            let pattern = CompiledPattern::compile(lit(TAGS[tag])).unwrap();
            let found: Vec<usize> = search(&events, &pattern).iter().map(|m| {
                assert_eq!(m.len(), 1);
                m.start
            }).collect();
            let expected: Vec<usize> = events
                .iter()
                .enumerate()
                .filter(|(_, e)| e.event_type() == TAGS[tag])
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn zero_repeat_never_consumes(spec in arb_events()) {
            let events = events_from(&spec);
            let plain = CompiledPattern::compile(lit("shot")).unwrap();
            let padded = CompiledPattern::compile(
                Pattern::repeat(lit("pass"), 0, Some(0)).unwrap().then(lit("shot")),
            )
            .unwrap();
            prop_assert_eq!(search(&events, &plain), search(&events, &padded));
        }
    }
}
