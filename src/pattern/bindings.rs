// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Binding environment for a single match attempt.
//!
//! Captures are kept on an append-only trail. A [`Mark`] is the trail length
//! at the time of the snapshot, so [`Bindings::restore`] is a truncate that
//! costs O(k) for the k entries made since the snapshot. Anything bound on a
//! branch that is later abandoned disappears with the truncate and can never
//! be observed by a sibling branch.
//!
//! Group starts are recorded on the same trail as open markers. Rolling back
//! past a group start therefore also discards the half-open group.
//!
//! Lookup by name scans the trail backwards and returns the most recent
//! binding.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Opaque snapshot marker returned by [`Bindings::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

#[derive(Debug, Clone)]
enum Entry {
    /// Group `slot` started at event index `start` and is not closed yet.
    Open { slot: usize, start: usize },
    /// Capture `name` bound to `start..end`. `group` is the slot for group
    /// captures and `None` for literal captures.
    Bound {
        name: Arc<str>,
        start: usize,
        end: usize,
        group: Option<usize>,
    },
}

/// Named captures made during one match attempt.
///
/// `events` is the sequence being searched; bound spans index into it.
pub struct Bindings<'s, E> {
    events: &'s [&'s E],
    trail: Vec<Entry>,
}

impl<'s, E> Bindings<'s, E> {
    /// Creates an empty environment over `events`.
    #[must_use]
    pub const fn new(events: &'s [&'s E]) -> Self {
        Self {
            events,
            trail: Vec::new(),
        }
    }

    /// Binds `name` to the events in `span`, shadowing earlier bindings of the
    /// same name for lookups. Earlier bindings stay visible via
    /// [`spans`](Self::spans).
    pub fn bind(&mut self, name: &str, span: Range<usize>) {
        self.bind_shared(Arc::from(name), span.start, span.end, None);
    }

    pub(crate) fn bind_shared(
        &mut self,
        name: Arc<str>,
        start: usize,
        end: usize,
        group: Option<usize>,
    ) {
        debug_assert!(start <= end && end <= self.events.len());
        self.trail.push(Entry::Bound {
            name,
            start,
            end,
            group,
        });
    }

    /// Returns a marker for the current state.
    #[must_use]
    pub fn snapshot(&self) -> Mark {
        Mark(self.trail.len())
    }

    /// Rolls back every binding made since `mark` was taken.
    ///
    /// A marker taken after `mark` becomes invalid; restoring to it is a no-op
    /// until the trail grows back past it.
    pub fn restore(&mut self, mark: Mark) {
        self.trail.truncate(mark.0);
    }

    /// Discards all bindings, keeping the allocation.
    pub fn clear(&mut self) {
        self.trail.clear();
    }

    /// Records the start of group `slot` at event index `start`.
    pub(crate) fn open(&mut self, slot: usize, start: usize) {
        self.trail.push(Entry::Open { slot, start });
    }

    /// Closes the innermost open group `slot` and binds it to `start..end`.
    ///
    /// Returns `false` if no open marker exists for `slot`, which the engine
    /// treats as a failed branch.
    pub(crate) fn close(&mut self, slot: usize, name: Arc<str>, end: usize) -> bool {
        // Groups nest, so a closed binding for the same slot seen while
        // scanning back means its open marker belongs to that inner group.
        let mut depth = 0usize;
        let mut start = None;
        for entry in self.trail.iter().rev() {
            match entry {
                Entry::Bound {
                    group: Some(g), ..
                } if *g == slot => depth += 1,
                Entry::Open { slot: s, start: st } if *s == slot => {
                    if depth == 0 {
                        start = Some(*st);
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        match start {
            Some(start) => {
                self.bind_shared(name, start, end, Some(slot));
                true
            }
            None => false,
        }
    }

    /// Span of the most recent binding of `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<Range<usize>> {
        self.trail.iter().rev().find_map(|entry| match entry {
            Entry::Bound {
                name: n, start, end, ..
            } if n.as_ref() == name => Some(*start..*end),
            _ => None,
        })
    }

    /// First event of the most recent binding of `name`.
    ///
    /// `None` if the name is unbound or its span is empty (a group around an
    /// optional sub-pattern that matched nothing).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'s E> {
        let span = self.span(name)?;
        self.events.get(span).and_then(|evs| evs.first().copied())
    }

    /// Events of the most recent binding of `name`.
    #[must_use]
    pub fn events(&self, name: &str) -> Option<&'s [&'s E]> {
        let span = self.span(name)?;
        self.events.get(span)
    }

    /// All spans bound under `name`, in binding order.
    pub fn spans<'b>(&'b self, name: &'b str) -> impl Iterator<Item = Range<usize>> + 'b {
        self.iter()
            .filter(move |(n, _)| *n == name)
            .map(|(_, span)| span)
    }

    /// All bindings in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Range<usize>)> + '_ {
        self.trail.iter().filter_map(|entry| match entry {
            Entry::Bound {
                name, start, end, ..
            } => Some((name.as_ref(), *start..*end)),
            Entry::Open { .. } => None,
        })
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.span(name).is_some()
    }

    /// Number of bindings made (open group markers excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> fmt::Debug for Bindings<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("events", &self.events.len())
            .field("trail", &self.trail)
            .finish()
    }
}
