//! Backtracking executor for compiled patterns.
//!
//! Runs a [`CompiledPattern`] program at one start index. Choice points are
//! kept on an explicit LIFO stack of `(pc, cursor, bindings mark)` frames
//! instead of native recursion, so deep repetitions cannot overflow the call
//! stack. On failure the top frame is popped, the bindings are rolled back to
//! its mark, and execution resumes at the alternative it recorded.
//!
//! The stack is bounded: every `SPLIT` executed on the current path leaves
//! at most one frame, and an unbounded loop only re-enters its `SPLIT` after
//! consuming an event, so the depth never exceeds program size times
//! `(events + 1)`. The per-attempt step budget bounds time.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use tracing::trace;

use crate::pattern::bindings::{Bindings, Mark};
use crate::pattern::program::{CompiledPattern, Inst};

/// A named capture within a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture<'a, E> {
    /// First captured index.
    pub start: usize,
    /// One past the last captured index.
    pub end: usize,
    /// Captured events, in input order.
    pub events: Vec<&'a E>,
}

impl<'a, E> Capture<'a, E> {
    /// First captured event. `None` for a group that matched nothing.
    #[must_use]
    pub fn first(&self) -> Option<&'a E> {
        self.events.first().copied()
    }

    /// Captured index range.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// One match found by a search.
///
/// Indices refer to the slice that was searched.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a, E> {
    /// Index of the first matched event.
    pub start: usize,
    /// One past the last matched event. Always greater than `start`.
    pub end: usize,
    /// Matched events, contiguous and in input order.
    pub events: Vec<&'a E>,
    /// Captures by name. A name bound several times (inside a repetition)
    /// keeps every binding, in binding order.
    pub captures: BTreeMap<String, Vec<Capture<'a, E>>>,
}

impl<'a, E> MatchResult<'a, E> {
    pub(crate) fn from_bindings(
        events: &[&'a E],
        span: Range<usize>,
        bindings: &Bindings<'_, E>,
    ) -> Self {
        let mut captures: BTreeMap<String, Vec<Capture<'a, E>>> = BTreeMap::new();
        for (name, captured) in bindings.iter() {
            captures.entry(name.to_string()).or_default().push(Capture {
                start: captured.start,
                end: captured.end,
                events: events[captured.clone()].to_vec(),
            });
        }
        Self {
            start: span.start,
            end: span.end,
            events: events[span].to_vec(),
            captures,
        }
    }

    /// Matched index range.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of matched events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: matches consume at least one event.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Most recent binding of `name`.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&Capture<'a, E>> {
        self.captures.get(name).and_then(|all| all.last())
    }

    /// Every binding of `name`, in binding order.
    #[must_use]
    pub fn captures_named(&self, name: &str) -> &[Capture<'a, E>] {
        self.captures.get(name).map_or(&[], Vec::as_slice)
    }
}

/// Outcome of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    /// Matched up to this exclusive end index.
    Matched(usize),
    /// Every alternative failed.
    Failed,
    /// The step budget ran out before the attempt was decided.
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    pc: usize,
    cursor: usize,
    mark: Mark,
}

/// Reusable execution state for one search over one event slice.
///
/// The frame stack and binding trail keep their allocations across attempts.
pub(crate) struct Executor<'p, 's, E> {
    pattern: &'p CompiledPattern<E>,
    events: &'s [&'s E],
    bindings: Bindings<'s, E>,
    stack: Vec<Frame>,
    max_steps: Option<usize>,
}

impl<'p, 's, E> Executor<'p, 's, E> {
    pub(crate) fn new(
        pattern: &'p CompiledPattern<E>,
        events: &'s [&'s E],
        max_steps: Option<usize>,
    ) -> Self {
        Self {
            pattern,
            events,
            bindings: Bindings::new(events),
            stack: Vec::with_capacity(pattern.len()),
            max_steps,
        }
    }

    /// Bindings left by the last attempt. Empty unless it matched.
    pub(crate) const fn bindings(&self) -> &Bindings<'s, E> {
        &self.bindings
    }

    /// Runs the program from `start` with fresh bindings.
    pub(crate) fn attempt(&mut self, start: usize) -> Attempt {
        self.bindings.clear();
        self.stack.clear();

        let pattern = self.pattern;
        let program = pattern.instructions();
        let events = self.events;
        let mut pc = 0;
        let mut cursor = start;
        let mut steps = 0usize;

        loop {
            steps += 1;
            if self.max_steps.is_some_and(|max| steps > max) {
                self.bindings.clear();
                return Attempt::Exhausted;
            }

            let advanced = match &program[pc] {
                Inst::Literal { predicate, capture } => {
                    let Some(&event) = events.get(cursor) else {
                        // Out of input.
                        if !self.backtrack(&mut pc, &mut cursor) {
                            return Attempt::Failed;
                        }
                        continue;
                    };
                    match predicate.evaluate(event, &self.bindings) {
                        Ok(true) => {
                            if let Some(name) = capture {
                                self.bindings
                                    .bind_shared(Arc::clone(name), cursor, cursor + 1, None);
                            }
                            pc += 1;
                            cursor += 1;
                            true
                        }
                        Ok(false) => false,
                        Err(err) => {
                            trace!(
                                predicate = predicate.label(),
                                index = cursor,
                                %err,
                                "predicate treated as false"
                            );
                            false
                        }
                    }
                }
                Inst::Split { prefer, other } => {
                    self.stack.push(Frame {
                        pc: *other,
                        cursor,
                        mark: self.bindings.snapshot(),
                    });
                    pc = *prefer;
                    true
                }
                Inst::Jump(to) => {
                    pc = *to;
                    true
                }
                Inst::Open(slot) => {
                    self.bindings.open(*slot, cursor);
                    pc += 1;
                    true
                }
                Inst::Close { slot, name } => {
                    let closed = self.bindings.close(*slot, Arc::clone(name), cursor);
                    if closed {
                        pc += 1;
                    }
                    closed
                }
                Inst::Done => return Attempt::Matched(cursor),
            };

            if !advanced && !self.backtrack(&mut pc, &mut cursor) {
                return Attempt::Failed;
            }
        }
    }

    /// Pops the newest choice point. Returns false, with the bindings
    /// cleared, when none is left.
    fn backtrack(&mut self, pc: &mut usize, cursor: &mut usize) -> bool {
        match self.stack.pop() {
            Some(frame) => {
                self.bindings.restore(frame.mark);
                *pc = frame.pc;
                *cursor = frame.cursor;
                true
            }
            None => {
                self.bindings.clear();
                false
            }
        }
    }
}
