// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Pattern tree and combinators.
//!
//! A [`Pattern`] is built once and never mutated afterwards. Builders that
//! can produce a pattern the engine could loop on forever return a
//! [`MalformedPatternError`] instead:
//!
//! - `min > max` in a repetition.
//! - A repetition that may iterate without bound, or may be skipped, over a
//!   child that can match zero events.
//! - An alternation with no branches.
//!
//! Whether the top-level pattern consumes at least one event is checked by
//! [`CompiledPattern::compile`](crate::pattern::program::CompiledPattern::compile).

use std::fmt;
use std::sync::Arc;

use crate::error::MalformedPatternError;
use crate::pattern::predicate::Predicate;

/// Immutable pattern tree over events of type `E`.
pub enum Pattern<E> {
    /// Exactly one event satisfying `predicate`, optionally bound to `capture`.
    Literal {
        /// Test applied to the candidate event.
        predicate: Predicate<E>,
        /// Capture name bound to the matched event.
        capture: Option<Arc<str>>,
    },
    /// Children matched back to back.
    Sequence(Vec<Pattern<E>>),
    /// `child` repeated between `min` and `max` times, greedily. `max: None`
    /// is unbounded.
    Repeat {
        /// Repeated sub-pattern.
        child: Box<Pattern<E>>,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: Option<usize>,
    },
    /// Branches tried in declared order.
    Alternation(Vec<Pattern<E>>),
    /// Binds `name` to the span consumed by `child`.
    Group {
        /// Capture name.
        name: Arc<str>,
        /// Captured sub-pattern.
        child: Box<Pattern<E>>,
    },
}

impl<E> Clone for Pattern<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal { predicate, capture } => Self::Literal {
                predicate: predicate.clone(),
                capture: capture.clone(),
            },
            Self::Sequence(children) => Self::Sequence(children.clone()),
            Self::Repeat { child, min, max } => Self::Repeat {
                child: child.clone(),
                min: *min,
                max: *max,
            },
            Self::Alternation(branches) => Self::Alternation(branches.clone()),
            Self::Group { name, child } => Self::Group {
                name: Arc::clone(name),
                child: child.clone(),
            },
        }
    }
}

impl<E> fmt::Debug for Pattern<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal {
                predicate,
                capture: Some(name),
            } => write!(f, "(?<{name}>{predicate:?})"),
            Self::Literal {
                predicate,
                capture: None,
            } => write!(f, "{predicate:?}"),
            Self::Sequence(children) => f.debug_list().entries(children).finish(),
            Self::Repeat { child, min, max } => match max {
                Some(max) => write!(f, "{child:?}{{{min},{max}}}"),
                None => write!(f, "{child:?}{{{min},}}"),
            },
            Self::Alternation(branches) => {
                f.write_str("(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{branch:?}")?;
                }
                f.write_str(")")
            }
            Self::Group { name, child } => write!(f, "(?<{name}>{child:?})"),
        }
    }
}

impl<E> Pattern<E> {
    /// One event satisfying `predicate`.
    #[must_use]
    pub const fn literal(predicate: Predicate<E>) -> Self {
        Self::Literal {
            predicate,
            capture: None,
        }
    }

    /// One event satisfying `predicate`, bound to `name`.
    #[must_use]
    pub fn capture(name: &str, predicate: Predicate<E>) -> Self {
        Self::Literal {
            predicate,
            capture: Some(Arc::from(name)),
        }
    }

    /// Concatenation. A single child is returned as is.
    #[must_use]
    pub fn sequence(children: impl IntoIterator<Item = Self>) -> Self {
        let mut children: Vec<Self> = children.into_iter().collect();
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Self::Sequence(children)
    }

    /// Ordered choice between `branches`.
    ///
    /// # Errors
    ///
    /// [`MalformedPatternError::EmptyAlternation`] if `branches` is empty.
    pub fn alternation(
        branches: impl IntoIterator<Item = Self>,
    ) -> Result<Self, MalformedPatternError> {
        let mut branches: Vec<Self> = branches.into_iter().collect();
        match branches.len() {
            0 => Err(MalformedPatternError::EmptyAlternation),
            1 => branches.pop().ok_or(MalformedPatternError::EmptyAlternation),
            _ => Ok(Self::Alternation(branches)),
        }
    }

    /// `child` repeated `min..=max` times (`max: None` for unbounded).
    ///
    /// # Errors
    ///
    /// - [`MalformedPatternError::MinExceedsMax`] if `min > max`.
    /// - [`MalformedPatternError::ZeroWidthRepetition`] if `child` can match
    ///   zero events and the repetition is unbounded or may be skipped.
    ///   `max == Some(0)` is always accepted: it matches nothing and consumes
    ///   nothing.
    ///
    /// Compilation unrolls bounded repetitions into `max` copies of `child`
    /// (`min` copies when unbounded), so large bounds can make an otherwise
    /// valid pattern fail [`CompiledPattern::compile`] with
    /// [`MalformedPatternError::ProgramTooLarge`]. A single literal repeated
    /// `1..=100_000` times already exceeds
    /// [`MAX_PROGRAM_SIZE`](crate::pattern::program::MAX_PROGRAM_SIZE); prefer
    /// an unbounded repetition when no real upper bound is needed.
    ///
    /// [`CompiledPattern::compile`]: crate::pattern::program::CompiledPattern::compile
    pub fn repeat(
        child: Self,
        min: usize,
        max: Option<usize>,
    ) -> Result<Self, MalformedPatternError> {
        if let Some(max) = max {
            if min > max {
                return Err(MalformedPatternError::MinExceedsMax { min, max });
            }
        }
        if max != Some(0) && (min == 0 || max.is_none()) && child.is_nullable() {
            return Err(MalformedPatternError::ZeroWidthRepetition);
        }
        Ok(Self::Repeat {
            child: Box::new(child),
            min,
            max,
        })
    }

    /// Zero or one occurrence of `child`, greedy.
    ///
    /// # Errors
    ///
    /// Same as [`repeat`](Self::repeat) with bounds `0..=1`.
    pub fn optional(child: Self) -> Result<Self, MalformedPatternError> {
        Self::repeat(child, 0, Some(1))
    }

    /// Binds `name` to the span consumed by `child`.
    #[must_use]
    pub fn group(name: &str, child: Self) -> Self {
        Self::Group {
            name: Arc::from(name),
            child: Box::new(child),
        }
    }

    /// `self` followed by `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        match self {
            Self::Sequence(mut children) => {
                children.push(next);
                Self::Sequence(children)
            }
            first => Self::Sequence(vec![first, next]),
        }
    }

    /// `self` or, failing that, `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Alternation(mut branches) => {
                branches.push(other);
                Self::Alternation(branches)
            }
            first => Self::Alternation(vec![first, other]),
        }
    }

    /// Binds `name` to whatever `self` matches. An uncaptured literal takes
    /// the name directly.
    #[must_use]
    pub fn named(self, name: &str) -> Self {
        match self {
            Self::Literal {
                predicate,
                capture: None,
            } => Self::capture(name, predicate),
            other => Self::group(name, other),
        }
    }

    /// One or more repetitions.
    ///
    /// # Errors
    ///
    /// See [`repeat`](Self::repeat).
    pub fn one_or_more(self) -> Result<Self, MalformedPatternError> {
        Self::repeat(self, 1, None)
    }

    /// Zero or more repetitions.
    ///
    /// # Errors
    ///
    /// See [`repeat`](Self::repeat).
    pub fn zero_or_more(self) -> Result<Self, MalformedPatternError> {
        Self::repeat(self, 0, None)
    }

    /// Exactly `n` repetitions.
    ///
    /// # Errors
    ///
    /// See [`repeat`](Self::repeat).
    pub fn exactly(self, n: usize) -> Result<Self, MalformedPatternError> {
        Self::repeat(self, n, Some(n))
    }

    /// At least `n` repetitions.
    ///
    /// # Errors
    ///
    /// See [`repeat`](Self::repeat).
    pub fn at_least(self, n: usize) -> Result<Self, MalformedPatternError> {
        Self::repeat(self, n, None)
    }

    /// Between `min` and `max` repetitions.
    ///
    /// # Errors
    ///
    /// See [`repeat`](Self::repeat).
    pub fn between(self, min: usize, max: usize) -> Result<Self, MalformedPatternError> {
        Self::repeat(self, min, Some(max))
    }

    /// Re-checks the builder rules over the whole tree.
    ///
    /// The variants are public, so a tree assembled by hand may skip the
    /// checks [`repeat`](Self::repeat) and [`alternation`](Self::alternation)
    /// perform.
    ///
    /// # Errors
    ///
    /// The first [`MalformedPatternError`] found, in pre-order.
    pub fn validate(&self) -> Result<(), MalformedPatternError> {
        match self {
            Self::Literal { .. } => Ok(()),
            Self::Sequence(children) => children.iter().try_for_each(Self::validate),
            Self::Alternation(branches) => {
                if branches.is_empty() {
                    return Err(MalformedPatternError::EmptyAlternation);
                }
                branches.iter().try_for_each(Self::validate)
            }
            Self::Repeat { child, min, max } => {
                if let Some(max) = *max {
                    if *min > max {
                        return Err(MalformedPatternError::MinExceedsMax { min: *min, max });
                    }
                }
                if *max != Some(0) && (*min == 0 || max.is_none()) && child.is_nullable() {
                    return Err(MalformedPatternError::ZeroWidthRepetition);
                }
                child.validate()
            }
            Self::Group { child, .. } => child.validate(),
        }
    }

    /// Returns true if the pattern can match without consuming any event.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Literal { .. } => false,
            Self::Sequence(children) => children.iter().all(Self::is_nullable),
            Self::Repeat { child, min, max } => {
                *min == 0 || *max == Some(0) || child.is_nullable()
            }
            Self::Alternation(branches) => branches.iter().any(Self::is_nullable),
            Self::Group { child, .. } => child.is_nullable(),
        }
    }

    /// Fewest events any match of this pattern consumes.
    #[must_use]
    pub fn min_width(&self) -> usize {
        match self {
            Self::Literal { .. } => 1,
            Self::Sequence(children) => children
                .iter()
                .fold(0usize, |acc, c| acc.saturating_add(c.min_width())),
            Self::Repeat { child, min, max } => {
                if *max == Some(0) {
                    0
                } else {
                    min.saturating_mul(child.min_width())
                }
            }
            Self::Alternation(branches) => {
                branches.iter().map(Self::min_width).min().unwrap_or(0)
            }
            Self::Group { child, .. } => child.min_width(),
        }
    }

    /// Capture names in the order they appear in the pattern, without
    /// duplicates.
    #[must_use]
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'p>(&'p self, names: &mut Vec<&'p str>) {
        match self {
            Self::Literal {
                capture: Some(name),
                ..
            } => push_unique(names, name),
            Self::Literal { capture: None, .. } => {}
            Self::Sequence(children) | Self::Alternation(children) => {
                for child in children {
                    child.collect_names(names);
                }
            }
            Self::Repeat { child, .. } => child.collect_names(names),
            Self::Group { name, child } => {
                push_unique(names, name);
                child.collect_names(names);
            }
        }
    }
}

fn push_unique<'p>(names: &mut Vec<&'p str>, name: &'p str) {
    if !names.contains(&name) {
        names.push(name);
    }
}
