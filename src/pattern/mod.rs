// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Pattern construction and matching.
//!
//! A regular-expression-like language over events instead of characters.
//! Each position of a pattern is a [`Predicate`](predicate::Predicate)
//! tested against one event, and predicates may refer back to events bound
//! earlier in the same match.
//!
//! # Building blocks
//!
//! ```text
//! literal(p)          one event satisfying p
//! capture(n, p)       one event satisfying p, bound to n
//! a.then(b)           a followed by b
//! a.or(b)             a, or b if the rest of the pattern fails after a
//! repeat(a, m, M)     a between m and M times, greedy (M unbounded if None)
//! optional(a)         repeat(a, 0, 1)
//! group(n, a)         a, with the consumed span bound to n
//! ```
//!
//! # Pipeline
//!
//! 1. [`ast`] builds and validates the [`Pattern`](ast::Pattern) tree,
//!    directly or via the textual syntax in [`parser`].
//! 2. [`program`] lowers it to a flat instruction list.
//! 3. [`executor`] runs the program at one start index with a
//!    [`Bindings`](bindings::Bindings) environment, backtracking on an
//!    explicit frame stack.

pub mod ast;
pub mod bindings;
pub mod executor;
pub mod parser;
pub mod predicate;
pub mod program;
