// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Lowering of a [`Pattern`] tree into a flat backtracking program.
//!
//! ```text
//! Literal(p, c)        LITERAL p c
//! Sequence(a, b)       <a> <b>
//! Alternation(a, b, c)     SPLIT L1, L2
//!                      L1: <a>
//!                          JUMP end
//!                      L2: SPLIT L3, L4
//!                      L3: <b>
//!                          JUMP end
//!                      L4: <c>
//!                      end:
//! Repeat(x, 2, 4)      <x> <x> SPLIT +1, end <x> SPLIT +1, end <x> end:
//! Repeat(x, 1, None)   <x> L: SPLIT +1, end <x> JUMP L end:
//! Group(n, x)          OPEN s <x> CLOSE s n
//! ```
//!
//! `SPLIT prefer, other` continues at `prefer` and leaves a frame for
//! `other`, so the first branch and the longer repetition are always tried
//! first.

use std::sync::Arc;

use tracing::debug;

use crate::error::MalformedPatternError;
use crate::pattern::ast::Pattern;
use crate::pattern::predicate::Predicate;

/// Maximum number of instructions in a compiled program.
///
/// Bounded repetitions are unrolled, so `x{1000}` nested three deep would
/// otherwise produce a billion instructions.
pub const MAX_PROGRAM_SIZE: usize = 100_000;

/// One program instruction.
pub(crate) enum Inst<E> {
    /// Consume one event satisfying `predicate`, binding `capture` to it.
    Literal {
        predicate: Predicate<E>,
        capture: Option<Arc<str>>,
    },
    /// Continue at `prefer`; backtrack to `other`.
    Split { prefer: usize, other: usize },
    Jump(usize),
    /// Record the start of group `slot` at the cursor.
    Open(usize),
    /// Bind `name` to the span since the matching `Open`.
    Close { slot: usize, name: Arc<str> },
    Done,
}

/// A pattern lowered to a program, ready for searching.
///
/// Compilation is done once; the result is immutable and can be shared
/// across threads and searches.
pub struct CompiledPattern<E> {
    pattern: Pattern<E>,
    program: Vec<Inst<E>>,
}

impl<E> Clone for Inst<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal { predicate, capture } => Self::Literal {
                predicate: predicate.clone(),
                capture: capture.clone(),
            },
            Self::Split { prefer, other } => Self::Split {
                prefer: *prefer,
                other: *other,
            },
            Self::Jump(to) => Self::Jump(*to),
            Self::Open(slot) => Self::Open(*slot),
            Self::Close { slot, name } => Self::Close {
                slot: *slot,
                name: Arc::clone(name),
            },
            Self::Done => Self::Done,
        }
    }
}

impl<E> Clone for CompiledPattern<E> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            program: self.program.clone(),
        }
    }
}

impl<E> std::fmt::Debug for CompiledPattern<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("pattern", &self.pattern)
            .field("instructions", &self.program.len())
            .finish()
    }
}

impl<E> CompiledPattern<E> {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// - Any repetition or alternation error from
    ///   [`Pattern::validate`], for trees assembled from the enum variants
    ///   directly instead of through the checked builders.
    /// - [`MalformedPatternError::EmptyMatch`] if `pattern` can match
    ///   without consuming an event.
    /// - [`MalformedPatternError::ProgramTooLarge`] if the lowered program
    ///   would exceed [`MAX_PROGRAM_SIZE`] instructions.
    pub fn compile(pattern: Pattern<E>) -> Result<Self, MalformedPatternError> {
        pattern.validate()?;
        if pattern.is_nullable() {
            return Err(MalformedPatternError::EmptyMatch);
        }
        let size = program_size(&pattern).saturating_add(1);
        if size > MAX_PROGRAM_SIZE {
            return Err(MalformedPatternError::ProgramTooLarge {
                size,
                limit: MAX_PROGRAM_SIZE,
            });
        }

        let mut program = Vec::with_capacity(size);
        let slots = Lowering::new(&mut program).emit(&pattern);
        program.push(Inst::Done);
        debug_assert_eq!(program.len(), size);

        debug!(
            instructions = program.len(),
            groups = slots,
            min_width = pattern.min_width(),
            "compiled pattern"
        );
        Ok(Self { pattern, program })
    }

    /// The source pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern<E> {
        &self.pattern
    }

    /// Number of program instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.program.len()
    }

    /// Always false: a compiled program contains at least one literal and
    /// the final `Done`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    pub(crate) fn instructions(&self) -> &[Inst<E>] {
        &self.program
    }

    /// Predicate every match must start with, if the program begins with a
    /// literal (after any group openings).
    pub(crate) fn leading_literal(&self) -> Option<&Predicate<E>> {
        self.program
            .iter()
            .find(|inst| !matches!(inst, Inst::Open(_)))
            .and_then(|inst| match inst {
                Inst::Literal { predicate, .. } => Some(predicate),
                _ => None,
            })
    }
}

impl<E> TryFrom<Pattern<E>> for CompiledPattern<E> {
    type Error = MalformedPatternError;

    fn try_from(pattern: Pattern<E>) -> Result<Self, Self::Error> {
        Self::compile(pattern)
    }
}

/// Instruction count of the lowered pattern, saturating.
fn program_size<E>(pattern: &Pattern<E>) -> usize {
    match pattern {
        Pattern::Literal { .. } => 1,
        Pattern::Sequence(children) => children
            .iter()
            .fold(0usize, |acc, c| acc.saturating_add(program_size(c))),
        Pattern::Alternation(branches) => {
            let body = branches
                .iter()
                .fold(0usize, |acc, b| acc.saturating_add(program_size(b)));
            // One SPLIT and one JUMP per branch except the last.
            body.saturating_add(branches.len().saturating_sub(1).saturating_mul(2))
        }
        Pattern::Group { child, .. } => program_size(child).saturating_add(2),
        Pattern::Repeat { child, min, max } => {
            let body = program_size(child);
            let required = min.saturating_mul(body);
            let optional = match max {
                Some(max) => max.saturating_sub(*min).saturating_mul(body.saturating_add(1)),
                None => body.saturating_add(2),
            };
            if *max == Some(0) {
                0
            } else {
                required.saturating_add(optional)
            }
        }
    }
}

struct Lowering<'p, E> {
    program: &'p mut Vec<Inst<E>>,
    slots: usize,
}

impl<'p, E> Lowering<'p, E> {
    fn new(program: &'p mut Vec<Inst<E>>) -> Self {
        Self { program, slots: 0 }
    }

    fn pc(&self) -> usize {
        self.program.len()
    }

    fn push(&mut self, inst: Inst<E>) -> usize {
        self.program.push(inst);
        self.program.len() - 1
    }

    fn patch_split(&mut self, at: usize, prefer: usize, other: usize) {
        self.program[at] = Inst::Split { prefer, other };
    }

    /// Emits `pattern` and returns the number of group slots used so far.
    fn emit(&mut self, pattern: &Pattern<E>) -> usize {
        match pattern {
            Pattern::Literal { predicate, capture } => {
                self.push(Inst::Literal {
                    predicate: predicate.clone(),
                    capture: capture.clone(),
                });
            }
            Pattern::Sequence(children) => {
                for child in children {
                    self.emit(child);
                }
            }
            Pattern::Alternation(branches) => self.emit_alternation(branches),
            Pattern::Group { name, child } => {
                let slot = self.slots;
                self.slots += 1;
                self.push(Inst::Open(slot));
                self.emit(child);
                self.push(Inst::Close {
                    slot,
                    name: Arc::clone(name),
                });
            }
            Pattern::Repeat { child, min, max } => self.emit_repeat(child, *min, *max),
        }
        self.slots
    }

    fn emit_alternation(&mut self, branches: &[Pattern<E>]) {
        let Some((last, rest)) = branches.split_last() else {
            return;
        };
        let mut exits = Vec::with_capacity(rest.len());
        for branch in rest {
            let split = self.push(Inst::Split { prefer: 0, other: 0 });
            self.emit(branch);
            exits.push(self.push(Inst::Jump(0)));
            let next = self.pc();
            self.patch_split(split, split + 1, next);
        }
        self.emit(last);
        let end = self.pc();
        for exit in exits {
            self.program[exit] = Inst::Jump(end);
        }
    }

    fn emit_repeat(&mut self, child: &Pattern<E>, min: usize, max: Option<usize>) {
        if max == Some(0) {
            return;
        }
        for _ in 0..min {
            self.emit(child);
        }
        match max {
            Some(max) => {
                // Skipping one optional copy skips all the remaining ones.
                let mut splits = Vec::with_capacity(max.saturating_sub(min));
                for _ in min..max {
                    splits.push(self.push(Inst::Split { prefer: 0, other: 0 }));
                    self.emit(child);
                }
                let end = self.pc();
                for split in splits {
                    self.patch_split(split, split + 1, end);
                }
            }
            None => {
                let head = self.push(Inst::Split { prefer: 0, other: 0 });
                self.emit(child);
                self.push(Inst::Jump(head));
                let end = self.pc();
                self.patch_split(head, head + 1, end);
            }
        }
    }
}
