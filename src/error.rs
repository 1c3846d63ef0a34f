// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Error types.
//!
//! Construction-time problems ([`MalformedPatternError`], [`ParseError`]) are
//! fatal and surface before any search runs. [`PredicateError`] is local to a
//! single predicate evaluation: the engine treats it as "predicate is false"
//! and backtracks, so it never escapes [`search`](crate::search::search).

use thiserror::Error;

/// A pattern that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MalformedPatternError {
    /// Repetition lower bound exceeds the upper bound.
    #[error("repetition minimum {min} exceeds maximum {max}")]
    MinExceedsMax {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Repetition of a sub-pattern that can match without consuming events.
    #[error("repeated sub-pattern can match zero events and would never make progress")]
    ZeroWidthRepetition,
    /// Alternation with no branches.
    #[error("alternation needs at least one branch")]
    EmptyAlternation,
    /// Top-level pattern that can match zero events.
    #[error("pattern can match zero events; a match must consume at least one event")]
    EmptyMatch,
    /// Lowered program exceeds the instruction limit.
    #[error("compiled pattern has {size} instructions, limit is {limit}")]
    ProgramTooLarge {
        /// Instruction count of the lowered program.
        size: usize,
        /// Maximum allowed instruction count.
        limit: usize,
    },
}

/// Error returned when textual pattern parsing fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pattern error at position {position}: {message}")]
#[non_exhaustive]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Byte position in the input string where the error occurred.
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A predicate that could not be evaluated against an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PredicateError {
    /// Reference to a capture that is not bound in the current attempt.
    #[error("capture '{0}' is not bound")]
    UnboundCapture(String),
    /// Attribute absent on the candidate or the captured event.
    #[error("attribute '{0}' is missing")]
    MissingAttribute(String),
    /// Attribute values of unrelated types were compared.
    #[error("attribute '{0}' has values that cannot be compared")]
    Incomparable(String),
}

/// A textual query that could not be turned into a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The pattern string is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The parsed pattern cannot be compiled.
    #[error(transparent)]
    Malformed(#[from] MalformedPatternError),
}

/// Search configuration that could not be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// TOML syntax or schema error.
    #[error("invalid search configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// Value outside its accepted range.
    #[error("invalid search configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("test error", 5);
        assert_eq!(err.to_string(), "pattern error at position 5: test error");
    }

    #[test]
    fn test_errors_are_std_errors() {
        let _: &dyn std::error::Error = &ParseError::new("x", 0);
        let _: &dyn std::error::Error = &MalformedPatternError::EmptyMatch;
        let _: &dyn std::error::Error = &PredicateError::UnboundCapture("p1".into());
    }

    #[test]
    fn test_malformed_display() {
        let err = MalformedPatternError::MinExceedsMax { min: 3, max: 2 };
        assert_eq!(err.to_string(), "repetition minimum 3 exceeds maximum 2");
    }

    #[test]
    fn test_query_error_is_transparent() {
        let err = QueryError::from(MalformedPatternError::EmptyMatch);
        assert_eq!(err.to_string(), MalformedPatternError::EmptyMatch.to_string());
        let err = QueryError::from(ParseError::new("empty pattern", 0));
        assert_eq!(err.to_string(), "pattern error at position 0: empty pattern");
    }

    #[test]
    fn test_predicate_error_display() {
        assert_eq!(
            PredicateError::MissingAttribute("team".into()).to_string(),
            "attribute 'team' is missing"
        );
    }
}
