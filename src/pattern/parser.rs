// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Recursive descent parser for textual patterns.
//!
//! Compiles strings like `(?<p1>(?1))(?2)+(?3)` into the same [`Pattern`]
//! tree the builders produce, with `(?N)` referring to the N-th predicate of
//! a caller-supplied table. Parsing does not change matching semantics.
//!
//! ```text
//! alternation := sequence ('|' sequence)*
//! sequence    := quantified+
//! quantified  := atom ('*' | '+' | '?' | '{n}' | '{n,}' | '{n,m}')?
//! atom        := '(?' N ')'                       predicate N (1-indexed)
//!              | '(?<' name '>' alternation ')'   named group
//!              | '(' alternation ')'              non-capturing group
//!              | '.'                              any single event
//! ```
//!
//! Whitespace between tokens is ignored.

use crate::error::ParseError;
use crate::pattern::ast::Pattern;
use crate::pattern::predicate::{any, Predicate};

/// Parses `input` into a [`Pattern`], resolving `(?N)` against
/// `predicates[N - 1]`.
///
/// # Errors
///
/// Returns [`ParseError`] if the string is malformed, refers to a predicate
/// that does not exist, or describes a repetition the builders reject (the
/// error then points at the quantifier).
///
/// # Examples
///
/// ```
/// use event_patterns::pattern::parser::parse_pattern;
/// use event_patterns::pattern::predicate::kind;
/// use event_patterns::Event;
///
/// let predicates = [kind::<Event>("pass"), kind("shot")];
/// let pattern = parse_pattern("(?<p1>(?1))(?1)+(?2)", &predicates).unwrap();
/// assert_eq!(pattern.min_width(), 3);
/// ```
pub fn parse_pattern<E: 'static>(
    input: &str,
    predicates: &[Predicate<E>],
) -> Result<Pattern<E>, ParseError> {
    let mut parser = Parser::new(input, predicates);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(ParseError::new("empty pattern", 0));
    }
    let pattern = parser.parse_alternation()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(pattern),
        Some(c) => Err(ParseError::new(
            format!("unexpected character '{}'", char::from(c)),
            parser.pos,
        )),
    }
}

struct Parser<'a, 'p, E> {
    input: &'a [u8],
    pos: usize,
    predicates: &'p [Predicate<E>],
}

impl<'a, 'p, E: 'static> Parser<'a, 'p, E> {
    const fn new(input: &'a str, predicates: &'p [Predicate<E>]) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            predicates,
        }
    }

    fn parse_alternation(&mut self) -> Result<Pattern<E>, ParseError> {
        let start = self.pos;
        let mut branches = vec![self.parse_sequence()?];
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'|') {
                break;
            }
            self.advance();
            branches.push(self.parse_sequence()?);
        }
        Pattern::alternation(branches).map_err(|err| ParseError::new(err.to_string(), start))
    }

    fn parse_sequence(&mut self) -> Result<Pattern<E>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'|' | b')') => break,
                Some(_) => items.push(self.parse_quantified()?),
            }
        }
        if items.is_empty() {
            return Err(ParseError::new("expected pattern element", self.pos));
        }
        Ok(Pattern::sequence(items))
    }

    fn parse_quantified(&mut self) -> Result<Pattern<E>, ParseError> {
        let atom = self.parse_atom()?;
        self.skip_whitespace();
        let at = self.pos;
        let (min, max) = match self.peek() {
            Some(b'*') => {
                self.advance();
                (0, None)
            }
            Some(b'+') => {
                self.advance();
                (1, None)
            }
            Some(b'?') => {
                self.advance();
                (0, Some(1))
            }
            Some(b'{') => self.parse_bounds()?,
            _ => return Ok(atom),
        };
        Pattern::repeat(atom, min, max).map_err(|err| ParseError::new(err.to_string(), at))
    }

    fn parse_bounds(&mut self) -> Result<(usize, Option<usize>), ParseError> {
        self.expect(b'{')?;
        let min = self.parse_number()?;
        let max = if self.peek() == Some(b',') {
            self.advance();
            if self.peek() == Some(b'}') {
                None
            } else {
                Some(self.parse_number()?)
            }
        } else {
            Some(min)
        };
        self.expect(b'}')?;
        Ok((min, max))
    }

    fn parse_atom(&mut self) -> Result<Pattern<E>, ParseError> {
        match self.peek() {
            Some(b'(') => self.parse_group(),
            Some(b'.') => {
                self.advance();
                Ok(Pattern::literal(any()))
            }
            Some(c) => Err(ParseError::new(
                format!("unexpected character '{}'", char::from(c)),
                self.pos,
            )),
            None => Err(ParseError::new("unexpected end of pattern", self.pos)),
        }
    }

    fn parse_group(&mut self) -> Result<Pattern<E>, ParseError> {
        self.expect(b'(')?;
        if self.peek() != Some(b'?') {
            let inner = self.parse_alternation()?;
            self.skip_whitespace();
            self.expect(b')')?;
            return Ok(inner);
        }
        self.advance();

        match self.peek() {
            Some(b'<') => self.parse_named_group(),
            Some(c) if c.is_ascii_digit() => self.parse_predicate_ref(),
            Some(c) => Err(ParseError::new(
                format!("expected digit or '<' after '(?', got '{}'", char::from(c)),
                self.pos,
            )),
            None => Err(ParseError::new(
                "unexpected end of pattern after '(?'",
                self.pos,
            )),
        }
    }

    fn parse_predicate_ref(&mut self) -> Result<Pattern<E>, ParseError> {
        let start = self.pos;
        let num = self.parse_number()?;
        self.expect(b')')?;
        if num == 0 {
            return Err(ParseError::new(
                "predicate index must be >= 1 (1-indexed)",
                start,
            ));
        }
        // 1-indexed in the text, 0-indexed in the table.
        let predicate = self.predicates.get(num - 1).ok_or_else(|| {
            ParseError::new(
                format!(
                    "predicate index {num} out of range ({} given)",
                    self.predicates.len()
                ),
                start,
            )
        })?;
        Ok(Pattern::literal(predicate.clone()))
    }

    fn parse_named_group(&mut self) -> Result<Pattern<E>, ParseError> {
        self.expect(b'<')?;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(ParseError::new("expected capture name", start));
        }
        // Only ASCII bytes were consumed, so the slice is valid UTF-8.
        let name = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        self.expect(b'>')?;
        let inner = self.parse_alternation()?;
        self.skip_whitespace();
        self.expect(b')')?;
        Ok(inner.named(&name))
    }

    fn parse_number(&mut self) -> Result<usize, ParseError> {
        let start = self.pos;
        let mut num: usize = 0;
        let mut digits = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                num = num
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(usize::from(c - b'0')))
                    .ok_or_else(|| ParseError::new("number overflow in pattern", start))?;
                digits += 1;
                self.advance();
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(ParseError::new("expected number", self.pos));
        }
        Ok(num)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(ParseError::new(
                format!(
                    "expected '{}', got '{}'",
                    char::from(expected),
                    char::from(c)
                ),
                self.pos,
            )),
            None => Err(ParseError::new(
                format!("expected '{}', got end of pattern", char::from(expected)),
                self.pos,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::event::Event;
    use crate::pattern::predicate::{kind, success};

    fn table() -> Vec<Predicate<Event>> {
        vec![kind("pass"), kind("shot"), success()]
    }

    fn parse(input: &str) -> Result<Pattern<Event>, ParseError> {
        parse_pattern(input, &table())
    }

    fn shape(input: &str) -> String {
        format!("{:?}", parse(input).unwrap())
    }

    #[test]
    fn test_single_predicate() {
        assert_eq!(shape("(?1)"), "kind(pass)");
    }

    #[test]
    fn test_sequence() {
        assert_eq!(shape("(?1)(?2)"), "[kind(pass), kind(shot)]");
    }

    #[test]
    fn test_any_event() {
        assert_eq!(shape("(?1).(?2)"), "[kind(pass), any, kind(shot)]");
    }

    #[test]
    fn test_quantifiers() {
        assert_eq!(shape("(?1)*(?2)"), "[kind(pass){0,}, kind(shot)]");
        assert_eq!(shape("(?1)+"), "kind(pass){1,}");
        assert_eq!(shape("(?1)?(?2)"), "[kind(pass){0,1}, kind(shot)]");
        assert_eq!(shape("(?1){3}"), "kind(pass){3,3}");
        assert_eq!(shape("(?1){2,}"), "kind(pass){2,}");
        assert_eq!(shape("(?1){2,5}"), "kind(pass){2,5}");
    }

    #[test]
    fn test_alternation() {
        assert_eq!(shape("(?1)|(?2)"), "(kind(pass) | kind(shot))");
        assert_eq!(
            shape("(?1)(?2)|(?2)"),
            "([kind(pass), kind(shot)] | kind(shot))"
        );
    }

    #[test]
    fn test_groups() {
        assert_eq!(shape("(?<p1>(?1))"), "(?<p1>kind(pass))");
        assert_eq!(
            shape("(?<build_up>(?1)(?1))(?2)"),
            "[(?<build_up>[kind(pass), kind(pass)]), kind(shot)]"
        );
        assert_eq!(shape("((?1)(?2))+"), "[kind(pass), kind(shot)]{1,}");
        assert_eq!(shape("((?1)|(?2))(?3)"), "[(kind(pass) | kind(shot)), success]");
    }

    #[test]
    fn test_whitespace_tolerance() {
        assert_eq!(shape(" (?1) (?2) + | . "), shape("(?1)(?2)+|."));
    }

    #[test]
    fn test_multi_digit_index() {
        let mut predicates = table();
        for _ in 0..10 {
            predicates.push(kind("carry"));
        }
        let p = parse_pattern("(?12)", &predicates).unwrap();
        assert_eq!(format!("{p:?}"), "kind(carry)");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = parse("").unwrap_err();
        assert!(err.message.contains("empty"));
        let err = parse("   ").unwrap_err();
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn test_index_zero_rejected() {
        let err = parse("(?0)").unwrap_err();
        assert!(err.message.contains("must be >= 1"));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = parse("(?1)(?4)").unwrap_err();
        assert!(err.message.contains("out of range"));
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_number_overflow() {
        let err = parse("(?99999999999999999999999)").unwrap_err();
        assert!(err.message.contains("overflow"));
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse("(?1").unwrap_err();
        assert!(err.message.contains("expected ')'"));
        let err = parse("((?1)").unwrap_err();
        assert!(err.message.contains("expected ')'"));
    }

    #[test]
    fn test_invalid_character() {
        let err = parse("x").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("unexpected character 'x'"));
    }

    #[test]
    fn test_stray_close_paren() {
        let err = parse("(?1))").unwrap_err();
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_double_quantifier_rejected() {
        let err = parse("(?1)**").unwrap_err();
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_empty_branch_rejected() {
        let err = parse("(?1)|").unwrap_err();
        assert!(err.message.contains("expected pattern element"));
        let err = parse("()").unwrap_err();
        assert!(err.message.contains("expected pattern element"));
    }

    #[test]
    fn test_bad_group_prefix() {
        let err = parse("(?x)").unwrap_err();
        assert!(err.message.contains("after '(?'"));
        let err = parse("(?<>(?1))").unwrap_err();
        assert!(err.message.contains("capture name"));
    }

    #[test]
    fn test_bounds_errors_point_at_quantifier() {
        let err = parse("(?1){3,2}").unwrap_err();
        assert_eq!(err.position, 4);
        assert!(err.message.contains("minimum 3 exceeds maximum 2"));

        let err = parse("((?1)?)*").unwrap_err();
        assert_eq!(err.position, 7);
        assert!(err.message.contains("zero events"));

        let err = parse("(?1){,2}").unwrap_err();
        assert!(err.message.contains("expected number"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = parse("(?0)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "pattern error at position 2: predicate index must be >= 1 (1-indexed)"
        );
    }
}
