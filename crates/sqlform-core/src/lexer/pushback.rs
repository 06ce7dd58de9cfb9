//! Bounded LIFO buffer of tokens handed back to the token stream.

use super::Token;

/// A fixed-capacity stack of tokens.
///
/// The parser returns tokens it consumed speculatively by pushing them here;
/// the next read pops the most recently pushed one. To restore a consumed
/// sequence, push it in reverse order of consumption.
#[derive(Debug, Clone)]
pub struct PushbackBuffer<'a> {
    tokens: Vec<Token<'a>>,
    high_water: usize,
}

impl<'a> PushbackBuffer<'a> {
    /// Maximum number of outstanding pushed-back tokens.
    pub const CAPACITY: usize = 10;

    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Vec::with_capacity(Self::CAPACITY),
            high_water: 0,
        }
    }

    /// Pushes a token back.
    ///
    /// # Panics
    ///
    /// Panics when the buffer already holds [`Self::CAPACITY`] tokens. The
    /// grammar never needs that much lookahead, so an overflow is a parser
    /// defect.
    pub fn push(&mut self, token: Token<'a>) {
        assert!(
            self.tokens.len() < Self::CAPACITY,
            "token pushback buffer overflow (capacity {})",
            Self::CAPACITY
        );
        self.tokens.push(token);
        self.high_water = self.high_water.max(self.tokens.len());
    }

    /// Pops the most recently pushed token.
    pub fn pop(&mut self) -> Option<Token<'a>> {
        self.tokens.pop()
    }

    /// Number of tokens currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true when no token is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Largest number of tokens held at once so far.
    #[must_use]
    pub const fn high_water(&self) -> usize {
        self.high_water
    }
}

impl Default for PushbackBuffer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Position, Span, TokenKind};

    fn token(text: &str) -> Token<'_> {
        Token::new(
            TokenKind::Identifier,
            text,
            Span::new(0, text.len()),
            Position::START,
        )
    }

    #[test]
    fn test_lifo_order() {
        let mut buffer = PushbackBuffer::new();
        buffer.push(token("a"));
        buffer.push(token("b"));
        buffer.push(token("c"));
        assert_eq!(buffer.pop().map(|t| t.text), Some("c"));
        assert_eq!(buffer.pop().map(|t| t.text), Some("b"));
        assert_eq!(buffer.pop().map(|t| t.text), Some("a"));
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn test_high_water() {
        let mut buffer = PushbackBuffer::new();
        assert!(buffer.is_empty());
        buffer.push(token("a"));
        buffer.push(token("b"));
        buffer.pop();
        buffer.push(token("c"));
        buffer.pop();
        buffer.pop();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.high_water(), 2);
    }

    #[test]
    fn test_fills_to_capacity() {
        let mut buffer = PushbackBuffer::new();
        for _ in 0..PushbackBuffer::CAPACITY {
            buffer.push(token("x"));
        }
        assert_eq!(buffer.len(), PushbackBuffer::CAPACITY);
    }

    #[test]
    #[should_panic(expected = "pushback buffer overflow")]
    fn test_overflow_panics() {
        let mut buffer = PushbackBuffer::new();
        for _ in 0..=PushbackBuffer::CAPACITY {
            buffer.push(token("x"));
        }
    }
}
