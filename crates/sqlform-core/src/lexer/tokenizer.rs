//! SQL Tokenizer implementation.

use super::keywords::{self, ensure_keyword_table};
use super::{Position, Span, Token, TokenKind};
use crate::parser::{ParseError, ParseErrorKind};

/// Characters that may form an operator run.
const fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '~' | '@' | '#' | '%' | '^' | '&' | '|' | '+' | '-' | '*' | '/' | '?' | '<' | '>' | '='
            | '!'
    )
}

/// Operator runs containing one of these may end in `+` or `-`.
const fn is_operator_special(c: char) -> bool {
    matches!(c, '~' | '!' | '@' | '#' | '%' | '^' | '&' | '|' | '`' | '?')
}

const fn is_white_char(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t' | '\x0b' | '\x0c')
}

/// Letters, `_`, or any non-ASCII character.
const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

const fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

fn is_comparison(op: &str) -> bool {
    matches!(op, "=" | "<>" | "!=" | "<" | ">" | "<=" | ">=")
}

/// A lexer that turns SQL text into raw tokens, one at a time.
///
/// The lexer knows nothing about multi-word keywords or pushback; that is the
/// job of [`TokenStream`](super::TokenStream).
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Line of the current position.
    line: u32,
    /// Column of the current position, in characters.
    column: u32,
    /// Byte offset where the current line starts.
    line_start: usize,
    /// Position of the start of the current token.
    start_position: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    ///
    /// Every non-ASCII character is an identifier character, so text decoded
    /// from a legacy single-byte encoding lexes the same way as UTF-8.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        ensure_keyword_table();
        Self {
            input,
            pos: 0,
            start: 0,
            line: 1,
            column: 1,
            line_start: 0,
            start_position: Position::START,
        }
    }

    /// The text being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.input
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = self.pos;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Steps back to an earlier byte position of the current line.
    fn unget_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.line_start && pos <= self.pos);
        let stepped = self.input[pos..self.pos].chars().count();
        self.column -= u32::try_from(stepped).unwrap_or(self.column - 1);
        self.pos = pos;
    }

    const fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            line_start: self.line_start,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_white_char) {
            self.advance();
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(
            kind,
            &self.input[self.start..self.pos],
            self.make_span(),
            self.start_position,
        )
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.start_position, self.make_span())
    }


    /// Scans a numeric literal whose first character is already consumed.
    fn scan_number(&mut self, first: char) -> Token<'a> {
        let mut seen_dot = first == '.';
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            self.advance();
        }

        // Exponent, only when digits follow
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let digits_at = if self.peek_next().is_some_and(|c| c == '+' || c == '-') {
                2
            } else {
                1
            };
            if self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digits_at {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        self.make_token(TokenKind::Numeric)
    }

    /// Scans an identifier or keyword whose first character is consumed.
    fn scan_identifier(&mut self, first: char) -> Token<'a> {
        let mut keyword_chars = first.is_ascii_alphabetic();
        while let Some(c) = self.peek() {
            if !is_identifier_char(c) {
                break;
            }
            keyword_chars &= c.is_ascii_alphabetic();
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match keywords::lookup(text).filter(|_| keyword_chars) {
            Some(entry) => {
                let mut token = self.make_token(TokenKind::Keyword(entry.keyword));
                token.reserved = entry.reserved;
                token
            }
            None => self.make_token(TokenKind::Identifier),
        }
    }

    /// Scans the rest of a quoted literal; the opening quote is consumed.
    /// Returns whether a doubled quote occurred.
    fn scan_quoted(&mut self, quote: char, unclosed: ParseErrorKind) -> Result<bool, ParseError> {
        let mut escaped = false;
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                        escaped = true;
                    } else {
                        return Ok(escaped);
                    }
                }
                Some(_) => {}
                None => return Err(self.error(unclosed)),
            }
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> Result<Token<'a>, ParseError> {
        let escaped = self.scan_quoted('\'', ParseErrorKind::UnclosedString)?;
        let mut token = self.make_token(TokenKind::String);
        token.escaped = escaped;
        Ok(token)
    }

    /// Scans a double-quoted identifier.
    fn scan_quoted_identifier(&mut self) -> Result<Token<'a>, ParseError> {
        let escaped = self.scan_quoted('"', ParseErrorKind::UnclosedIdentifier)?;
        let mut token = self.make_token(TokenKind::Identifier);
        token.quoted = true;
        token.escaped = escaped;
        Ok(token)
    }

    /// Scans a `/* ... */` comment; `/` is consumed, `*` is next.
    fn scan_block_comment(&mut self) -> Result<Token<'a>, ParseError> {
        self.advance();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(self.make_token(TokenKind::Comment));
                }
                Some(_) => {}
                None => return Err(self.error(ParseErrorKind::UnclosedComment)),
            }
        }
    }

    /// Scans a `-- ...` comment up to, not including, the newline.
    fn scan_line_comment(&mut self) -> Token<'a> {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        let mut token = self.make_token(TokenKind::Comment);
        token.singleline = true;
        token
    }

    /// Scans an operator run whose first character is consumed.
    fn scan_operator(&mut self) -> Token<'a> {
        while let Some(c) = self.peek() {
            let comment_start = matches!((c, self.peek_next()), ('-', Some('-')) | ('/', Some('*')));
            if !is_operator_char(c) || comment_start {
                break;
            }
            self.advance();
        }

        // A multi-character operator cannot end in + or - unless it also
        // contains one of the special characters.
        let text = &self.input[self.start..self.pos];
        if text.len() > 1 && text.ends_with(['+', '-']) && !text.contains(is_operator_special) {
            let keep = text.trim_end_matches(['+', '-']).len().max(1);
            self.unget_to(self.start + keep);
        }

        let mut token = self.make_token(TokenKind::Operator);
        token.comparing_op = is_comparison(token.text);
        token
    }

    /// Scans from the current cursor and returns exactly one token, comments
    /// included. At the end of input it keeps returning `Eof`.
    ///
    /// # Errors
    ///
    /// Returns a lexical error for an unterminated string, quoted identifier
    /// or block comment.
    pub fn next_raw_token(&mut self) -> Result<Token<'a>, ParseError> {
        self.skip_whitespace();
        self.start = self.pos;
        self.start_position = self.position();

        let Some(c) = self.advance() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let token = match c {
            '0'..='9' => self.scan_number(c),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(c),
            '.' => self.make_token(TokenKind::Dot),
            c if is_identifier_start(c) => self.scan_identifier(c),
            ';' => self.make_token(TokenKind::Semicolon),
            ',' => self.make_token(TokenKind::Comma),
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            '\'' => self.scan_string()?,
            '"' => self.scan_quoted_identifier()?,
            '=' if self.peek() == Some('>') => {
                self.advance();
                self.make_token(TokenKind::NamedExpr)
            }
            '/' if self.peek() == Some('*') => self.scan_block_comment()?,
            '-' if self.peek() == Some('-') => self.scan_line_comment(),
            ':' => match self.peek() {
                Some(':') => {
                    self.advance();
                    self.make_token(TokenKind::CastOperator)
                }
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::NamedExpr)
                }
                _ => self.make_token(TokenKind::Other(':')),
            },
            c if is_operator_char(c) => self.scan_operator(),
            c => self.make_token(TokenKind::Other(c)),
        };

        Ok(token)
    }

    /// Tokenizes the entire input and returns all raw tokens, ending with
    /// `Eof`.
    ///
    /// # Errors
    ///
    /// Returns the first lexical error.
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_raw_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
