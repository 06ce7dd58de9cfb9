//! The token stream the parser reads from.
//!
//! It sits between the [`Lexer`] and the parser and adds three things:
//! comments are dropped, tokens the parser pushes back are replayed first,
//! and multi-word keywords are folded into single tokens:
//!
//! | input               | token                          |
//! |---------------------|--------------------------------|
//! | `GROUP BY`          | `Keyword::GroupBy`             |
//! | `ORDER BY`          | `Keyword::OrderBy`             |
//! | `NOT IN`            | `Keyword::NotIn`               |
//! | `IS NULL`           | `Keyword::IsNull`              |
//! | `IS NOT NULL`       | `Keyword::IsNotNull`           |
//! | `NATURAL <join kw>` | the join keyword, `natural_join` set |
//!
//! Replayed tokens are returned as they are and never folded again. The one
//! exception is a lookahead token a failed fold handed back: it has not been
//! through folding yet, so it is folded when it leaves the buffer.

use tracing::trace;

use super::{Keyword, Lexer, PushbackBuffer, Token, TokenKind};
use crate::parser::ParseError;

/// Comment-free, keyword-folding token source with pushback.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    pushback: PushbackBuffer<'a>,
    /// The bottom of `pushback` is fold lookahead that was never folded.
    unfolded_lookahead: bool,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            pushback: PushbackBuffer::new(),
            unfolded_lookahead: false,
        }
    }

    /// The text being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.lexer.source()
    }

    /// Hands a token back; it is the next one returned.
    ///
    /// # Panics
    ///
    /// Panics when more than [`PushbackBuffer::CAPACITY`] tokens are
    /// outstanding.
    pub fn push_back(&mut self, token: Token<'a>) {
        self.pushback.push(token);
    }

    /// Number of pushed-back tokens not yet replayed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pushback.len()
    }

    /// Largest number of pushed-back tokens outstanding at once so far.
    #[must_use]
    pub const fn max_pushback(&self) -> usize {
        self.pushback.high_water()
    }

    /// Returns the next token.
    ///
    /// # Errors
    ///
    /// Returns the lexical error of the underlying lexer.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        let token = match self.pushback.pop() {
            Some(token) if self.unfolded_lookahead && self.pushback.is_empty() => {
                self.unfolded_lookahead = false;
                self.fold(token)?
            }
            Some(token) => token,
            None => {
                let token = self.next_lexed()?;
                self.fold(token)?
            }
        };
        trace!(
            kind = ?token.kind,
            text = token.text,
            line = token.position.line,
            column = token.position.column,
            "token"
        );
        Ok(token)
    }

    /// Next token from the lexer, skipping comments.
    fn next_lexed(&mut self) -> Result<Token<'a>, ParseError> {
        loop {
            let token = self.lexer.next_raw_token()?;
            if token.kind != TokenKind::Comment {
                return Ok(token);
            }
        }
    }

    fn fold(&mut self, token: Token<'a>) -> Result<Token<'a>, ParseError> {
        let Some(keyword) = token.as_keyword() else {
            return Ok(token);
        };
        match keyword {
            Keyword::Group => self.fold_pair(token, Keyword::By, Keyword::GroupBy),
            Keyword::Order => self.fold_pair(token, Keyword::By, Keyword::OrderBy),
            Keyword::Not => self.fold_pair(token, Keyword::In, Keyword::NotIn),
            Keyword::Is => self.fold_is(token),
            Keyword::Natural => self.fold_natural(token),
            _ => Ok(token),
        }
    }

    /// Folds `first` with the next token when that is `second`.
    fn fold_pair(
        &mut self,
        first: Token<'a>,
        second: Keyword,
        folded: Keyword,
    ) -> Result<Token<'a>, ParseError> {
        let next = self.next_lexed()?;
        if next.is_keyword(second) {
            Ok(rewrite(first, next, folded))
        } else {
            self.hand_back(next);
            Ok(first)
        }
    }

    /// `IS NOT NULL` or `IS NULL`; anything else leaves `IS` alone.
    fn fold_is(&mut self, is: Token<'a>) -> Result<Token<'a>, ParseError> {
        let next = self.next_lexed()?;
        if next.is_keyword(Keyword::Null) {
            return Ok(rewrite(is, next, Keyword::IsNull));
        }
        if next.is_keyword(Keyword::Not) {
            let third = self.next_lexed()?;
            if third.is_keyword(Keyword::Null) {
                return Ok(rewrite(is, third, Keyword::IsNotNull));
            }
            self.hand_back(third);
        }
        self.hand_back(next);
        Ok(is)
    }

    /// `NATURAL` followed by a join keyword becomes that join keyword with
    /// the `natural_join` flag.
    fn fold_natural(&mut self, natural: Token<'a>) -> Result<Token<'a>, ParseError> {
        let next = self.next_lexed()?;
        if next.as_keyword().is_some_and(Keyword::starts_join) {
            let mut join = next;
            join.natural_join = true;
            join.span = natural.span.merge(next.span);
            join.position = natural.position;
            Ok(join)
        } else {
            self.hand_back(next);
            Ok(natural)
        }
    }

    /// Returns fold lookahead to the buffer, marked for folding on replay.
    fn hand_back(&mut self, token: Token<'a>) {
        self.pushback.push(token);
        self.unfolded_lookahead = true;
    }
}

/// Turns `first` into the folded keyword covering `first..=last`.
fn rewrite<'a>(first: Token<'a>, last: Token<'a>, folded: Keyword) -> Token<'a> {
    let mut token = first;
    token.kind = TokenKind::Keyword(folded);
    token.reserved = folded.is_reserved();
    token.text = folded.spelling();
    token.span = first.span.merge(last.span);
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        let mut stream = TokenStream::new(input);
        let mut out = Vec::new();
        loop {
            let token = stream.next_token().unwrap();
            if token.is_eof() {
                return out;
            }
            out.push(token);
        }
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokens(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a /* x */ b -- y\n c"),
            vec![TokenKind::Identifier; 3]
        );
    }

    #[test]
    fn test_group_by_folding() {
        let folded = tokens("a GROUP  BY b");
        assert_eq!(folded.len(), 3);
        assert_eq!(folded[1].kind, TokenKind::Keyword(Keyword::GroupBy));
        assert_eq!(folded[1].text, "group by");
        assert!(folded[1].reserved);
        assert_eq!(folded[1].span, Span::new(2, 11));
        assert_eq!(folded[1].position.column, 3);
    }

    #[test]
    fn test_fold_across_comment() {
        assert_eq!(
            kinds("order /* c */ by"),
            vec![TokenKind::Keyword(Keyword::OrderBy)]
        );
    }

    #[test]
    fn test_unfolded_group_is_restored() {
        let unfolded = tokens("group x");
        assert_eq!(unfolded[0].kind, TokenKind::Keyword(Keyword::Group));
        assert!(!unfolded[0].reserved);
        assert_eq!(unfolded[1].text, "x");
    }

    #[test]
    fn test_not_in_folding() {
        assert_eq!(
            kinds("not in not x"),
            vec![
                TokenKind::Keyword(Keyword::NotIn),
                TokenKind::Keyword(Keyword::Not),
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_is_null_folding() {
        assert_eq!(
            kinds("is null is not null"),
            vec![
                TokenKind::Keyword(Keyword::IsNull),
                TokenKind::Keyword(Keyword::IsNotNull),
            ]
        );
    }

    #[test]
    fn test_is_not_true_is_left_alone() {
        assert_eq!(
            kinds("is not true"),
            vec![
                TokenKind::Keyword(Keyword::Is),
                TokenKind::Keyword(Keyword::Not),
                TokenKind::Keyword(Keyword::True),
            ]
        );
        assert_eq!(
            kinds("is unknown"),
            vec![
                TokenKind::Keyword(Keyword::Is),
                TokenKind::Keyword(Keyword::Unknown),
            ]
        );
    }

    #[test]
    fn test_natural_join_folding() {
        let folded = tokens("natural left join");
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0].kind, TokenKind::Keyword(Keyword::Left));
        assert!(folded[0].natural_join);
        assert_eq!(folded[0].span, Span::new(0, 12));
        assert!(!folded[1].natural_join);
    }

    #[test]
    fn test_natural_alone_stays() {
        let unfolded = tokens("natural x");
        assert_eq!(unfolded[0].kind, TokenKind::Keyword(Keyword::Natural));
        assert!(!unfolded[0].natural_join);
    }

    #[test]
    fn test_lookahead_is_folded_on_replay() {
        assert_eq!(
            kinds("group group by"),
            vec![
                TokenKind::Keyword(Keyword::Group),
                TokenKind::Keyword(Keyword::GroupBy),
            ]
        );
        assert_eq!(
            kinds("natural order by x"),
            vec![
                TokenKind::Keyword(Keyword::Natural),
                TokenKind::Keyword(Keyword::OrderBy),
                TokenKind::Identifier,
            ]
        );
        assert_eq!(
            kinds("is not is null"),
            vec![
                TokenKind::Keyword(Keyword::Is),
                TokenKind::Keyword(Keyword::Not),
                TokenKind::Keyword(Keyword::IsNull),
            ]
        );
    }

    #[test]
    fn test_pushback_replays_without_folding() {
        let mut stream = TokenStream::new("group by x");
        let folded = stream.next_token().unwrap();
        assert_eq!(folded.as_keyword(), Some(Keyword::GroupBy));
        let x = stream.next_token().unwrap();
        stream.push_back(x);
        stream.push_back(folded);
        assert_eq!(stream.pending(), 2);
        assert_eq!(stream.next_token().unwrap(), folded);
        assert_eq!(stream.next_token().unwrap(), x);
        assert!(stream.next_token().unwrap().is_eof());
        assert_eq!(stream.max_pushback(), 2);
    }

    #[test]
    fn test_lexical_error_propagates() {
        let mut stream = TokenStream::new("is 'open");
        assert!(stream.next_token().is_err());
    }
}
