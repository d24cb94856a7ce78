//! Mutable token buffer with a cursor, shared by every preprocessor phase.
//!
//! Grounded in the original implementation's `TokenProcessor`: a flat token
//! list plus an integer index, with `expect`/`skip_whitespace` helpers and
//! in-place splice operations that keep the index valid after a deletion or
//! insertion. `Vec::splice` stands in for the source's list-slice
//! reassignment (`self.tokens[a:b] = new`); see the Design Notes on token
//! buffer discipline for why a plain `Vec` is the right choice here.

use armaclass_lex::{Token, TokenKind};
use armaclass_util::Error;

pub struct TokenBuffer {
    pub tokens: Vec<Token>,
    pub index: usize,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn has_current(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }

    pub fn expect(&self, kind: TokenKind, file_label: &str) -> Result<&Token, Error> {
        match self.current() {
            Some(t) if t.kind == kind => Ok(t),
            Some(t) => Err(Error::unexpected_token(
                format!("{kind:?}"),
                format!("{:?}", t.kind),
                file_label,
                t.span,
            )),
            None => Err(Error::missing_token(format!("{kind:?}"), None)),
        }
    }

    pub fn expect_one_of(&self, kinds: &[TokenKind], file_label: &str) -> Result<&Token, Error> {
        match self.current() {
            Some(t) if kinds.contains(&t.kind) => Ok(t),
            Some(t) => Err(Error::unexpected_token(
                format!("{kinds:?}"),
                format!("{:?}", t.kind),
                file_label,
                t.span,
            )),
            None => Err(Error::missing_token(format!("{kinds:?}"), None)),
        }
    }

    /// Skips WHITESPACE/TAB tokens (and NEWLINE too, when requested).
    pub fn skip_whitespace(&mut self, include_newlines: bool) {
        while let Some(kind) = self.current_kind() {
            let skip = matches!(kind, TokenKind::Whitespace | TokenKind::Tab)
                || (include_newlines && kind == TokenKind::Newline);
            if !skip {
                break;
            }
            self.advance();
        }
    }

    /// Deletes `[start, end)` and rewinds `index` by the removed count if
    /// the cursor was at or past `end`.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        self.tokens.splice(start..end, std::iter::empty());
        if self.index >= end {
            self.index -= end - start;
        } else if self.index > start {
            self.index = start;
        }
    }

    /// Replaces `[start, end)` with `replacement`, leaving the cursor just
    /// past the inserted region.
    pub fn replace_range(&mut self, start: usize, end: usize, replacement: Vec<Token>) {
        let inserted = replacement.len();
        self.tokens.splice(start..end, replacement);
        self.index = start + inserted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armaclass_util::span::Span;

    fn tok(kind: TokenKind) -> Token {
        match kind.lexeme() {
            Some(_) => Token::canonical(kind, Span::DUMMY),
            None => Token::new(kind, "x", Span::DUMMY),
        }
    }

    #[test]
    fn delete_range_rewinds_index_past_deletion() {
        let mut buf = TokenBuffer::new(vec![
            tok(TokenKind::Word),
            tok(TokenKind::Comment),
            tok(TokenKind::Newline),
            tok(TokenKind::Word),
        ]);
        buf.index = 3;
        buf.delete_range(1, 2);
        assert_eq!(buf.tokens.len(), 3);
        assert_eq!(buf.index, 2);
    }

    #[test]
    fn replace_range_places_cursor_after_insertion() {
        let mut buf = TokenBuffer::new(vec![tok(TokenKind::Word), tok(TokenKind::Semicolon)]);
        buf.replace_range(0, 1, vec![tok(TokenKind::Number), tok(TokenKind::Number)]);
        assert_eq!(buf.tokens.len(), 3);
        assert_eq!(buf.index, 2);
    }
}
