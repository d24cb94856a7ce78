//! Phase C: escaped-newline splicing.
//!
//! A `\` immediately followed by a `NEWLINE` is deleted — both tokens — so
//! a macro body (or any directive) can continue onto the next physical
//! line.

use armaclass_lex::TokenKind;

use crate::buffer::TokenBuffer;

pub fn splice_escaped_newlines(buf: &mut TokenBuffer) {
    let mut i = 0usize;
    while i < buf.tokens.len() {
        let is_escape = buf.tokens[i].kind == TokenKind::Backslash
            && buf
                .tokens
                .get(i + 1)
                .is_some_and(|t| t.kind == TokenKind::Newline);
        if is_escape {
            buf.tokens.drain(i..i + 2);
        } else {
            i += 1;
        }
    }
    buf.index = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use armaclass_lex::lex_string;

    #[test]
    fn splices_backslash_newline() {
        let tokens = lex_string("a\\\nb").unwrap();
        let mut buf = TokenBuffer::new(tokens);
        splice_escaped_newlines(&mut buf);
        let kinds: Vec<_> = buf.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Word, TokenKind::Word]);
    }

    #[test]
    fn leaves_plain_backslash_alone() {
        let tokens = lex_string("a\\b").unwrap();
        let mut buf = TokenBuffer::new(tokens);
        splice_escaped_newlines(&mut buf);
        assert_eq!(buf.tokens.len(), 3);
    }
}
