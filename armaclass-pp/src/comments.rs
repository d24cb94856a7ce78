//! Phase A: comment removal.
//!
//! A line comment's deletion range runs from `//` up to (but not including)
//! the terminating newline, so the newline survives to keep line counting
//! intact for the rest of the pipeline. A block comment's range runs up to
//! and including `*/`. Ranges are collected first and deleted in reverse so
//! earlier indices stay valid while later ones are removed.

use armaclass_lex::TokenKind;
use armaclass_util::Error;

use crate::buffer::TokenBuffer;

pub fn remove_comments(buf: &mut TokenBuffer, file_label: &str) -> Result<(), Error> {
    let mut removals: Vec<(usize, usize)> = Vec::new();
    let mut i = 0usize;

    while i < buf.tokens.len() {
        match buf.tokens[i].kind {
            TokenKind::Comment => {
                let start = i;
                let mut j = i + 1;
                let mut closed = false;
                while j < buf.tokens.len() {
                    if buf.tokens[j].kind == TokenKind::Newline {
                        removals.push((start, j)); // exclusive of the newline
                        closed = true;
                        break;
                    }
                    j += 1;
                }
                if !closed {
                    removals.push((start, buf.tokens.len()));
                }
                i = j + 1;
            }
            TokenKind::MCommentStart => {
                let start = i;
                let mut j = i + 1;
                let mut closed = false;
                while j < buf.tokens.len() {
                    if buf.tokens[j].kind == TokenKind::MCommentEnd {
                        removals.push((start, j + 1)); // inclusive of */
                        closed = true;
                        break;
                    }
                    j += 1;
                }
                if !closed {
                    return Err(Error::preprocess(
                        "missing terminator for block comment",
                        file_label,
                        buf.tokens[start].span,
                    ));
                }
                i = j + 1;
            }
            _ => i += 1,
        }
    }

    for (start, end) in removals.into_iter().rev() {
        buf.tokens.drain(start..end);
    }
    buf.index = 0;
    Ok(())
}
