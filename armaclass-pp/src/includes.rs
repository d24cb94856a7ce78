//! Phase B: `#include` expansion.
//!
//! Each include is resolved to a candidate path, read, lexed, and run
//! through the *entire* preprocessing pipeline recursively — not just this
//! phase — because a macro defined inside an included file must be visible
//! to the includer afterward, and an include nested inside another include
//! must itself expand before splicing back into the outer stream.

use std::path::{Path, PathBuf};

use armaclass_lex::{Lexer, TokenKind};
use armaclass_util::span::SourceMap;
use armaclass_util::diagnostic::Handler;
use armaclass_util::{Error, FxHashSet};

use crate::buffer::TokenBuffer;
use crate::directives::MAX_EXPANSION_DEPTH;
use crate::macros::MacroTable;
use crate::paths;

pub fn expand_includes(
    buf: &mut TokenBuffer,
    current_file: &Path,
    source_map: &mut SourceMap,
    macros: &mut MacroTable,
    handler: &Handler,
    visited: &mut FxHashSet<PathBuf>,
    depth: usize,
    file_label: &str,
) -> Result<(), Error> {
    buf.index = 0;
    while buf.has_current() {
        match buf.current_kind() {
            Some(TokenKind::KeywordInclude) => {
                process_one(buf, current_file, source_map, macros, handler, visited, depth, file_label)?
            }
            Some(TokenKind::Comment) | Some(TokenKind::MCommentStart) | Some(TokenKind::MCommentEnd) => {
                return Err(Error::preprocess(
                    "comment token survived into include expansion",
                    file_label,
                    buf.current().unwrap().span,
                ));
            }
            _ => buf.advance(),
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn process_one(
    buf: &mut TokenBuffer,
    current_file: &Path,
    source_map: &mut SourceMap,
    macros: &mut MacroTable,
    handler: &Handler,
    visited: &mut FxHashSet<PathBuf>,
    depth: usize,
    file_label: &str,
) -> Result<(), Error> {
    let start = buf.index;
    let directive_span = buf.current().unwrap().span;
    buf.advance();
    buf.expect_one_of(&[TokenKind::Whitespace, TokenKind::Tab], file_label)?;
    buf.skip_whitespace(false);

    let close_kind = match buf.current_kind() {
        Some(TokenKind::DoubleQuotes) => TokenKind::DoubleQuotes,
        Some(TokenKind::Less) => TokenKind::Greater,
        other => {
            return Err(Error::unexpected_token(
                "\" or <",
                format!("{other:?}"),
                file_label,
                buf.current().map(|t| t.span).unwrap_or_default(),
            ))
        }
    };
    buf.advance();

    let mut spec = String::new();
    loop {
        match buf.current_kind() {
            Some(k) if k == close_kind => break,
            Some(_) => {
                spec.push_str(&buf.current().unwrap().text);
                buf.advance();
            }
            None => return Err(Error::missing_token(format!("{close_kind:?}"), Some("#include".to_string()))),
        }
    }
    buf.advance(); // past closing delimiter
    let end = buf.index;

    let candidates = paths::candidates(current_file, &spec);
    let resolved = candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .ok_or_else(|| Error::preprocess(format!("could not resolve include \"{spec}\""), file_label, directive_span))?;

    let canonical = resolved.canonicalize().unwrap_or_else(|_| resolved.clone());
    if visited.contains(&canonical) {
        return Err(Error::preprocess(
            format!("cyclic include of {}", canonical.display()),
            file_label,
            directive_span,
        ));
    }
    if depth >= MAX_EXPANSION_DEPTH {
        return Err(Error::preprocess(
            "recursion limit exceeded while expanding includes",
            file_label,
            directive_span,
        ));
    }

    let contents = std::fs::read_to_string(&resolved)?;
    let included_id = source_map.add(resolved.clone());
    let included_label = source_map.label(included_id);
    let included_tokens = Lexer::new(&contents, included_id, included_label).tokenize()?;

    visited.insert(canonical.clone());
    let result = crate::preprocess(
        included_tokens,
        included_id,
        &resolved,
        source_map,
        macros,
        handler,
        visited,
        depth + 1,
    );
    visited.remove(&canonical);
    let expanded = result?;

    buf.replace_range(start, end, expanded);
    Ok(())
}
