//! Preprocessing for the class/config dialect: comment stripping, `#include`
//! expansion, escaped-newline splicing, and `#define`/`#undef`/conditional
//! macro processing.
//!
//! The four phases run in a fixed order over one mutable [`TokenBuffer`]:
//! comments first (so later phases never see a `COMMENT` token), then
//! includes (each one recursively run through this same pipeline so macros
//! it defines are visible to the includer), then escaped-newline splicing,
//! then directive processing.

pub mod buffer;
pub mod comments;
pub mod directives;
pub mod escapes;
pub mod includes;
pub mod macros;
pub mod paths;

use std::path::Path;

use armaclass_lex::Token;
use armaclass_util::diagnostic::Handler;
use armaclass_util::span::{FileId, SourceMap};
use armaclass_util::{Error, FxHashSet};

pub use directives::MAX_EXPANSION_DEPTH;
pub use macros::{MacroDefinition, MacroTable};

use buffer::TokenBuffer;
use directives::PdContext;
use std::path::PathBuf;

/// Runs all four preprocessing phases over `tokens`, which must already be
/// lexed from `file_path` (registered as `file_id` in `source_map`).
///
/// `macros`, `handler`, and `visited` are threaded through `#include`
/// recursion so that macro definitions and diagnostics accumulate across an
/// entire include chain, and so an include cycle can be detected.
#[allow(clippy::too_many_arguments)]
pub fn preprocess(
    tokens: Vec<Token>,
    file_id: FileId,
    file_path: &Path,
    source_map: &mut SourceMap,
    macros: &mut MacroTable,
    handler: &Handler,
    visited: &mut FxHashSet<PathBuf>,
    depth: usize,
) -> Result<Vec<Token>, Error> {
    if depth > MAX_EXPANSION_DEPTH {
        return Err(Error::preprocess(
            "recursion limit exceeded while preprocessing",
            source_map.label(file_id),
            armaclass_util::span::Span::new(file_id, 0, 0),
        ));
    }

    let file_label = source_map.label(file_id);
    let mut buf = TokenBuffer::new(tokens);

    comments::remove_comments(&mut buf, &file_label)?;
    includes::expand_includes(&mut buf, file_path, source_map, macros, handler, visited, depth, &file_label)?;
    escapes::splice_escaped_newlines(&mut buf);

    buf.index = 0;
    let mut ctx = PdContext {
        macros,
        handler,
        file_label: &file_label,
    };
    directives::process_directives(&mut buf, &mut ctx, depth)?;

    Ok(buf.tokens)
}

/// Convenience entry point for an in-memory source with no real filesystem
/// location; `#include` specs are resolved relative to the current
/// directory since there is no real includer path.
pub fn preprocess_string(source: &str) -> Result<Vec<Token>, Error> {
    let mut source_map = SourceMap::new();
    let file_id = FileId::DUMMY;
    let tokens = armaclass_lex::lex_string(source)?;
    let mut macros = MacroTable::new();
    let handler = Handler::new();
    let mut visited = FxHashSet::default();
    preprocess(
        tokens,
        file_id,
        Path::new("."),
        &mut source_map,
        &mut macros,
        &handler,
        &mut visited,
        0,
    )
}

/// Reads, lexes, and preprocesses a file from disk.
pub fn preprocess_file(path: &Path) -> Result<Vec<Token>, Error> {
    let contents = std::fs::read_to_string(path)?;
    let mut source_map = SourceMap::new();
    let file_id = source_map.add(path.to_path_buf());
    let file_label = source_map.label(file_id);
    let tokens = armaclass_lex::Lexer::new(&contents, file_id, file_label).tokenize()?;
    let mut macros = MacroTable::new();
    let handler = Handler::new();
    let mut visited = FxHashSet::default();
    preprocess(tokens, file_id, path, &mut source_map, &mut macros, &handler, &mut visited, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn full_pipeline_strips_comments_and_expands_macros() {
        let src = "// header comment\n#define NAME value\nclass NAME {};";
        let tokens = preprocess_string(src).unwrap();
        assert_eq!(concat(&tokens), "\nclass value {};");
    }

    #[test]
    fn escaped_newline_allows_multiline_macro_body() {
        let src = "#define LONG a \\\nb\nLONG";
        let tokens = preprocess_string(src).unwrap();
        assert_eq!(concat(&tokens), "a b");
    }
}
