//! Top-level entry points: read/lex/preprocess/parse a class/config source,
//! or emit tokens and AST nodes back to text.
//!
//! This crate is thin on purpose — `armaclass-lex`, `armaclass-pp`, and
//! `armaclass-parse` hold the actual logic. What lives here is the
//! convenience surface a caller reaches for first: a file or string in,
//! an `Ast` out, with an [`Options`] escape hatch for callers who want raw
//! tokens without preprocessing.

use std::path::Path;

pub use armaclass_lex::{lex_string, Lexer, Token, TokenKind};
pub use armaclass_parse::ast::{self, Node};
pub use armaclass_parse::Ast;
pub use armaclass_util::diagnostic::{Diagnostic, Handler, Level};
pub use armaclass_util::span::{FileId, SourceMap, Span};
pub use armaclass_util::Error;

/// Controls how far a source is run through the pipeline before parsing.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// When `false`, the raw lexed token stream is parsed directly, with
    /// comments, includes, and macros left untouched. Useful for exercising
    /// the parser in isolation.
    pub preprocess: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { preprocess: true }
    }
}

/// Lexes, and (unless disabled in `options`) preprocesses, then parses `text`.
pub fn parse_string_with_options(text: &str, options: Options) -> Result<Ast, Error> {
    let tokens = if options.preprocess {
        armaclass_pp::preprocess_string(text)?
    } else {
        lex_string(text)?
    };
    let handler = Handler::new();
    armaclass_parse::parse_tokens(tokens, "<STRING>", &handler)
}

/// Lexes, preprocesses, and parses `text`, labeled `<STRING>` in errors.
pub fn parse_string(text: &str) -> Result<Ast, Error> {
    parse_string_with_options(text, Options::default())
}

/// Reads, lexes, and (unless disabled in `options`) preprocesses, then
/// parses the file at `path`.
pub fn parse_file_with_options(path: impl AsRef<Path>, options: Options) -> Result<Ast, Error> {
    let path = path.as_ref();
    let tokens = if options.preprocess {
        armaclass_pp::preprocess_file(path)?
    } else {
        let contents = std::fs::read_to_string(path)?;
        let mut source_map = SourceMap::new();
        let file_id = source_map.add(path.to_path_buf());
        Lexer::new(&contents, file_id, source_map.label(file_id)).tokenize()?
    };
    let handler = Handler::new();
    armaclass_parse::parse_tokens(tokens, path.display().to_string(), &handler)
}

/// Reads, lexes, preprocesses, and parses the file at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Ast, Error> {
    parse_file_with_options(path, Options::default())
}

/// Reads and lexes the file at `path` without preprocessing or parsing.
pub fn lex_file(path: impl AsRef<Path>) -> Result<Vec<Token>, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let mut source_map = SourceMap::new();
    let file_id = source_map.add(path.to_path_buf());
    Lexer::new(&contents, file_id, source_map.label(file_id)).tokenize()
}

/// Concatenates each token's text, reproducing the source the tokens were
/// lexed from exactly when no token has been rewritten.
pub fn emit_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Concatenates each top-level AST node's `Display` rendering.
pub fn emit_ast(ast: &[Node]) -> String {
    ast.iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_simple_config_from_string() {
        let ast = parse_string("class Foo { x = 1; };").unwrap();
        assert_eq!(ast.len(), 1);
        assert!(matches!(&ast[0], Node::ClassDefinition(c) if c.name == "Foo"));
    }

    #[test]
    fn macro_expands_before_parse() {
        let src = indoc! {"
            #define TEST test
            class TEST {};
        "};
        let ast = parse_string(src).unwrap();
        assert!(matches!(&ast[0], Node::ClassDefinition(c) if c.name == "test"));
    }

    #[test]
    fn disabling_preprocess_leaves_macro_name_literal() {
        let src = "#define TEST test\nclass TEST {};";
        let ast = parse_string_with_options(src, Options { preprocess: false }).unwrap();
        // no macro expansion ran, so the class keeps its literal, unexpanded name
        assert!(ast
            .iter()
            .any(|n| matches!(n, Node::ClassDefinition(c) if c.name == "TEST")));
    }

    #[test]
    fn parse_file_reads_and_parses_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.hpp");
        fs::write(&path, "class Foo { x = 1; };").unwrap();

        let ast = parse_file(&path).unwrap();
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn emit_tokens_round_trips_comment_free_source() {
        let src = "class Foo {\n  x = 1;\n};";
        let tokens = lex_string(src).unwrap();
        assert_eq!(emit_tokens(&tokens), src);
    }

    #[test]
    fn emit_ast_renders_parsed_class() {
        let ast = parse_string("class Foo { x = 1; };").unwrap();
        let rendered = emit_ast(&ast);
        assert!(rendered.starts_with("class Foo {"));
        assert!(rendered.contains("x = 1;"));
    }
}
