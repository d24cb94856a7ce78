//! Recursive-descent parsing of a preprocessed token stream into an AST.
//!
//! A stateful cursor walks the tokens once; each grammar production is its
//! own method, grounded in the same `token()`/`next()`/`expect()` shape
//! used by this workspace's other hand-rolled parsers. Class bodies nest by
//! saving and swapping out the output stack rather than recursing into a
//! fresh `Parser` instance, so `previous_stack` survives a panic-free
//! round trip through nested class definitions.

pub mod ast;

use armaclass_lex::{Token, TokenKind};
use armaclass_util::diagnostic::Handler;
use armaclass_util::span::Span;
use armaclass_util::Error;

pub use ast::{Ast, Node};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    index: usize,
    stack: Vec<Node>,
    file_label: String,
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, file_label: impl Into<String>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            index: 0,
            stack: Vec::new(),
            file_label: file_label.into(),
            handler,
        }
    }

    fn has_current(&self) -> bool {
        self.index < self.tokens.len()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn current_span(&self) -> Span {
        self.current().map(|t| t.span).unwrap_or_default()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn expect(&self, kind: TokenKind) -> Result<&Token, Error> {
        match self.current() {
            Some(t) if t.kind == kind => Ok(t),
            Some(t) => Err(Error::unexpected_token(
                format!("{kind:?}"),
                format!("{:?}", t.kind),
                &self.file_label,
                t.span,
            )),
            None => Err(Error::missing_token(format!("{kind:?}"), None)),
        }
    }

    fn expect_one_of(&self, kinds: &[TokenKind]) -> Result<&Token, Error> {
        match self.current() {
            Some(t) if kinds.contains(&t.kind) => Ok(t),
            Some(t) => Err(Error::unexpected_token(
                format!("{kinds:?}"),
                format!("{:?}", t.kind),
                &self.file_label,
                t.span,
            )),
            None => Err(Error::missing_token(format!("{kinds:?}"), None)),
        }
    }

    fn skip_whitespace(&mut self, include_newlines: bool) {
        while let Some(kind) = self.current_kind() {
            let skip = matches!(kind, TokenKind::Whitespace | TokenKind::Tab)
                || (include_newlines && kind == TokenKind::Newline);
            if !skip {
                break;
            }
            self.advance();
        }
    }

    fn parse_string_literal(&mut self) -> Result<Node, Error> {
        let delimiter = self.expect_one_of(&[TokenKind::DoubleQuotes, TokenKind::Quote])?.kind;
        let span = self.current_span();
        self.advance();

        let mut value = String::new();
        while let Some(tok) = self.current() {
            if tok.kind == delimiter {
                self.advance();
                return Ok(Node::StringLiteral(ast::StringLiteral { value, span }));
            }
            value.push_str(&tok.text);
            self.advance();
        }

        Err(Error::missing_token(format!("{delimiter:?}"), None))
    }

    fn parse_constant(&mut self) -> Result<Node, Error> {
        let tok = self.expect(TokenKind::Number)?.clone();
        self.advance();
        let value = if tok.text.contains('.') {
            ast::Number::Float(tok.text.parse().map_err(|_| {
                Error::preprocess(format!("invalid numeric literal {:?}", tok.text), &self.file_label, tok.span)
            })?)
        } else {
            ast::Number::Int(tok.text.parse().map_err(|_| {
                Error::preprocess(format!("invalid numeric literal {:?}", tok.text), &self.file_label, tok.span)
            })?)
        };
        Ok(Node::Constant(ast::Constant { value, span: tok.span }))
    }

    fn parse_identifier(&mut self) -> Result<Node, Error> {
        let tok = self.expect(TokenKind::Word)?.clone();
        self.advance();
        Ok(Node::Identifier(ast::Identifier {
            name: tok.text,
            span: tok.span,
        }))
    }

    fn parse_array_declaration(&mut self) -> Result<Node, Error> {
        let span = self.expect(TokenKind::LSquare)?.span;
        self.advance();
        self.expect(TokenKind::RSquare)?;
        self.advance();

        let identifier = match self.stack.pop() {
            Some(Node::Identifier(id)) => id,
            other => {
                return Err(Error::unexpected_statement(
                    "Identifier",
                    format!("{other:?}"),
                    &self.file_label,
                    span,
                ))
            }
        };
        Ok(Node::ArrayDeclaration(ast::ArrayDeclaration { identifier, span }))
    }

    fn parse_assignment(&mut self) -> Result<Node, Error> {
        let span = self.expect(TokenKind::Equals)?.span;
        self.advance();

        let left = match self.stack.pop() {
            Some(n @ Node::Identifier(_)) | Some(n @ Node::ArrayDeclaration(_)) => n,
            other => {
                return Err(Error::unexpected_statement(
                    "Identifier or ArrayDeclaration",
                    format!("{other:?}"),
                    &self.file_label,
                    span,
                ))
            }
        };

        self.skip_whitespace(false);
        let right = match self.current_kind() {
            Some(TokenKind::Word) => self.parse_identifier()?,
            Some(TokenKind::Quote) | Some(TokenKind::DoubleQuotes) => self.parse_string_literal()?,
            Some(TokenKind::Number) => self.parse_constant()?,
            Some(TokenKind::LCurly) => self.parse_array()?,
            other => {
                return Err(Error::unexpected_statement(
                    "Identifier, StringLiteral, Constant, or Array",
                    format!("{other:?}"),
                    &self.file_label,
                    self.current_span(),
                ))
            }
        };

        self.expect(TokenKind::Semicolon)?;
        self.advance();
        Ok(Node::Assignment(ast::Assignment {
            left: Box::new(left),
            right: Box::new(right),
            span,
        }))
    }

    fn parse_array(&mut self) -> Result<Node, Error> {
        let span = self.expect(TokenKind::LCurly)?.span;
        self.advance();

        let mut children = Vec::new();
        loop {
            self.skip_whitespace(true);
            match self.current_kind() {
                Some(TokenKind::RCurly) | None => break,
                Some(TokenKind::Number) => children.push(self.parse_constant()?),
                Some(TokenKind::Quote) | Some(TokenKind::DoubleQuotes) => children.push(self.parse_string_literal()?),
                Some(TokenKind::Word) => children.push(self.parse_identifier()?),
                Some(TokenKind::LCurly) => children.push(self.parse_array()?),
                _ => {
                    return Err(Error::unexpected_statement(
                        "Constant, StringLiteral, Identifier, or Array",
                        format!("{:?}", self.current_kind()),
                        &self.file_label,
                        self.current_span(),
                    ))
                }
            }

            self.skip_whitespace(true);
            self.expect_one_of(&[TokenKind::Comma, TokenKind::RCurly])?;
            if self.current_kind() == Some(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }

        self.expect(TokenKind::RCurly)?;
        self.advance();
        Ok(Node::Array(ast::Array { children, span }))
    }

    fn parse_class_definition(&mut self) -> Result<Node, Error> {
        let span = self.expect(TokenKind::KeywordClass)?.span;
        self.advance();
        self.skip_whitespace(false);

        let name = self.expect(TokenKind::Word)?.text.clone();
        self.advance();
        self.skip_whitespace(false);

        let mut parent = None;
        if self.current_kind() == Some(TokenKind::Colon) {
            self.advance();
            self.skip_whitespace(false);
            parent = Some(self.expect(TokenKind::Word)?.text.clone());
            self.advance();
            self.skip_whitespace(false);
        }

        self.expect(TokenKind::LCurly)?;
        let opener_span = self.current_span();
        self.advance();

        let previous_stack = std::mem::take(&mut self.stack);
        while self.has_current() && self.current_kind() != Some(TokenKind::RCurly) {
            if let Some(child) = self.parse_next()? {
                self.stack.push(child);
            }
        }
        let body = std::mem::replace(&mut self.stack, previous_stack);

        if self.current_kind() != Some(TokenKind::RCurly) {
            return Err(Error::missing_token("RCurly", Some(format!("{:?}", opener_span))));
        }
        self.advance();
        self.expect(TokenKind::Semicolon)?;
        self.advance();

        Ok(Node::ClassDefinition(ast::ClassDefinition { name, parent, body, span }))
    }

    /// Parses the construct at the cursor, or skips one token and returns
    /// `None` for whitespace, newlines, and anything this grammar doesn't
    /// recognize (reported to the handler as a warning rather than
    /// aborting the parse).
    fn parse_next(&mut self) -> Result<Option<Node>, Error> {
        let kind = match self.current_kind() {
            Some(k) => k,
            None => return Ok(None),
        };

        match kind {
            TokenKind::DoubleQuotes | TokenKind::Quote => self.parse_string_literal().map(Some),
            TokenKind::KeywordClass => self.parse_class_definition().map(Some),
            TokenKind::Word => self.parse_identifier().map(Some),
            TokenKind::LSquare => self.parse_array_declaration().map(Some),
            TokenKind::LCurly => self.parse_array().map(Some),
            TokenKind::Equals => self.parse_assignment().map(Some),
            TokenKind::Whitespace | TokenKind::Tab | TokenKind::Newline => {
                self.advance();
                Ok(None)
            }
            TokenKind::KeywordInclude => Err(Error::unexpected_statement(
                "no #include (the preprocessor resolves these before parsing)",
                "#include",
                &self.file_label,
                self.current_span(),
            )),
            TokenKind::Comment | TokenKind::MCommentStart | TokenKind::MCommentEnd => {
                Err(Error::unexpected_statement(
                    "no comment token (the preprocessor strips these before parsing)",
                    format!("{kind:?}"),
                    &self.file_label,
                    self.current_span(),
                ))
            }
            other => {
                self.handler
                    .warn(format!("unexpected token {other:?} ignored during parse"), self.current_span());
                self.advance();
                Ok(None)
            }
        }
    }

    pub fn parse(mut self) -> Result<Ast, Error> {
        while self.has_current() {
            if let Some(node) = self.parse_next()? {
                self.stack.push(node);
            }
        }
        Ok(self.stack)
    }
}

pub fn parse_tokens(tokens: Vec<Token>, file_label: impl Into<String>, handler: &Handler) -> Result<Ast, Error> {
    Parser::new(tokens, file_label, handler).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use armaclass_lex::lex_string;

    fn parse(src: &str) -> Ast {
        let tokens = lex_string(src).unwrap();
        let handler = Handler::new();
        parse_tokens(tokens, "<STRING>", &handler).unwrap()
    }

    #[test]
    fn parses_simple_assignment() {
        let ast = parse("value = 5;");
        assert_eq!(ast.len(), 1);
        match &ast[0] {
            Node::Assignment(a) => {
                assert!(matches!(*a.left, Node::Identifier(ref id) if id.name == "value"));
                assert!(matches!(*a.right, Node::Constant(ast::Constant { value: ast::Number::Int(5), .. })));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_string_assignment() {
        let ast = parse("name = \"hello\";");
        match &ast[0] {
            Node::Assignment(a) => {
                assert!(matches!(*a.right, Node::StringLiteral(ref s) if s.value == "hello"));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_array_assignment() {
        let ast = parse("items[] = {1,2,3};");
        match &ast[0] {
            Node::Assignment(a) => {
                assert!(matches!(*a.left, Node::ArrayDeclaration(ref d) if d.identifier.name == "items"));
                match &*a.right {
                    Node::Array(arr) => assert_eq!(arr.children.len(), 3),
                    other => panic!("expected array, got {other:?}"),
                }
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_class_with_parent() {
        let ast = parse("class Child : Parent { value = 1; };");
        match &ast[0] {
            Node::ClassDefinition(c) => {
                assert_eq!(c.name, "Child");
                assert_eq!(c.parent.as_deref(), Some("Parent"));
                assert_eq!(c.body.len(), 1);
            }
            other => panic!("expected class definition, got {other:?}"),
        }
    }

    #[test]
    fn missing_closing_brace_is_an_error() {
        let tokens = lex_string("class A { ").unwrap();
        let handler = Handler::new();
        let err = parse_tokens(tokens, "<STRING>", &handler).unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));
    }

    #[test]
    fn leftover_include_is_rejected() {
        let tokens = lex_string("#include \"x.hpp\"").unwrap();
        let handler = Handler::new();
        let err = parse_tokens(tokens, "<STRING>", &handler).unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatement { .. }));
    }

    #[test]
    fn float_constant_parses() {
        let ast = parse("v = 1.5;");
        match &ast[0] {
            Node::Assignment(a) => {
                assert!(matches!(*a.right, Node::Constant(ast::Constant { value: ast::Number::Float(f), .. }) if (f - 1.5).abs() < f64::EPSILON));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }
}
