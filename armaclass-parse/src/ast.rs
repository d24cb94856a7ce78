//! AST node definitions for the class/config dialect.
//!
//! Each node keeps only the data an emitter or consumer actually needs —
//! a value plus a [`Span`] for diagnostics — rather than the full token
//! slice each node spanned, since the point-location [`Span`] model already
//! gives callers everything the original per-node token lists were for.

use armaclass_util::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: Number,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDeclaration {
    pub identifier: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub children: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: Span,
}

/// Kept for AST-shape completeness only. This parser never constructs one:
/// a surviving `#include` token is always an internal error (the
/// preprocessor is expected to have resolved every include already), so
/// `parse_next` rejects it outright instead of producing this variant.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeStatement {
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub name: String,
    pub parent: Option<String>,
    pub body: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    StringLiteral(StringLiteral),
    Constant(Constant),
    Identifier(Identifier),
    ArrayDeclaration(ArrayDeclaration),
    Array(Array),
    Assignment(Assignment),
    IncludeStatement(IncludeStatement),
    ClassDefinition(ClassDefinition),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::StringLiteral(n) => n.span,
            Node::Constant(n) => n.span,
            Node::Identifier(n) => n.span,
            Node::ArrayDeclaration(n) => n.span,
            Node::Array(n) => n.span,
            Node::Assignment(n) => n.span,
            Node::IncludeStatement(n) => n.span,
            Node::ClassDefinition(n) => n.span,
        }
    }
}

pub type Ast = Vec<Node>;

impl std::fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::fmt::Display for ArrayDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[]", self.identifier.name)
    }
}

impl std::fmt::Display for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let children: Vec<String> = self.children.iter().map(|c| c.to_string()).collect();
        write!(f, "{{{}}}", children.join(","))
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {};", self.left, self.right)
    }
}

impl std::fmt::Display for IncludeStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#include \"{}\"", self.path)
    }
}

impl std::fmt::Display for ClassDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(parent) = &self.parent {
            write!(f, " : {parent}")?;
        }
        writeln!(f, " {{")?;
        for child in &self.body {
            writeln!(f, "{child}")?;
        }
        write!(f, "}};")
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::StringLiteral(n) => write!(f, "{n}"),
            Node::Constant(n) => write!(f, "{n}"),
            Node::Identifier(n) => write!(f, "{n}"),
            Node::ArrayDeclaration(n) => write!(f, "{n}"),
            Node::Array(n) => write!(f, "{n}"),
            Node::Assignment(n) => write!(f, "{n}"),
            Node::IncludeStatement(n) => write!(f, "{n}"),
            Node::ClassDefinition(n) => write!(f, "{n}"),
        }
    }
}
