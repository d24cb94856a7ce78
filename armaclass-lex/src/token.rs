//! Token kinds and the `Token` record produced by the lexer.

use std::fmt;

use armaclass_util::span::Span;

/// Every kind of token the lexer can produce.
///
/// Structural/operator/keyword kinds carry no payload — their text is
/// always their canonical lexeme ([`TokenKind::lexeme`]). `Word` and
/// `Number` are the only kinds whose [`Token::text`] varies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LCurly,
    RCurly,
    LRound,
    RRound,
    LSquare,
    RSquare,
    Semicolon,
    Colon,
    Equals,
    Plus,
    Minus,
    Mul,
    Div,
    Backslash,
    Less,
    Greater,
    Hash,
    DoubleHash,
    Comment,
    MCommentStart,
    MCommentEnd,
    Newline,
    Tab,
    Whitespace,
    Quote,
    DoubleQuotes,
    Comma,
    Dollar,
    Exclamation,
    Underscore,
    Dot,
    And,
    Percent,
    Question,
    KeywordClass,
    KeywordInclude,
    KeywordIfdef,
    KeywordIfndef,
    KeywordElse,
    KeywordEndif,
    KeywordDefine,
    KeywordUndef,
    Word,
    Number,
}

impl TokenKind {
    /// The canonical text for kinds that don't carry a payload. `Word` and
    /// `Number` have no single canonical lexeme and return `None`.
    pub fn lexeme(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            LCurly => "{",
            RCurly => "}",
            LRound => "(",
            RRound => ")",
            LSquare => "[",
            RSquare => "]",
            Semicolon => ";",
            Colon => ":",
            Equals => "=",
            Plus => "+",
            Minus => "-",
            Mul => "*",
            Div => "/",
            Backslash => "\\",
            Less => "<",
            Greater => ">",
            Hash => "#",
            DoubleHash => "##",
            Comment => "//",
            MCommentStart => "/*",
            MCommentEnd => "*/",
            Newline => "\n",
            Tab => "\t",
            Whitespace => " ",
            Quote => "'",
            DoubleQuotes => "\"",
            Comma => ",",
            Dollar => "$",
            Exclamation => "!",
            Underscore => "_",
            Dot => ".",
            And => "&",
            Percent => "%",
            Question => "?",
            KeywordClass => "class",
            KeywordInclude => "#include",
            KeywordIfdef => "#ifdef",
            KeywordIfndef => "#ifndef",
            KeywordElse => "#else",
            KeywordEndif => "#endif",
            KeywordDefine => "#define",
            KeywordUndef => "#undef",
            Word | Number => return None,
        })
    }

    /// Directive keywords recognized after a lone `#`, ordered by lexeme
    /// length descending so a caller probing greedily finds the longest
    /// match first (`#ifndef` before `#ifdef`'s shared `#if` prefix, etc.
    /// — matters for a readable lookahead implementation, not for the
    /// original's "try each keyword, take first match" order since the
    /// keywords are pairwise non-prefixing except already-disjoint text).
    pub const DIRECTIVE_KEYWORDS: &'static [TokenKind] = &[
        TokenKind::KeywordInclude,
        TokenKind::KeywordIfdef,
        TokenKind::KeywordIfndef,
        TokenKind::KeywordElse,
        TokenKind::KeywordEndif,
        TokenKind::KeywordDefine,
        TokenKind::KeywordUndef,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "{self:?}"),
        }
    }
}

/// A single lexed token: its kind, its text (payload for `Word`/`Number`,
/// canonical lexeme otherwise) and the location it started at.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Construct a token whose text is its kind's canonical lexeme.
    pub fn canonical(kind: TokenKind, span: Span) -> Self {
        let text = kind
            .lexeme()
            .expect("canonical() requires a kind with a fixed lexeme")
            .to_string();
        Self { kind, text, span }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.span.line == other.span.line
            && self.span.column == other.span.column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_uses_kind_lexeme() {
        let tok = Token::canonical(TokenKind::LCurly, Span::DUMMY);
        assert_eq!(tok.text, "{");
    }

    #[test]
    fn equality_ignores_file_but_not_position() {
        let a = Token::new(TokenKind::Word, "foo", Span::new(Default::default(), 1, 1));
        let b = Token::new(TokenKind::Word, "foo", Span::new(Default::default(), 1, 1));
        assert_eq!(a, b);
        let c = Token::new(TokenKind::Word, "foo", Span::new(Default::default(), 1, 2));
        assert_ne!(a, c);
    }
}
