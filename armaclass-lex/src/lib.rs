//! Lexical analysis for the class/config dialect.
//!
//! Turns a UTF-8 source buffer into an ordered [`Token`] stream. Whitespace,
//! newlines and comment markers are preserved as tokens rather than
//! discarded — stripping them is the preprocessor's job (`armaclass-pp`),
//! not the lexer's, because the preprocessor needs to see exact column
//! positions and comment boundaries to do its own token-range surgery.
//!
//! The scan is a single forward pass over a [`Cursor`]. Structural
//! punctuation maps directly to a [`TokenKind`]; a handful of characters
//! need one character of lookahead to disambiguate (`-` before a digit is a
//! negative number, `/` before `*` opens a block comment, `#` before a
//! directive keyword names that keyword, `#` before `#` pastes).

pub mod cursor;
pub mod token;

use armaclass_util::span::{FileId, Span};
use armaclass_util::Error;

use cursor::Cursor;
pub use token::{Token, TokenKind};

/// Characters, beyond alphanumerics, that may continue a [`TokenKind::Word`]
/// once it has started. Matches the dialect's looser identifier charset
/// (config keys like `class.displayName` or `weapon_AK47!` are valid words).
const WORD_CONTINUATION: &str = "._!%&?";

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    file_id: FileId,
    file_label: String,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file_id: FileId, file_label: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(source),
            file_id,
            file_label: file_label.into(),
        }
    }

    fn span_at(&self, line: u32, column: u32) -> Span {
        Span::new(self.file_id, line, column)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while !self.cursor.is_at_end() {
            let start_line = self.cursor.line();
            let start_column = self.cursor.column();
            let c = self.cursor.current_char();
            self.cursor.advance();

            match c {
                '-' if self.cursor.current_char().is_ascii_digit() => {
                    let mut text = String::from('-');
                    self.consume_number_body(&mut text);
                    tokens.push(Token::new(
                        TokenKind::Number,
                        text,
                        self.span_at(start_line, start_column),
                    ));
                }
                '-' => tokens.push(Token::canonical(
                    TokenKind::Minus,
                    self.span_at(start_line, start_column),
                )),

                '*' if self.cursor.current_char() == '/' => {
                    self.cursor.advance();
                    tokens.push(Token::canonical(
                        TokenKind::MCommentEnd,
                        self.span_at(start_line, start_column),
                    ));
                }
                '*' => tokens.push(Token::canonical(
                    TokenKind::Mul,
                    self.span_at(start_line, start_column),
                )),

                '/' if self.cursor.current_char() == '/' => {
                    self.cursor.advance();
                    tokens.push(Token::canonical(
                        TokenKind::Comment,
                        self.span_at(start_line, start_column),
                    ));
                }
                '/' if self.cursor.current_char() == '*' => {
                    self.cursor.advance();
                    tokens.push(Token::canonical(
                        TokenKind::MCommentStart,
                        self.span_at(start_line, start_column),
                    ));
                }
                '/' => tokens.push(Token::canonical(
                    TokenKind::Div,
                    self.span_at(start_line, start_column),
                )),

                '#' if self.cursor.current_char() == '#' => {
                    self.cursor.advance();
                    tokens.push(Token::canonical(
                        TokenKind::DoubleHash,
                        self.span_at(start_line, start_column),
                    ));
                }
                '#' => {
                    if let Some(kind) = self.match_directive_keyword() {
                        tokens.push(Token::canonical(kind, self.span_at(start_line, start_column)));
                    } else {
                        tokens.push(Token::canonical(
                            TokenKind::Hash,
                            self.span_at(start_line, start_column),
                        ));
                    }
                }

                c if c.is_ascii_digit() => {
                    let mut text = String::from(c);
                    self.consume_number_body(&mut text);
                    tokens.push(Token::new(
                        TokenKind::Number,
                        text,
                        self.span_at(start_line, start_column),
                    ));
                }

                c if c.is_alphabetic() => {
                    let mut text = String::from(c);
                    while !self.cursor.is_at_end() {
                        let next = self.cursor.current_char();
                        if next.is_ascii_digit()
                            || next.is_alphabetic()
                            || WORD_CONTINUATION.contains(next)
                        {
                            text.push(next);
                            self.cursor.advance();
                        } else {
                            break;
                        }
                    }
                    if text == "class" {
                        tokens.push(Token::canonical(
                            TokenKind::KeywordClass,
                            self.span_at(start_line, start_column),
                        ));
                    } else {
                        tokens.push(Token::new(
                            TokenKind::Word,
                            text,
                            self.span_at(start_line, start_column),
                        ));
                    }
                }

                other => {
                    if let Some(kind) = single_char_kind(other) {
                        tokens.push(Token::canonical(kind, self.span_at(start_line, start_column)));
                    } else {
                        return Err(Error::lex(
                            other,
                            self.file_label.clone(),
                            self.span_at(start_line, start_column),
                        ));
                    }
                }
            }
        }

        Ok(tokens)
    }

    fn consume_number_body(&mut self, text: &mut String) {
        while !self.cursor.is_at_end() {
            let next = self.cursor.current_char();
            if next.is_ascii_digit() || next == '.' {
                text.push(next);
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    /// After consuming a lone `#`, checks whether the next up-to-7
    /// characters complete one of the recognized directive keywords. On a
    /// match, consumes the remainder of the keyword and returns its kind.
    fn match_directive_keyword(&mut self) -> Option<TokenKind> {
        let lookahead = self.cursor.peek_str(7);
        let candidate = format!("#{lookahead}");
        for &kind in TokenKind::DIRECTIVE_KEYWORDS {
            let lexeme = kind.lexeme().expect("directive keywords have a lexeme");
            if candidate.starts_with(lexeme) {
                self.cursor.advance_n(lexeme.len() - 1);
                return Some(kind);
            }
        }
        None
    }
}

fn single_char_kind(c: char) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match c {
        '{' => LCurly,
        '}' => RCurly,
        '(' => LRound,
        ')' => RRound,
        '[' => LSquare,
        ']' => RSquare,
        ';' => Semicolon,
        ':' => Colon,
        '=' => Equals,
        '+' => Plus,
        '\\' => Backslash,
        '<' => Less,
        '>' => Greater,
        '\n' => Newline,
        '\t' => Tab,
        ' ' => Whitespace,
        '\'' => Quote,
        '"' => DoubleQuotes,
        ',' => Comma,
        '$' => Dollar,
        '!' => Exclamation,
        '_' => Underscore,
        '.' => Dot,
        '&' => And,
        '%' => Percent,
        '?' => Question,
        _ => return None,
    })
}

/// Convenience entry point: lex an in-memory string labeled `<STRING>`.
pub fn lex_string(source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(source, FileId::DUMMY, "<STRING>").tokenize()
}
