//! Pipeline error type.
//!
//! One `thiserror` enum covers all four fatal error kinds the lexer,
//! preprocessor and parser can raise, plus file I/O. Every variant carries
//! enough location information to point at the offending file/line/column.

use thiserror::Error;

use crate::span::Span;

/// The target a [`MissingToken`](Error::MissingToken) error was looking for,
/// and, if known, the opening token it would have closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingTokenTarget {
    pub target: String,
    pub opened_by: Option<String>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected character {ch:?} at {file}:{line}:{column}")]
    LexError {
        ch: char,
        file: String,
        line: u32,
        column: u32,
    },

    #[error("{message} at {file}:{line}:{column}")]
    PreprocessError {
        message: String,
        file: String,
        line: u32,
        column: u32,
    },

    #[error("expected token {expected} but got {actual} at {file}:{line}:{column}")]
    UnexpectedToken {
        expected: String,
        actual: String,
        file: String,
        line: u32,
        column: u32,
    },

    #[error("expected statement {expected} but got {actual} at {file}:{line}:{column}")]
    UnexpectedStatement {
        expected: String,
        actual: String,
        file: String,
        line: u32,
        column: u32,
    },

    #[error("reached end of file while looking for token {}{}", .target.target, .target.opened_by.as_deref().map(|o| format!(", closing {o}")).unwrap_or_default())]
    MissingToken { target: MissingTokenTarget },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn lex(ch: char, file: impl Into<String>, span: Span) -> Self {
        Error::LexError {
            ch,
            file: file.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn preprocess(message: impl Into<String>, file: impl Into<String>, span: Span) -> Self {
        Error::PreprocessError {
            message: message.into(),
            file: file.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn unexpected_token(
        expected: impl Into<String>,
        actual: impl Into<String>,
        file: impl Into<String>,
        span: Span,
    ) -> Self {
        Error::UnexpectedToken {
            expected: expected.into(),
            actual: actual.into(),
            file: file.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn unexpected_statement(
        expected: impl Into<String>,
        actual: impl Into<String>,
        file: impl Into<String>,
        span: Span,
    ) -> Self {
        Error::UnexpectedStatement {
            expected: expected.into(),
            actual: actual.into(),
            file: file.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn missing_token(target: impl Into<String>, opened_by: Option<String>) -> Self {
        Error::MissingToken {
            target: MissingTokenTarget {
                target: target.into(),
                opened_by,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_without_opener() {
        let err = Error::missing_token("R_CURLY", None);
        assert_eq!(
            err.to_string(),
            "reached end of file while looking for token R_CURLY"
        );
    }

    #[test]
    fn missing_token_with_opener() {
        let err = Error::missing_token("R_CURLY", Some("L_CURLY".to_string()));
        assert_eq!(
            err.to_string(),
            "reached end of file while looking for token R_CURLY, closing L_CURLY"
        );
    }

    #[test]
    fn unexpected_token_message() {
        let err = Error::unexpected_token("SEMICOLON", "EQUALS", "a.hpp", Span::new(Default::default(), 3, 7));
        assert_eq!(
            err.to_string(),
            "expected token SEMICOLON but got EQUALS at a.hpp:3:7"
        );
    }
}
