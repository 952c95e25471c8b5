use thiserror::Error;

use crate::token::{Token, TokenKind};

/// A character sequence the lexer could not turn into a token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] error: {message}")]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

/// A syntax error, reported against the token where parsing went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] error{at}: {message}", line = .token.line, at = location(.token))]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// An error raised while evaluating, carrying the operator or name token
/// that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}\n[line {line}]", line = .token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ScanError {
            line,
            message: message.into(),
        }
    }
}

impl ParseError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        ParseError {
            token: token.clone(),
            message: message.into(),
        }
    }
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError {
            token: token.clone(),
            message: message.into(),
        }
    }
}

fn location(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scan_error_format() {
        let err = ScanError::new(7, "unexpected character '@'.");
        assert_eq!(err.to_string(), "[line 7] error: unexpected character '@'.");
    }

    #[test]
    fn parse_error_points_at_lexeme_or_end() {
        let semicolon = Token::new(TokenKind::Semicolon, ";", None, 2);
        let eof = Token::new(TokenKind::Eof, "", None, 3);

        assert_eq!(
            ParseError::new(&semicolon, "expect expression.").to_string(),
            "[line 2] error at ';': expect expression."
        );
        assert_eq!(
            ParseError::new(&eof, "expect ';' after value.").to_string(),
            "[line 3] error at end: expect ';' after value."
        );
    }

    #[test]
    fn runtime_error_format() {
        let plus = Token::new(TokenKind::Plus, "+", None, 4);
        let err = RuntimeError::new(&plus, "operands must be two numbers or two strings.");
        assert_eq!(
            err.to_string(),
            "operands must be two numbers or two strings.\n[line 4]"
        );
    }
}
