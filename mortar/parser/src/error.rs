//! This file contains the error type that is used for diagnostics

use core::fmt;

use mortar_error::{display_expected_of_any, CompileError, CompileErrorCode};
use smol_str::SmolStr;

use crate::token::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected token '{got}'")]
    UnexpectedToken {
        got: SmolStr,
        line: u32,
        expected: Vec<ExpectedItem>,
    },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput { line: u32 },
}

impl ParseErrorKind {
    pub fn line(&self) -> u32 {
        match self {
            ParseErrorKind::UnexpectedToken { line, .. }
            | ParseErrorKind::UnexpectedEndOfInput { line } => *line,
        }
    }

    /// Converts this error into the diagnostic that is reported by the compiler
    pub fn to_compile_error(&self, file: &str) -> CompileError {
        match self {
            ParseErrorKind::UnexpectedToken {
                got,
                line,
                expected,
            } => CompileError::new(CompileErrorCode::UnexpectedToken, file, *line).with_message(
                format!("'{}': {}", got.escape_debug(), display_expected_of_any(expected)),
            ),
            ParseErrorKind::UnexpectedEndOfInput { line } => {
                CompileError::new(CompileErrorCode::UnexpectedEndOfInput, file, *line)
                    .with_message("expected '}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedItem {
    Statement,
    Value,
    TokenKind(TokenKind),
}

impl From<TokenKind> for ExpectedItem {
    fn from(kind: TokenKind) -> Self {
        Self::TokenKind(kind)
    }
}

impl fmt::Display for ExpectedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedItem::Statement => f.write_str("statement"),
            ExpectedItem::Value => f.write_str("value"),
            ExpectedItem::TokenKind(kind) => fmt::Display::fmt(kind, f),
        }
    }
}
