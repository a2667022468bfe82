// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Syntax error catalogue for the Z80 assembly parser.
//!
//! Every error the parser can report is a [`SyntaxError`] variant. Each
//! variant maps to a stable [`ErrorCode`] that tools can match on; the
//! message text is for humans and may change.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// Unexpected token at the end of the line.
    Z1001,
    /// A line cannot start with this token.
    Z1002,
    /// Expression or operand expected.
    Z1003,
    /// Identifier expected, or a label is required.
    Z1004,
    /// Closing `)` expected.
    Z1005,
    /// Closing `]` or `}}` expected.
    Z1006,
    /// Comma expected.
    Z1007,
    /// Invalid first operand.
    Z1008,
    /// Invalid second operand.
    Z1009,
    /// Invalid operand for a single-operand instruction.
    Z1010,
    /// Operand list expected.
    Z1011,
    /// Invalid or missing second operand.
    Z1012,
    /// Unrecognized lexeme.
    Z1013,
    /// Numeric literal out of range.
    Z1014,
    /// `=` or `to` expected in a `for` statement.
    Z1015,
}

impl ErrorCode {
    /// Returns the stable string form of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Z1001 => "Z1001",
            Self::Z1002 => "Z1002",
            Self::Z1003 => "Z1003",
            Self::Z1004 => "Z1004",
            Self::Z1005 => "Z1005",
            Self::Z1006 => "Z1006",
            Self::Z1007 => "Z1007",
            Self::Z1008 => "Z1008",
            Self::Z1009 => "Z1009",
            Self::Z1010 => "Z1010",
            Self::Z1011 => "Z1011",
            Self::Z1012 => "Z1012",
            Self::Z1013 => "Z1013",
            Self::Z1014 => "Z1014",
            Self::Z1015 => "Z1015",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntax error found while parsing an assembly line.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("unexpected token '{0}' at the end of the line")]
    #[diagnostic(code(Z1001))]
    TrailingToken(EcoString),

    #[error("a line cannot start with '{0}'")]
    #[diagnostic(code(Z1002))]
    InvalidLineStart(EcoString),

    #[error("expression expected")]
    #[diagnostic(code(Z1003))]
    ExpressionExpected,

    #[error("operand expected")]
    #[diagnostic(code(Z1003))]
    OperandExpected,

    #[error("expression nesting is too deep")]
    #[diagnostic(code(Z1003), help("split the expression using intermediate symbols"))]
    NestingTooDeep,

    #[error("identifier expected")]
    #[diagnostic(code(Z1004))]
    IdentifierExpected,

    #[error("'{0}' requires a label")]
    #[diagnostic(code(Z1004))]
    LabelRequired(EcoString),

    #[error("string literal expected")]
    #[diagnostic(code(Z1003))]
    StringExpected,

    #[error("'(' expected")]
    #[diagnostic(code(Z1005))]
    OpeningParenExpected,

    #[error("')' expected")]
    #[diagnostic(code(Z1005))]
    ClosingParenExpected,

    #[error("']' expected")]
    #[diagnostic(code(Z1006))]
    ClosingBracketExpected,

    #[error("'}}}}' expected")]
    #[diagnostic(code(Z1006))]
    ClosingDoubleBraceExpected,

    #[error("',' expected")]
    #[diagnostic(code(Z1007))]
    CommaExpected,

    #[error("':' expected in the conditional expression")]
    #[diagnostic(code(Z1007))]
    ColonExpected,

    #[error("invalid first operand for '{0}'")]
    #[diagnostic(code(Z1008))]
    InvalidFirstOperand(EcoString),

    #[error("invalid second operand for '{0}'")]
    #[diagnostic(code(Z1009))]
    InvalidSecondOperand(EcoString),

    #[error("'{0}' expects a single valid operand")]
    #[diagnostic(code(Z1010))]
    InvalidSingleOperand(EcoString),

    #[error("'{0}' expects operands")]
    #[diagnostic(code(Z1011))]
    OperandsExpected(EcoString),

    #[error("invalid or missing second operand for '{0}'")]
    #[diagnostic(code(Z1012))]
    SecondOperandExpected(EcoString),

    #[error("unrecognized lexeme '{0}'")]
    #[diagnostic(code(Z1013))]
    UnrecognizedLexeme(EcoString),

    #[error("literal '{0}' is out of range")]
    #[diagnostic(code(Z1014))]
    LiteralOutOfRange(EcoString),

    #[error("'{0}' expected in the for statement")]
    #[diagnostic(code(Z1015))]
    ForKeywordExpected(&'static str),
}

impl SyntaxError {
    /// Returns the stable code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::TrailingToken(_) => ErrorCode::Z1001,
            Self::InvalidLineStart(_) => ErrorCode::Z1002,
            Self::ExpressionExpected
            | Self::OperandExpected
            | Self::NestingTooDeep
            | Self::StringExpected => ErrorCode::Z1003,
            Self::IdentifierExpected | Self::LabelRequired(_) => ErrorCode::Z1004,
            Self::OpeningParenExpected | Self::ClosingParenExpected => ErrorCode::Z1005,
            Self::ClosingBracketExpected | Self::ClosingDoubleBraceExpected => ErrorCode::Z1006,
            Self::CommaExpected | Self::ColonExpected => ErrorCode::Z1007,
            Self::InvalidFirstOperand(_) => ErrorCode::Z1008,
            Self::InvalidSecondOperand(_) => ErrorCode::Z1009,
            Self::InvalidSingleOperand(_) => ErrorCode::Z1010,
            Self::OperandsExpected(_) => ErrorCode::Z1011,
            Self::SecondOperandExpected(_) => ErrorCode::Z1012,
            Self::UnrecognizedLexeme(_) => ErrorCode::Z1013,
            Self::LiteralOutOfRange(_) => ErrorCode::Z1014,
            Self::ForKeywordExpected(_) => ErrorCode::Z1015,
        }
    }
}
