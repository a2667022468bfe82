// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Z80 assembly language front end.
//!
//! This crate contains the source analysis pipeline:
//! - Character cursor with bounded lookahead
//! - Lexical analysis (a state machine with token lookahead)
//! - Token classification (instructions, registers, conditions...)
//! - Parsing (one AST node per assembly line, coded diagnostics)
//!
//! The front end is designed for editors and linters, so it never stops at
//! the first error.

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{AssemblyLine, Expression, LineNode, Operand};
    pub use crate::source_analysis::{Diagnostic, ErrorCode, ParseResult, TokenLocation, parse};
}
