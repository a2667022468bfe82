// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Z80 assembly source code.
//!
//! This module contains the character cursor, the lexer, token
//! classification and the parser.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each token
//! carries its text, its [`TokenType`] and its [`TokenLocation`]. Whitespace
//! and comments are tokens too; callers choose per request whether to see
//! them.
//!
//! ```
//! use z80asm_core::source_analysis::{Lexer, TokenType};
//!
//! let tokens: Vec<_> = Lexer::new("ld a,b").collect();
//! assert_eq!(tokens.len(), 5); // ld, ws, a, comma, b
//! assert_eq!(tokens[0].token_type(), TokenType::Ld);
//! ```
//!
//! Keywords are case-insensitive and come from a fixed table (see
//! [`resolve_keyword`]). The [`traits`] function classifies every token type
//! as an instruction, register, condition, expression start and so on.
//!
//! # Parsing
//!
//! The [`parse`] function converts source text into
//! [`AssemblyLine`](crate::ast::AssemblyLine)s. Expression precedence uses
//! Pratt parsing (see the [`parser`] module docs for the table).
//!
//! # Error Handling
//!
//! The lexer never fails: malformed input becomes [`TokenType::Unknown`]
//! tokens. The parser reports one coded [`Diagnostic`] per failed line and
//! resumes on the next line. [`SyntaxError`] lists every error with its
//! stable [`ErrorCode`] and miette integration.

mod cursor;
mod error;
mod keywords;
mod lexer;
mod location;
pub mod parser;
mod phase;
mod token;
mod traits;


pub use cursor::{CharCursor, MAX_CHAR_LOOKAHEAD};
pub use error::{ErrorCode, SyntaxError};
pub use keywords::resolve_keyword;
pub use lexer::{Lexer, MAX_LOOKAHEAD, lex, lex_with_eof};
pub use location::TokenLocation;
pub use parser::{Diagnostic, ParseResult, Parser, parse};
pub use token::{Token, TokenType};
pub use traits::{TokenTraits, traits};
