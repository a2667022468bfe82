// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Z80 assembly source code.
//!
//! The parser pulls tokens from a [`Lexer`] and produces one
//! [`AssemblyLine`] per successfully parsed source line, together with a
//! list of coded [`Diagnostic`]s.
//!
//! # Design Philosophy
//!
//! - **Lines are the unit of recovery** - a failed line reports exactly one
//!   diagnostic and produces no node; parsing resumes on the next line
//! - **Multiple errors** - every bad line is reported, parsing never stops
//!   early
//! - **Precise spans** - a line's location covers its consumed significant
//!   tokens, never the newline or a trailing comment
//!
//! # Expression Precedence (Pratt Parsing)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 10 | `\|` | Left |
//! | 20 | `^` | Left |
//! | 30 | `&` | Left |
//! | 40 | `==` `===` `!=` `!==` | Left |
//! | 50 | `<` `<=` `>` `>=` | Left |
//! | 60 | `<<` `>>` | Left |
//! | 70 | `<?` `>?` | Left |
//! | 80 | `+` `-` | Left |
//! | 90 | `*` `/` `%` | Left |
//!
//! The conditional operator `?:` binds loosest and is right-associative.
//!
//! # Usage
//!
//! ```
//! use z80asm_core::source_analysis::parse;
//!
//! let result = parse("start: ld a,#10\n djnz start");
//!
//! assert!(!result.has_errors());
//! assert_eq!(result.assembly_lines.len(), 2);
//! assert_eq!(result.assembly_lines[1].type_name(), "DjnzInstruction");
//! ```

use ecow::EcoString;
use tracing::{debug, instrument};

use crate::ast::{AssemblyLine, Label, LineNode};
use crate::source_analysis::{
    ErrorCode, Lexer, SyntaxError, Token, TokenLocation, TokenType, traits,
};

// Submodules with additional impl blocks for Parser
mod expressions;
mod instructions;
mod operands;
mod pragmas;

// Property-based tests
#[cfg(test)]
mod property_tests;

// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. Left and right binding powers differ
/// for associativity:
/// - Left-associative: `left_bp == right_bp - 1` (e.g., `+`, `-`)
/// - Right-associative: `left_bp == right_bp + 1`
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    /// Left binding power (how tightly this operator binds to its left operand).
    pub(super) left: u8,
    /// Right binding power (how tightly this operator binds to its right operand).
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }
}

/// Gets the binding power for a binary operator token.
///
/// Returns `None` for anything else, which ends the expression.
pub(super) fn binary_binding_power(token_type: TokenType) -> Option<BindingPower> {
    use TokenType as T;

    match token_type {
        T::VerticalBar => Some(BindingPower::left_assoc(10)),
        T::UpArrow => Some(BindingPower::left_assoc(20)),
        T::Ampersand => Some(BindingPower::left_assoc(30)),
        T::Equal | T::CiEqual | T::NotEqual | T::CiNotEqual => Some(BindingPower::left_assoc(40)),
        T::LessThan | T::LessThanOrEqual | T::GreaterThan | T::GreaterThanOrEqual => {
            Some(BindingPower::left_assoc(50))
        }
        T::LeftShift | T::RightShift => Some(BindingPower::left_assoc(60)),
        T::MinOp | T::MaxOp => Some(BindingPower::left_assoc(70)),
        T::Plus | T::Minus => Some(BindingPower::left_assoc(80)),
        T::Multiplication | T::Divide | T::Modulo => Some(BindingPower::left_assoc(90)),
        _ => None,
    }
}

/// Parses a complete source buffer.
///
/// This is the main entry point for parsing. It always returns a
/// [`ParseResult`]; check [`ParseResult::has_errors`] for syntax errors.
///
/// # Examples
///
/// ```
/// use z80asm_core::source_analysis::{ErrorCode, parse};
///
/// let result = parse("djnz");
///
/// assert!(result.has_errors());
/// assert_eq!(result.errors[0].code, ErrorCode::Z1003);
/// assert!(result.assembly_lines.is_empty());
/// ```
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    Parser::new(Lexer::new(source)).parse_program()
}

/// The outcome of a parse: the lines that parsed and the errors found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Successfully parsed lines, in source order.
    pub assembly_lines: Vec<AssemblyLine>,
    /// Diagnostics, in the order they were found.
    pub errors: Vec<Diagnostic>,
}

impl ParseResult {
    /// Returns `true` if any diagnostic was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A coded syntax error with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// The stable error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: EcoString,
    /// The source location.
    pub location: TokenLocation,
}

impl Diagnostic {
    /// Creates a diagnostic from a syntax error.
    #[must_use]
    pub fn new(error: &SyntaxError, location: TokenLocation) -> Self {
        Self {
            code: error.code(),
            message: error.to_string().into(),
            location,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.location.line(),
            self.location.start_column(),
            self.code,
            self.message
        )
    }
}

/// The result of a production that aborts the line on failure.
pub(super) type LineResult<T> = Result<T, Diagnostic>;

/// Maximum nesting depth for expressions before the parser bails out.
///
/// Prevents stack overflow on deeply nested input (e.g., `(((((...)))))`).
const MAX_NESTING_DEPTH: usize = 64;

/// The parser state.
pub struct Parser<'src> {
    /// The token source.
    lexer: Lexer<'src>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Location of the last consumed significant token of the current line.
    last_location: TokenLocation,
    /// Current expression nesting depth.
    nesting_depth: usize,
}

impl std::fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("lexer", &self.lexer)
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

impl<'src> Parser<'src> {
    /// Creates a parser over the given lexer.
    #[must_use]
    pub fn new(lexer: Lexer<'src>) -> Self {
        Self {
            lexer,
            diagnostics: Vec::new(),
            last_location: TokenLocation::default(),
            nesting_depth: 0,
        }
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Returns the next significant token without consuming it.
    pub(super) fn current_token(&mut self) -> Token {
        self.lexer.peek(false)
    }

    /// Returns the type of the next significant token.
    pub(super) fn current_type(&mut self) -> TokenType {
        self.lexer.peek(false).token_type()
    }

    /// Returns the type of the significant token `offset` positions ahead.
    pub(super) fn peek_type_at(&mut self, offset: usize) -> TokenType {
        self.lexer.ahead(offset, false).token_type()
    }

    /// Consumes the next significant token.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.lexer.get(false);
        if !token.token_type().is_line_end() {
            self.last_location = token.location();
        }
        token
    }

    /// Checks if the next token has the given type.
    pub(super) fn check(&mut self, token_type: TokenType) -> bool {
        self.current_type() == token_type
    }

    /// Consumes the next token if it has the given type.
    pub(super) fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given type or fails with `error`.
    pub(super) fn expect(&mut self, token_type: TokenType, error: SyntaxError) -> LineResult<Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_here(&error))
        }
    }

    /// Returns `true` if the next significant token ends the line.
    pub(super) fn at_line_end(&mut self) -> bool {
        self.current_type().is_line_end()
    }

    /// Builds a diagnostic at the next significant token.
    pub(super) fn error_here(&mut self, error: &SyntaxError) -> Diagnostic {
        let location = self.current_token().location();
        Diagnostic::new(error, location)
    }

    /// Increments the nesting depth, failing once it exceeds
    /// [`MAX_NESTING_DEPTH`]. Call [`leave_nesting`](Self::leave_nesting) on
    /// every exit path when this returns `Ok(())`.
    pub(super) fn enter_nesting(&mut self) -> LineResult<()> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            return Err(self.error_here(&SyntaxError::NestingTooDeep));
        }
        self.nesting_depth += 1;
        Ok(())
    }

    /// Decrements the nesting depth (pair with `enter_nesting`).
    pub(super) fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// Skips the rest of a failed line, including its line break.
    fn synchronize(&mut self) {
        self.nesting_depth = 0;
        while !self.lexer.get(false).token_type().is_line_end() {}
    }

    // ========================================================================
    // Program and Line Parsing
    // ========================================================================

    /// Parses every line of the source.
    #[instrument(skip_all)]
    pub fn parse_program(mut self) -> ParseResult {
        let mut assembly_lines = Vec::new();
        while !self.check(TokenType::Eof) {
            match self.parse_line() {
                Ok(Some(line)) => assembly_lines.push(line),
                Ok(None) => {}
                Err(diagnostic) => {
                    self.diagnostics.push(diagnostic);
                    self.synchronize();
                }
            }
        }
        debug!(
            lines = assembly_lines.len(),
            errors = self.diagnostics.len(),
            "parsed assembly source"
        );
        ParseResult {
            assembly_lines,
            errors: self.diagnostics,
        }
    }

    /// Parses one line. Empty and comment-only lines yield `None`.
    fn parse_line(&mut self) -> LineResult<Option<AssemblyLine>> {
        if self.match_token(TokenType::NewLine) {
            return Ok(None);
        }

        let start = self.current_token().location();
        let label = self.parse_label();
        let node = if self.at_line_end() {
            LineNode::LabelOnlyLine
        } else {
            self.parse_line_body(label.as_ref())?
        };
        let location = start.to(self.last_location);
        let comment = self.finish_line()?;

        Ok(Some(AssemblyLine {
            label,
            node,
            location,
            comment,
        }))
    }

    /// Consumes a leading label. Any identifier at the start of a line is a
    /// label, except the name of a `name(args)` invocation.
    fn parse_label(&mut self) -> Option<Label> {
        if !self.check(TokenType::Identifier) || self.peek_type_at(1) == TokenType::LPar {
            return None;
        }
        let token = self.advance();
        self.match_token(TokenType::Colon);
        Some(Label {
            name: token.text().into(),
            location: token.location(),
        })
    }

    /// Dispatches on the first token after the label.
    fn parse_line_body(&mut self, label: Option<&Label>) -> LineResult<LineNode> {
        let token = self.current_token();
        let token_type = token.token_type();
        let token_traits = traits(token_type);

        if token_traits.instruction() {
            self.parse_instruction()
        } else if token_traits.pragma() {
            self.parse_pragma(label)
        } else if token_traits.statement() {
            self.parse_statement(label)
        } else if token_traits.directive() {
            self.parse_directive()
        } else if token_type == TokenType::Identifier && self.peek_type_at(1) == TokenType::LPar {
            self.parse_invocation()
        } else {
            let location = token.location();
            let error = if token_type.is_unknown() {
                SyntaxError::UnrecognizedLexeme(token.into_text())
            } else {
                SyntaxError::InvalidLineStart(token.into_text())
            };
            Err(Diagnostic::new(&error, location))
        }
    }

    /// Parses `name(arg, ...)`.
    fn parse_invocation(&mut self) -> LineResult<LineNode> {
        let name = self.advance().into_text();
        self.expect(TokenType::LPar, SyntaxError::OpeningParenExpected)?;
        let mut arguments = Vec::new();
        if !self.check(TokenType::RPar) {
            loop {
                arguments.push(self.parse_operand()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenType::RPar, SyntaxError::ClosingParenExpected)?;
        Ok(LineNode::MacroOrStructInvocation { name, arguments })
    }

    /// Checks that nothing but trivia follows the line body, consumes the
    /// line break and returns the last trailing comment.
    fn finish_line(&mut self) -> LineResult<Option<EcoString>> {
        let mut comment = None;
        loop {
            let token = self.lexer.peek(true);
            match token.token_type() {
                TokenType::Ws => {}
                TokenType::InlineComment | TokenType::EolComment => {
                    comment = Some(token.into_text());
                }
                TokenType::NewLine => {
                    self.lexer.get(true);
                    return Ok(comment);
                }
                TokenType::Eof => return Ok(comment),
                TokenType::Unknown => {
                    let location = token.location();
                    return Err(Diagnostic::new(
                        &SyntaxError::UnrecognizedLexeme(token.into_text()),
                        location,
                    ));
                }
                _ => {
                    let location = token.location();
                    return Err(Diagnostic::new(
                        &SyntaxError::TrailingToken(token.into_text()),
                        location,
                    ));
                }
            }
            self.lexer.get(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Condition, Expression};

    /// Helper to parse a string and check for errors.
    fn parse_ok(source: &str) -> Vec<AssemblyLine> {
        let result = parse(source);
        assert!(!result.has_errors(), "Expected no errors, got: {:?}", result.errors);
        result.assembly_lines
    }

    /// Helper to parse a string expecting errors; returns the first code.
    fn first_error(source: &str) -> ErrorCode {
        let result = parse(source);
        assert!(result.has_errors(), "Expected errors for {source:?}");
        result.errors[0].code
    }

    #[test]
    fn parse_empty_input() {
        let result = parse("");
        assert!(!result.has_errors());
        assert!(result.assembly_lines.is_empty());
    }

    #[test]
    fn parse_blank_and_comment_lines() {
        let lines = parse_ok("\n  ; just a comment\n\n/* block */\n");
        assert!(lines.is_empty());
    }

    #[test]
    fn parse_djnz_line_span() {
        let lines = parse_ok("djnz #4000");
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.type_name(), "DjnzInstruction");
        assert!(line.label.is_none());
        assert_eq!(line.location, TokenLocation::new(0, 10, 1, 0, 10));
        let LineNode::DjnzInstruction { target } = &line.node else {
            panic!("Expected DjnzInstruction, got {:?}", line.node);
        };
        assert!(matches!(target, Expression::IntegerLiteral { value: 0x4000, .. }));
    }

    #[test]
    fn parse_missing_operand_reports_one_error() {
        let result = parse("djnz");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::Z1003);
        assert!(result.assembly_lines.is_empty());
    }

    #[test]
    fn parse_jr_with_condition() {
        let lines = parse_ok("jr z,#4000");
        let LineNode::JrInstruction { condition, target } = &lines[0].node else {
            panic!("Expected JrInstruction, got {:?}", lines[0].node);
        };
        assert_eq!(*condition, Some(Condition::Z));
        assert!(condition.is_some_and(|c| c == "z"));
        assert_eq!(target.type_name(), "IntegerLiteral");
        assert_eq!(lines[0].location, TokenLocation::new(0, 10, 1, 0, 10));
    }

    #[test]
    fn parse_label_forms() {
        let lines = parse_ok("start: nop\nagain halt\nalone\nlast:");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].label.as_ref().map(|l| l.name.as_str()), Some("start"));
        assert_eq!(lines[0].type_name(), "SimpleZ80Instruction");
        assert_eq!(lines[1].label.as_ref().map(|l| l.name.as_str()), Some("again"));
        assert_eq!(lines[2].type_name(), "LabelOnlyLine");
        assert_eq!(lines[3].type_name(), "LabelOnlyLine");
        assert_eq!(lines[3].location, TokenLocation::new(28, 33, 4, 0, 5));
    }

    #[test]
    fn parse_label_span_includes_label() {
        let lines = parse_ok("  here: ret nz ; back");
        assert_eq!(lines[0].location, TokenLocation::new(2, 14, 1, 2, 14));
        assert_eq!(lines[0].comment.as_deref(), Some("; back"));
    }

    #[test]
    fn parse_trailing_comment_variants() {
        let lines = parse_ok("nop /* a */\nnop // b\nnop");
        assert_eq!(lines[0].comment.as_deref(), Some("/* a */"));
        assert_eq!(lines[1].comment.as_deref(), Some("// b"));
        assert_eq!(lines[2].comment, None);
    }

    #[test]
    fn parse_trailing_token_is_reported() {
        assert_eq!(first_error("nop nop"), ErrorCode::Z1001);
        assert_eq!(first_error("ret z,"), ErrorCode::Z1001);
        assert_eq!(first_error("nop {"), ErrorCode::Z1013);
    }

    #[test]
    fn parse_invalid_line_start() {
        assert_eq!(first_error(", nop"), ErrorCode::Z1002);
        assert_eq!(first_error("#4000"), ErrorCode::Z1002);
        assert_eq!(first_error("label 12"), ErrorCode::Z1002);
        assert_eq!(first_error("§"), ErrorCode::Z1013);
    }

    #[test]
    fn parse_error_recovery_continues_on_next_line() {
        let result = parse("djnz\nnop\nld a,\nhalt");
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].code, ErrorCode::Z1003);
        assert_eq!(result.errors[0].location.line(), 1);
        assert_eq!(result.errors[1].code, ErrorCode::Z1012);
        assert_eq!(result.errors[1].location.line(), 3);
        let names: Vec<_> = result.assembly_lines.iter().map(AssemblyLine::type_name).collect();
        assert_eq!(names, vec!["SimpleZ80Instruction", "SimpleZ80Instruction"]);
        assert_eq!(result.assembly_lines[1].location.line(), 4);
    }

    #[test]
    fn parse_macro_invocation() {
        let lines = parse_ok("lbl: MyMacro(a, #10, (hl))\nEmpty()");
        let LineNode::MacroOrStructInvocation { name, arguments } = &lines[0].node else {
            panic!("Expected invocation, got {:?}", lines[0].node);
        };
        assert_eq!(name.as_str(), "MyMacro");
        assert_eq!(arguments.len(), 3);
        assert!(matches!(lines[1].node, LineNode::MacroOrStructInvocation { ref arguments, .. } if arguments.is_empty()));
    }

    #[test]
    fn parse_invocation_missing_paren() {
        assert_eq!(first_error("MyMacro(a, b"), ErrorCode::Z1005);
    }

    #[test]
    fn parse_deep_nesting_is_reported() {
        let source = format!("ld a,{}1{}", "(".repeat(200), ")".repeat(200));
        let result = parse(&source);
        assert!(result.has_errors());
        assert_eq!(result.errors[0].code, ErrorCode::Z1003);
        assert!(result.errors[0].message.contains("nesting"));
    }

    #[test]
    fn parse_crlf_lines() {
        let lines = parse_ok("nop\r\nhalt\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].location, TokenLocation::new(5, 9, 2, 0, 4));
    }

    #[test]
    fn diagnostic_display() {
        let result = parse("\n  mul d");
        assert_eq!(result.errors[0].to_string(), "2:7: Z1007: ',' expected");
    }

    #[test]
    fn binding_powers_are_ordered() {
        let order = [
            TokenType::VerticalBar,
            TokenType::UpArrow,
            TokenType::Ampersand,
            TokenType::Equal,
            TokenType::LessThan,
            TokenType::LeftShift,
            TokenType::MinOp,
            TokenType::Plus,
            TokenType::Multiplication,
        ];
        for pair in order.windows(2) {
            let low = binary_binding_power(pair[0]).map(|bp| bp.left);
            let high = binary_binding_power(pair[1]).map(|bp| bp.left);
            assert!(low < high, "{} should bind looser than {}", pair[0], pair[1]);
        }
        assert!(binary_binding_power(TokenType::Comma).is_none());
    }
}
