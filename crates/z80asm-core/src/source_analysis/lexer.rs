// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Z80 assembly source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is a hand-written state machine (see the `phase` module) driven one
//! character at a time from a [`CharCursor`].
//!
//! # Design Principles
//!
//! - **Never fails**: malformed input becomes [`TokenType::Unknown`] tokens
//! - **Trivia on demand**: whitespace and comments are real tokens, skipped
//!   unless a caller asks for them
//! - **Precise locations**: slicing the source with a token's location
//!   always yields the token's text
//!
//! # Example
//!
//! ```
//! use z80asm_core::source_analysis::{Lexer, TokenType};
//!
//! let mut lexer = Lexer::new("ld a,b ; copy");
//! assert_eq!(lexer.get(false).token_type(), TokenType::Ld);
//! assert_eq!(lexer.ahead(2, false).token_type(), TokenType::B);
//! assert_eq!(lexer.get(false).token_type(), TokenType::A);
//! ```

use std::collections::VecDeque;

use super::cursor::CharCursor;
use super::phase::{Action, Phase, Scan, step};
use super::{Token, TokenLocation, TokenType};

/// Maximum token lookahead depth accepted by [`Lexer::ahead`].
///
/// The depth counts only the tokens visible to the request. When trivia is
/// skipped, the whitespace and comments in between are buffered too, so the
/// buffer can hold more than this many tokens.
pub const MAX_LOOKAHEAD: usize = 16;

/// A lexer that tokenizes Z80 assembly source code.
///
/// Tokens are pulled with [`get`](Self::get); [`peek`](Self::peek) and
/// [`ahead`](Self::ahead) look further without consuming. Each call chooses
/// whether whitespace and comment tokens are visible.
///
/// The lexer also implements [`Iterator`], yielding every token (trivia
/// included) up to but excluding [`TokenType::Eof`].
pub struct Lexer<'src> {
    cursor: CharCursor<'src>,
    /// Tokens fetched by lookahead but not consumed yet, trivia included.
    lookahead: VecDeque<Token>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.cursor.position())
            .field("buffered", &self.lookahead.len())
            .finish_non_exhaustive()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: CharCursor::new(source),
            lookahead: VecDeque::new(),
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.cursor.source()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self, include_ws: bool) -> Token {
        self.ahead(0, include_ws)
    }

    /// Returns the token `n` positions ahead without consuming anything.
    ///
    /// `ahead(0, ..)` is the next token. Once the input is exhausted every
    /// position past the end yields [`TokenType::Eof`].
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`MAX_LOOKAHEAD`]. That is a defect in the
    /// caller, not a property of the source text.
    pub fn ahead(&mut self, n: usize, include_ws: bool) -> Token {
        assert!(
            n <= MAX_LOOKAHEAD,
            "token lookahead {n} exceeds the maximum of {MAX_LOOKAHEAD}"
        );
        let mut seen = 0;
        let mut index = 0;
        loop {
            if index == self.lookahead.len() {
                if self
                    .lookahead
                    .back()
                    .is_some_and(|t| t.token_type().is_eof())
                {
                    return self.lookahead[index - 1].clone();
                }
                let token = self.scan_token();
                self.lookahead.push_back(token);
            }
            let token = &self.lookahead[index];
            if include_ws || !token.token_type().is_trivia() {
                if seen == n {
                    return token.clone();
                }
                seen += 1;
            }
            index += 1;
        }
    }

    /// Consumes and returns the next token.
    ///
    /// Tokens already fetched by lookahead are returned first. Skipped
    /// trivia is consumed along the way.
    pub fn get(&mut self, include_ws: bool) -> Token {
        loop {
            let token = self
                .lookahead
                .pop_front()
                .unwrap_or_else(|| self.scan_token());
            if include_ws || !token.token_type().is_trivia() {
                return token;
            }
        }
    }

    /// Runs the state machine over the next lexeme.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn scan_token(&mut self) -> Token {
        let source = self.cursor.source();
        let start = self.cursor.position();
        let line = self.cursor.line();
        let start_column = self.cursor.column();

        let mut phase = Phase::Start;
        let token_type = loop {
            let text = &source[start..self.cursor.position()];
            let Some(ch) = self.cursor.peek() else {
                break phase.pending_type(text);
            };
            match step(phase, ch, &Scan::new(text, &self.cursor)) {
                Action::Continue(next) => {
                    self.cursor.get();
                    phase = next;
                }
                Action::Complete(token_type) => {
                    self.cursor.get();
                    break token_type;
                }
                Action::Emit(token_type) => break token_type,
            }
        };

        let end = self.cursor.position();
        let end_column = if token_type == TokenType::NewLine {
            start_column + (end - start) as u32
        } else {
            self.cursor.column()
        };
        Token::new(
            &source[start..end],
            token_type,
            TokenLocation::new(start as u32, end as u32, line, start_column, end_column),
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.get(true);
        if token.token_type().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Lexes source into a vector of tokens, trivia included, excluding EOF.
///
/// For most use cases, prefer using the `Lexer` directly.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lexes source into a vector of tokens, trivia included, ending with EOF.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.get(true);
        let is_eof = token.token_type().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lexes and returns the significant token types (no trivia, no EOF).
    fn types(source: &str) -> Vec<TokenType> {
        lex(source)
            .into_iter()
            .map(|t| t.token_type())
            .filter(|t| !t.is_trivia())
            .collect()
    }

    /// Lexes a single token and returns its type and text.
    fn single(source: &str) -> (TokenType, String) {
        let mut lexer = Lexer::new(source);
        let token = lexer.get(true);
        (token.token_type(), token.text().to_string())
    }

    #[test]
    fn lex_empty_input() {
        let tokens = lex_with_eof("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type(), TokenType::Eof);
        assert_eq!(tokens[0].location(), TokenLocation::new(0, 0, 1, 0, 0));
    }

    #[test]
    fn lex_instruction_line() {
        assert_eq!(
            types("djnz #4000"),
            vec![TokenType::Djnz, TokenType::HexadecimalLiteral]
        );
        assert_eq!(
            types("ld (ix+3),a"),
            vec![
                TokenType::Ld,
                TokenType::LPar,
                TokenType::Ix,
                TokenType::Plus,
                TokenType::DecimalLiteral,
                TokenType::RPar,
                TokenType::Comma,
                TokenType::A,
            ]
        );
    }

    #[test]
    fn lex_locations() {
        let tokens = lex_with_eof("djnz #4000");
        assert_eq!(tokens[0].location(), TokenLocation::new(0, 4, 1, 0, 4));
        assert_eq!(tokens[1].token_type(), TokenType::Ws);
        assert_eq!(tokens[2].location(), TokenLocation::new(5, 10, 1, 5, 10));
        assert_eq!(tokens[3].location(), TokenLocation::new(10, 10, 1, 10, 10));
    }

    #[test]
    fn lex_line_numbers() {
        let tokens: Vec<_> = lex("nop\n  halt")
            .into_iter()
            .filter(|t| !t.token_type().is_trivia())
            .collect();
        assert_eq!(tokens[0].location().line(), 1);
        assert_eq!(tokens[1].token_type(), TokenType::NewLine);
        assert_eq!(tokens[1].location().line(), 1);
        assert_eq!(tokens[2].token_type(), TokenType::Halt);
        assert_eq!(tokens[2].location(), TokenLocation::new(6, 10, 2, 2, 6));
    }

    #[test]
    fn lex_newline_variants() {
        assert_eq!(
            types("a\nb\r\nc\rd"),
            vec![
                TokenType::A,
                TokenType::NewLine,
                TokenType::B,
                TokenType::NewLine,
                TokenType::C,
                TokenType::NewLine,
                TokenType::D,
            ]
        );
        assert_eq!(single("\r\n"), (TokenType::NewLine, "\r\n".into()));
    }

    #[test]
    fn lex_comments() {
        assert_eq!(single("; note"), (TokenType::EolComment, "; note".into()));
        assert_eq!(single("// note\n"), (TokenType::EolComment, "// note".into()));
        assert_eq!(
            single("/* a * b */x"),
            (TokenType::InlineComment, "/* a * b */".into())
        );
        assert_eq!(single("/"), (TokenType::Divide, "/".into()));
    }

    #[test]
    fn lex_unterminated_inline_comment_stops_at_newline() {
        let tokens = lex("/* open\nnop");
        assert_eq!(tokens[0].token_type(), TokenType::InlineComment);
        assert_eq!(tokens[0].text(), "/* open");
        assert_eq!(tokens[1].token_type(), TokenType::NewLine);
        assert_eq!(tokens[2].token_type(), TokenType::Nop);
    }

    #[test]
    fn lex_whitespace_run() {
        assert_eq!(single(" \t x"), (TokenType::Ws, " \t ".into()));
    }

    #[test]
    fn lex_operators() {
        let cases = [
            (":", TokenType::Colon),
            ("::", TokenType::DoubleColon),
            (":=", TokenType::Var),
            ("=", TokenType::Assign),
            ("==", TokenType::Equal),
            ("===", TokenType::CiEqual),
            ("!", TokenType::Exclamation),
            ("!=", TokenType::NotEqual),
            ("!==", TokenType::CiNotEqual),
            ("<", TokenType::LessThan),
            ("<=", TokenType::LessThanOrEqual),
            ("<<", TokenType::LeftShift),
            ("<?", TokenType::MinOp),
            (">", TokenType::GreaterThan),
            (">=", TokenType::GreaterThanOrEqual),
            (">>", TokenType::RightShift),
            (">?", TokenType::MaxOp),
            ("{{", TokenType::LDBrac),
            ("}}", TokenType::RDBrac),
            ("{", TokenType::Unknown),
            ("-", TokenType::Minus),
            ("->", TokenType::GoesTo),
            ("%", TokenType::Modulo),
            (".", TokenType::Dot),
            ("~", TokenType::BinaryNot),
            ("?", TokenType::QuestionMark),
        ];
        for (source, expected) in cases {
            assert_eq!(single(source), (expected, source.into()), "{source:?}");
        }
    }

    #[test]
    fn lex_numeric_literals() {
        let cases = [
            ("0", TokenType::DecimalLiteral),
            ("12345", TokenType::DecimalLiteral),
            ("#4000", TokenType::HexadecimalLiteral),
            ("$FF", TokenType::HexadecimalLiteral),
            ("0x1234", TokenType::HexadecimalLiteral),
            ("0x", TokenType::Unknown),
            ("0x1234567", TokenType::Unknown),
            ("12h", TokenType::HexadecimalLiteral),
            ("0FFFFh", TokenType::HexadecimalLiteral),
            ("0b1h", TokenType::HexadecimalLiteral),
            ("0b0101", TokenType::BinaryLiteral),
            ("%0101_1010", TokenType::BinaryLiteral),
            ("177777q", TokenType::OctalLiteral),
            ("17o", TokenType::OctalLiteral),
            ("9q", TokenType::Unknown),
            ("3.14", TokenType::RealLiteral),
            (".5", TokenType::RealLiteral),
            ("1e5", TokenType::RealLiteral),
            ("2.5E-3", TokenType::RealLiteral),
        ];
        for (source, expected) in cases {
            assert_eq!(single(source), (expected, source.into()), "{source:?}");
        }
    }

    #[test]
    fn lookahead_depth_counts_visible_tokens_only() {
        let source = "b ".repeat(MAX_LOOKAHEAD + 4);
        let mut lexer = Lexer::new(&source);
        let token = lexer.ahead(MAX_LOOKAHEAD, false);
        assert_eq!(token.token_type(), TokenType::B);
        assert_eq!(token.location().start_pos() as usize, 2 * MAX_LOOKAHEAD);
        // The skipped spaces sit in the buffer alongside the registers
        assert!(lexer.lookahead.len() > MAX_LOOKAHEAD + 1);
        assert_eq!(lexer.get(false).location().start_pos(), 0);
    }

    #[test]
    fn lex_uppercase_radix_prefix_is_not_a_literal() {
        assert_eq!(
            types("0X12"),
            vec![TokenType::DecimalLiteral, TokenType::Identifier]
        );
        assert_eq!(
            types("0B0101"),
            vec![TokenType::DecimalLiteral, TokenType::Identifier]
        );
        assert_eq!(lex("0X12")[1].text(), "X12");
    }

    #[test]
    fn lex_incomplete_real_is_unknown() {
        assert_eq!(types("1.")[0], TokenType::Unknown);
        assert_eq!(types("1e+")[0], TokenType::Unknown);
        assert_eq!(types("1.\n"), vec![TokenType::Unknown, TokenType::NewLine]);
    }

    #[test]
    fn lex_sigils() {
        assert_eq!(single("$"), (TokenType::CurAddress, "$".into()));
        assert_eq!(single("$cnt"), (TokenType::CurCnt, "$cnt".into()));
        assert_eq!(single("$<none>$"), (TokenType::NoneArg, "$<none>$".into()));
        assert_eq!(single("$<nothing>$").0, TokenType::Unknown);
        assert_eq!(single("#ifdef"), (TokenType::IfDefDir, "#ifdef".into()));
        assert_eq!(single("#bogus").0, TokenType::Unknown);
    }

    #[test]
    fn lex_char_literals() {
        assert_eq!(single("'a'"), (TokenType::CharLiteral, "'a'".into()));
        assert_eq!(single("'\\P'"), (TokenType::CharLiteral, "'\\P'".into()));
        assert_eq!(single("'\\x41'"), (TokenType::CharLiteral, "'\\x41'".into()));
        assert_eq!(single("'\\q'").0, TokenType::Unknown);
        assert_eq!(single("'ab'").0, TokenType::Unknown);
        assert_eq!(single("'a").0, TokenType::Unknown);
    }

    #[test]
    fn lex_string_literals() {
        assert_eq!(
            single("\"hello\\n\""),
            (TokenType::Unknown, "\"hello\\n".into())
        );
        assert_eq!(
            single("\"say \\\"hi\\\"\""),
            (TokenType::StringLiteral, "\"say \\\"hi\\\"\"".into())
        );
        assert_eq!(
            single("\"\\x41\\i\""),
            (TokenType::StringLiteral, "\"\\x41\\i\"".into())
        );
    }

    #[test]
    fn lex_unterminated_string_keeps_newline() {
        assert_eq!(
            types("\"open\nnop"),
            vec![TokenType::Unknown, TokenType::NewLine, TokenType::Nop]
        );
    }

    #[test]
    fn lex_identifiers_and_keywords() {
        assert_eq!(single("start"), (TokenType::Identifier, "start".into()));
        assert_eq!(single("_loop@1!?"), (TokenType::Identifier, "_loop@1!?".into()));
        assert_eq!(single("`local"), (TokenType::Identifier, "`local".into()));
        assert_eq!(single("LD"), (TokenType::Ld, "LD".into()));
        assert_eq!(single("Ld"), (TokenType::Ld, "Ld".into()));
        assert_eq!(single(".Org"), (TokenType::Org, ".Org".into()));
        assert_eq!(single(".bogus").0, TokenType::Unknown);
    }

    #[test]
    fn lex_prime_suffix() {
        assert_eq!(single("af'"), (TokenType::AfPrime, "af'".into()));
        assert_eq!(single("AF'"), (TokenType::AfPrime, "AF'".into()));
        assert_eq!(single("bc'"), (TokenType::Unknown, "bc'".into()));
        assert_eq!(
            types("ex af,af'"),
            vec![
                TokenType::Ex,
                TokenType::Af,
                TokenType::Comma,
                TokenType::AfPrime
            ]
        );
    }

    #[test]
    fn lex_unknown_character_is_single_token() {
        assert_eq!(
            types("§a"),
            vec![TokenType::Unknown, TokenType::A]
        );
    }

    #[test]
    fn peek_is_idempotent() {
        let mut lexer = Lexer::new("ld a,b");
        let first = lexer.peek(false);
        assert_eq!(lexer.peek(false), first);
        assert_eq!(lexer.ahead(1, false).token_type(), TokenType::A);
        assert_eq!(lexer.ahead(1, false).token_type(), TokenType::A);
        assert_eq!(lexer.get(false), first);
    }

    #[test]
    fn lookahead_then_get_matches_plain_get() {
        let source = "ld a , b ; c\nnop";
        let mut plain = Lexer::new(source);
        let expected: Vec<_> = (0..3).map(|_| plain.get(false)).collect();

        let mut buffered = Lexer::new(source);
        buffered.ahead(1, false);
        buffered.ahead(1, false);
        let actual: Vec<_> = (0..3).map(|_| buffered.get(false)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn lookahead_respects_trivia_mode() {
        let mut lexer = Lexer::new("nop ; done");
        assert_eq!(lexer.ahead(1, true).token_type(), TokenType::Ws);
        assert_eq!(lexer.ahead(1, false).token_type(), TokenType::Eof);
        assert_eq!(lexer.ahead(2, true).token_type(), TokenType::EolComment);
        assert_eq!(lexer.get(false).token_type(), TokenType::Nop);
        assert_eq!(lexer.get(true).token_type(), TokenType::Ws);
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("nop");
        lexer.get(false);
        assert!(lexer.get(false).token_type().is_eof());
        assert!(lexer.get(true).token_type().is_eof());
        assert!(lexer.ahead(MAX_LOOKAHEAD, false).token_type().is_eof());
    }

    #[test]
    fn lookahead_at_maximum_depth() {
        let source = "a ".repeat(20);
        let mut lexer = Lexer::new(&source);
        assert_eq!(lexer.ahead(MAX_LOOKAHEAD, false).token_type(), TokenType::A);
        assert_eq!(lexer.ahead(MAX_LOOKAHEAD, false).location().start_pos(), 32);
    }

    #[test]
    #[should_panic(expected = "token lookahead 17 exceeds")]
    fn lookahead_beyond_maximum_panics() {
        let mut lexer = Lexer::new("nop");
        lexer.ahead(MAX_LOOKAHEAD + 1, false);
    }
}
