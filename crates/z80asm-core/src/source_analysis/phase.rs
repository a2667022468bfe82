// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The lexer's finite-state machine.
//!
//! Each [`Phase`] stands for a partially recognized lexeme. [`step`] looks at
//! the next character (without consuming it) and decides whether the lexeme
//! grows, completes with that character, or ends before it. The decision
//! depends only on the phase, the character, the text recognized so far and
//! a few characters of lookahead, which is what keeps the machine testable
//! in isolation from the [`Lexer`](super::Lexer).

use super::cursor::CharCursor;
use super::keywords::resolve_keyword;
use super::TokenType;

/// Maximum number of characters past the current one that an octal suffix
/// may appear at (`177777q`, the largest 16-bit octal value).
const OCTAL_SUFFIX_LOOKAHEAD: usize = 5;

/// Maximum number of characters past the current one that a hex suffix may
/// appear at (`0FFFFh`).
const HEX_SUFFIX_LOOKAHEAD: usize = 4;

/// Maximum number of hex digits after `0x`.
const MAX_PREFIXED_HEX_DIGITS: usize = 6;

/// Maximum number of hex digits after `#` or `$`.
const MAX_SIGIL_HEX_DIGITS: usize = 5;

/// A partially recognized lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Phase {
    Start,
    InWhiteSpace,
    InEolComment,
    /// `/` received.
    InPotentialComment,
    InlineCommentBody,
    /// `*` received inside an inline comment.
    InlineCommentTail,
    /// `\r` received.
    PotentialNewLine,
    Colon,
    Assign,
    Equal,
    Minus,
    Exclamation,
    NotEqual,
    AngleLeft,
    AngleRight,
    LBracket,
    RBracket,
    Dot,
    /// `.` followed by a letter.
    KeywordLike,
    IdTail,
    /// `#` received.
    DirectiveOrHexLiteral,
    /// `$` received.
    Dollar,
    /// `$<` received.
    NoneArgTail,
    ModuloOrBinary,
    BinLiteral,
    NumericLiteral0,
    NumericLiteral1To9,
    /// `0x` received.
    HexaLiteralPrefix,
    /// Hex digits waiting for their `h` suffix.
    HexaLiteralSuffix,
    /// Octal digits waiting for their `o`/`q` suffix.
    OctalLiteralSuffix,
    DecimalOrReal,
    FractionalPart,
    FractionalPartTail,
    ExponentSign,
    ExponentDigit,
    ExponentTail,
    Char,
    CharBackSlash,
    CharHexa1,
    CharHexa2,
    CharTail,
    String,
    StringBackSlash,
    StringHexa1,
    StringHexa2,
}

/// What to do with the character [`step`] was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    /// Append the character and move to the phase.
    Continue(Phase),
    /// Append the character and finish the token.
    Complete(TokenType),
    /// Finish the token without the character; it starts the next token.
    Emit(TokenType),
}

/// The lexeme recognized so far plus access to the characters after the
/// current one.
pub(super) struct Scan<'a, 'src> {
    text: &'a str,
    cursor: &'a CharCursor<'src>,
}

impl<'a, 'src> Scan<'a, 'src> {
    /// Creates a scan over `text`, with the cursor positioned on the current
    /// (not yet consumed) character.
    pub(super) fn new(text: &'a str, cursor: &'a CharCursor<'src>) -> Self {
        Self { text, cursor }
    }

    /// Returns the character `k` positions after the current one.
    fn ahead(&self, k: usize) -> Option<char> {
        self.cursor.peek_at(k)
    }
}

impl Phase {
    /// The token type of a lexeme cut short in this phase, either by a
    /// character that does not extend it or by the end of input.
    pub(super) fn pending_type(self, text: &str) -> TokenType {
        match self {
            Self::Start => TokenType::Eof,
            Self::InWhiteSpace => TokenType::Ws,
            Self::InEolComment => TokenType::EolComment,
            Self::InPotentialComment => TokenType::Divide,
            Self::InlineCommentBody | Self::InlineCommentTail => TokenType::InlineComment,
            Self::PotentialNewLine => TokenType::NewLine,
            Self::Colon => TokenType::Colon,
            Self::Assign => TokenType::Assign,
            Self::Equal => TokenType::Equal,
            Self::Minus => TokenType::Minus,
            Self::Exclamation => TokenType::Exclamation,
            Self::NotEqual => TokenType::NotEqual,
            Self::AngleLeft => TokenType::LessThan,
            Self::AngleRight => TokenType::GreaterThan,
            Self::Dot => TokenType::Dot,
            Self::KeywordLike => resolve_keyword(text).unwrap_or(TokenType::Unknown),
            Self::IdTail => resolve_keyword(text).unwrap_or(TokenType::Identifier),
            Self::DirectiveOrHexLiteral | Self::Dollar => hex_or_keyword(text),
            Self::ModuloOrBinary => TokenType::Modulo,
            Self::BinLiteral => TokenType::BinaryLiteral,
            Self::NumericLiteral0 | Self::NumericLiteral1To9 | Self::DecimalOrReal => {
                TokenType::DecimalLiteral
            }
            Self::HexaLiteralPrefix if text.len() > 2 => TokenType::HexadecimalLiteral,
            Self::FractionalPartTail | Self::ExponentTail => TokenType::RealLiteral,
            Self::LBracket
            | Self::RBracket
            | Self::NoneArgTail
            | Self::HexaLiteralPrefix
            | Self::HexaLiteralSuffix
            | Self::OctalLiteralSuffix
            | Self::FractionalPart
            | Self::ExponentSign
            | Self::ExponentDigit
            | Self::Char
            | Self::CharBackSlash
            | Self::CharHexa1
            | Self::CharHexa2
            | Self::CharTail
            | Self::String
            | Self::StringBackSlash
            | Self::StringHexa1
            | Self::StringHexa2 => TokenType::Unknown,
        }
    }
}

/// Decides what to do with `ch` in `phase`.
pub(super) fn step(phase: Phase, ch: char, scan: &Scan<'_, '_>) -> Action {
    use Action::{Complete, Continue, Emit};

    match phase {
        Phase::Start => start(ch),

        // --- Trivia
        Phase::InWhiteSpace => match ch {
            ' ' | '\t' => Continue(Phase::InWhiteSpace),
            _ => Emit(TokenType::Ws),
        },
        Phase::InEolComment => match ch {
            '\r' | '\n' => Emit(TokenType::EolComment),
            _ => Continue(Phase::InEolComment),
        },
        Phase::InPotentialComment => match ch {
            '/' => Continue(Phase::InEolComment),
            '*' => Continue(Phase::InlineCommentBody),
            _ => Emit(TokenType::Divide),
        },
        Phase::InlineCommentBody => match ch {
            '*' => Continue(Phase::InlineCommentTail),
            '\r' | '\n' => Emit(TokenType::InlineComment),
            _ => Continue(Phase::InlineCommentBody),
        },
        Phase::InlineCommentTail => match ch {
            '/' => Complete(TokenType::InlineComment),
            '*' => Continue(Phase::InlineCommentTail),
            '\r' | '\n' => Emit(TokenType::InlineComment),
            _ => Continue(Phase::InlineCommentBody),
        },
        Phase::PotentialNewLine => match ch {
            '\n' => Complete(TokenType::NewLine),
            _ => Emit(TokenType::NewLine),
        },

        // --- Operators
        Phase::Colon => match ch {
            ':' => Complete(TokenType::DoubleColon),
            '=' => Complete(TokenType::Var),
            _ => Emit(TokenType::Colon),
        },
        Phase::Assign => match ch {
            '=' => Continue(Phase::Equal),
            _ => Emit(TokenType::Assign),
        },
        Phase::Equal => match ch {
            '=' => Complete(TokenType::CiEqual),
            _ => Emit(TokenType::Equal),
        },
        Phase::Minus => match ch {
            '>' => Complete(TokenType::GoesTo),
            _ => Emit(TokenType::Minus),
        },
        Phase::Exclamation => match ch {
            '=' => Continue(Phase::NotEqual),
            _ => Emit(TokenType::Exclamation),
        },
        Phase::NotEqual => match ch {
            '=' => Complete(TokenType::CiNotEqual),
            _ => Emit(TokenType::NotEqual),
        },
        Phase::AngleLeft => match ch {
            '=' => Complete(TokenType::LessThanOrEqual),
            '<' => Complete(TokenType::LeftShift),
            '?' => Complete(TokenType::MinOp),
            _ => Emit(TokenType::LessThan),
        },
        Phase::AngleRight => match ch {
            '=' => Complete(TokenType::GreaterThanOrEqual),
            '>' => Complete(TokenType::RightShift),
            '?' => Complete(TokenType::MaxOp),
            _ => Emit(TokenType::GreaterThan),
        },
        Phase::LBracket => match ch {
            '{' => Complete(TokenType::LDBrac),
            _ => Emit(TokenType::Unknown),
        },
        Phase::RBracket => match ch {
            '}' => Complete(TokenType::RDBrac),
            _ => Emit(TokenType::Unknown),
        },
        Phase::Dot => {
            if ch.is_ascii_alphabetic() {
                Continue(Phase::KeywordLike)
            } else if ch.is_ascii_digit() {
                Continue(Phase::FractionalPartTail)
            } else {
                Emit(TokenType::Dot)
            }
        }

        // --- Identifiers and keywords
        Phase::KeywordLike => {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                Continue(Phase::KeywordLike)
            } else {
                Emit(phase.pending_type(scan.text))
            }
        }
        Phase::IdTail => {
            if is_id_continuation(ch) {
                Continue(Phase::IdTail)
            } else if ch == '\'' {
                // Only keywords (`af'`) may end in a prime.
                Complete(resolve_keyword(&format!("{}'", scan.text)).unwrap_or(TokenType::Unknown))
            } else {
                Emit(phase.pending_type(scan.text))
            }
        }
        Phase::DirectiveOrHexLiteral | Phase::Dollar => {
            if ch.is_ascii_alphanumeric() {
                Continue(phase)
            } else if ch == '<' && phase == Phase::Dollar && scan.text == "$" {
                Continue(Phase::NoneArgTail)
            } else {
                Emit(phase.pending_type(scan.text))
            }
        }
        Phase::NoneArgTail => {
            if ch == '$' {
                Complete(if scan.text == "$<none>" {
                    TokenType::NoneArg
                } else {
                    TokenType::Unknown
                })
            } else if is_restricted(ch) {
                Emit(TokenType::Unknown)
            } else {
                Continue(Phase::NoneArgTail)
            }
        }

        // --- Numeric literals
        Phase::ModuloOrBinary => {
            if is_binary_digit(ch) {
                Continue(Phase::BinLiteral)
            } else {
                Emit(TokenType::Modulo)
            }
        }
        Phase::BinLiteral => {
            if is_binary_digit(ch) {
                Continue(Phase::BinLiteral)
            } else {
                Emit(TokenType::BinaryLiteral)
            }
        }
        Phase::NumericLiteral0 => match ch {
            'x' => {
                if scan.ahead(1).is_some_and(|c| c.is_ascii_hexdigit()) {
                    Continue(Phase::HexaLiteralPrefix)
                } else {
                    Complete(TokenType::Unknown)
                }
            }
            'b' => {
                if hex_suffix_follows(scan, HEX_SUFFIX_LOOKAHEAD) {
                    Continue(Phase::HexaLiteralSuffix)
                } else if scan.ahead(1).is_some_and(is_binary_digit) {
                    Continue(Phase::BinLiteral)
                } else {
                    Complete(TokenType::Unknown)
                }
            }
            _ => numeric_tail(ch, scan),
        },
        Phase::NumericLiteral1To9 => numeric_tail(ch, scan),
        Phase::HexaLiteralPrefix => {
            if !ch.is_ascii_hexdigit() {
                Emit(phase.pending_type(scan.text))
            } else if scan.text.len() - 2 >= MAX_PREFIXED_HEX_DIGITS {
                Complete(TokenType::Unknown)
            } else {
                Continue(Phase::HexaLiteralPrefix)
            }
        }
        Phase::HexaLiteralSuffix => {
            if ch.is_ascii_hexdigit() {
                Continue(Phase::HexaLiteralSuffix)
            } else if is_hex_suffix(ch) {
                Complete(TokenType::HexadecimalLiteral)
            } else {
                Emit(TokenType::Unknown)
            }
        }
        Phase::OctalLiteralSuffix => {
            if is_octal_digit(ch) {
                Continue(Phase::OctalLiteralSuffix)
            } else if is_octal_suffix(ch) {
                Complete(TokenType::OctalLiteral)
            } else {
                Emit(TokenType::Unknown)
            }
        }
        Phase::DecimalOrReal => match ch {
            '0'..='9' => Continue(Phase::DecimalOrReal),
            '.' => Continue(Phase::FractionalPart),
            'e' | 'E' => Continue(Phase::ExponentSign),
            _ => Emit(TokenType::DecimalLiteral),
        },
        Phase::FractionalPart => {
            if ch.is_ascii_digit() {
                Continue(Phase::FractionalPartTail)
            } else {
                Emit(TokenType::Unknown)
            }
        }
        Phase::FractionalPartTail => match ch {
            '0'..='9' => Continue(Phase::FractionalPartTail),
            'e' | 'E' => Continue(Phase::ExponentSign),
            _ => Emit(TokenType::RealLiteral),
        },
        Phase::ExponentSign => match ch {
            '+' | '-' => Continue(Phase::ExponentDigit),
            '0'..='9' => Continue(Phase::ExponentTail),
            _ => Emit(TokenType::Unknown),
        },
        Phase::ExponentDigit => {
            if ch.is_ascii_digit() {
                Continue(Phase::ExponentTail)
            } else {
                Emit(TokenType::Unknown)
            }
        }
        Phase::ExponentTail => {
            if ch.is_ascii_digit() {
                Continue(Phase::ExponentTail)
            } else {
                Emit(TokenType::RealLiteral)
            }
        }

        // --- Character literals
        Phase::Char => match ch {
            _ if is_restricted(ch) => Emit(TokenType::Unknown),
            '\\' => Continue(Phase::CharBackSlash),
            _ => Continue(Phase::CharTail),
        },
        Phase::CharBackSlash => escape(ch, Phase::CharTail, Phase::CharHexa1),
        Phase::CharHexa1 => hex_escape_digit(ch, Phase::CharHexa2),
        Phase::CharHexa2 => hex_escape_digit(ch, Phase::CharTail),
        Phase::CharTail => match ch {
            '\'' => Complete(TokenType::CharLiteral),
            _ if is_restricted(ch) => Emit(TokenType::Unknown),
            _ => Complete(TokenType::Unknown),
        },

        // --- String literals
        Phase::String => match ch {
            '"' => Complete(TokenType::StringLiteral),
            _ if is_restricted(ch) => Emit(TokenType::Unknown),
            '\\' => Continue(Phase::StringBackSlash),
            _ => Continue(Phase::String),
        },
        Phase::StringBackSlash => escape(ch, Phase::String, Phase::StringHexa1),
        Phase::StringHexa1 => hex_escape_digit(ch, Phase::StringHexa2),
        Phase::StringHexa2 => hex_escape_digit(ch, Phase::String),
    }
}

/// The first character of a token.
fn start(ch: char) -> Action {
    use Action::{Complete, Continue};

    match ch {
        ' ' | '\t' => Continue(Phase::InWhiteSpace),
        ';' => Continue(Phase::InEolComment),
        '/' => Continue(Phase::InPotentialComment),
        '\n' => Complete(TokenType::NewLine),
        '\r' => Continue(Phase::PotentialNewLine),
        ':' => Continue(Phase::Colon),
        ',' => Complete(TokenType::Comma),
        '=' => Continue(Phase::Assign),
        '(' => Complete(TokenType::LPar),
        ')' => Complete(TokenType::RPar),
        '[' => Complete(TokenType::LSBrac),
        ']' => Complete(TokenType::RSBrac),
        '?' => Complete(TokenType::QuestionMark),
        '+' => Complete(TokenType::Plus),
        '-' => Continue(Phase::Minus),
        '|' => Complete(TokenType::VerticalBar),
        '^' => Complete(TokenType::UpArrow),
        '&' => Complete(TokenType::Ampersand),
        '*' => Complete(TokenType::Multiplication),
        '~' => Complete(TokenType::BinaryNot),
        '!' => Continue(Phase::Exclamation),
        '<' => Continue(Phase::AngleLeft),
        '>' => Continue(Phase::AngleRight),
        '{' => Continue(Phase::LBracket),
        '}' => Continue(Phase::RBracket),
        '.' => Continue(Phase::Dot),
        '#' => Continue(Phase::DirectiveOrHexLiteral),
        '$' => Continue(Phase::Dollar),
        '%' => Continue(Phase::ModuloOrBinary),
        '0' => Continue(Phase::NumericLiteral0),
        '1'..='9' => Continue(Phase::NumericLiteral1To9),
        '\'' => Continue(Phase::Char),
        '"' => Continue(Phase::String),
        _ if is_id_start(ch) => Continue(Phase::IdTail),
        _ => Complete(TokenType::Unknown),
    }
}

/// The second character of a number whose first character is a digit.
///
/// Suffixed forms (`0FFh`, `177q`) are recognized only when the suffix is
/// within reach and every character before it is a digit of the suffix's
/// base; otherwise the number is decimal or real.
fn numeric_tail(ch: char, scan: &Scan<'_, '_>) -> Action {
    use Action::{Complete, Continue, Emit};

    let starts_octal = scan.text.chars().next().is_some_and(is_octal_digit);
    if is_hex_suffix(ch) {
        return Complete(TokenType::HexadecimalLiteral);
    }
    if is_octal_suffix(ch) {
        return Complete(if starts_octal {
            TokenType::OctalLiteral
        } else {
            TokenType::Unknown
        });
    }
    if starts_octal && octal_suffix_follows(ch, scan) {
        return Continue(Phase::OctalLiteralSuffix);
    }
    if ch.is_ascii_hexdigit() && hex_suffix_follows(scan, HEX_SUFFIX_LOOKAHEAD) {
        return Continue(Phase::HexaLiteralSuffix);
    }
    match ch {
        '0'..='9' => Continue(Phase::DecimalOrReal),
        '.' => Continue(Phase::FractionalPart),
        'e' | 'E' => Continue(Phase::ExponentSign),
        _ => Emit(TokenType::DecimalLiteral),
    }
}

/// True if an `h`/`H` suffix appears within `reach` characters after the
/// current one, with only hex digits in between.
fn hex_suffix_follows(scan: &Scan<'_, '_>, reach: usize) -> bool {
    for k in 1..=reach {
        match scan.ahead(k) {
            Some(c) if is_hex_suffix(c) => return true,
            Some(c) if c.is_ascii_hexdigit() => {}
            _ => return false,
        }
    }
    false
}

/// True if `ch` and the characters after it form an octal digit run closed
/// by an `o`/`q` suffix within [`OCTAL_SUFFIX_LOOKAHEAD`] characters.
fn octal_suffix_follows(ch: char, scan: &Scan<'_, '_>) -> bool {
    if !is_octal_digit(ch) {
        return false;
    }
    for k in 1..=OCTAL_SUFFIX_LOOKAHEAD {
        match scan.ahead(k) {
            Some(c) if is_octal_suffix(c) => return true,
            Some(c) if is_octal_digit(c) => {}
            _ => return false,
        }
    }
    false
}

/// The character after a backslash in a character or string literal.
fn escape(ch: char, body: Phase, hex: Phase) -> Action {
    match ch {
        'i' | 'p' | 'f' | 'b' | 'I' | 'o' | 'a' | 't' | 'P' | 'C' | '\'' | '"' | '\\' | '0' => {
            Action::Continue(body)
        }
        'x' => Action::Continue(hex),
        _ if is_restricted(ch) => Action::Emit(TokenType::Unknown),
        _ => Action::Complete(TokenType::Unknown),
    }
}

/// A digit of a `\xHH` escape.
fn hex_escape_digit(ch: char, next: Phase) -> Action {
    if ch.is_ascii_hexdigit() {
        Action::Continue(next)
    } else if is_restricted(ch) {
        Action::Emit(TokenType::Unknown)
    } else {
        Action::Complete(TokenType::Unknown)
    }
}

/// Resolves a `#...` or `$...` lexeme: a short hex run is a literal, anything
/// else goes through the keyword table.
fn hex_or_keyword(text: &str) -> TokenType {
    let digits = &text[1..];
    if digits.is_empty() {
        return if text == "$" {
            TokenType::CurAddress
        } else {
            TokenType::Unknown
        };
    }
    if digits.len() <= MAX_SIGIL_HEX_DIGITS && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        TokenType::HexadecimalLiteral
    } else {
        resolve_keyword(text).unwrap_or(TokenType::Unknown)
    }
}

/// Characters that cannot appear inside character and string literals.
pub(super) fn is_restricted(ch: char) -> bool {
    matches!(ch, '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

pub(super) fn is_id_start(ch: char) -> bool {
    ch.is_alphabetic() || matches!(ch, '_' | '@' | '`')
}

pub(super) fn is_id_continuation(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '@' | '!' | '?' | '#')
}

fn is_binary_digit(ch: char) -> bool {
    matches!(ch, '0' | '1' | '_')
}

fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

fn is_hex_suffix(ch: char) -> bool {
    matches!(ch, 'h' | 'H')
}

fn is_octal_suffix(ch: char) -> bool {
    matches!(ch, 'o' | 'O' | 'q' | 'Q')
}
