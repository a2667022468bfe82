// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Z80 assembly lexical analysis.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - The exact source text it was recognized from
//! - A [`TokenType`] indicating what the text is
//! - A [`TokenLocation`] indicating where it is in the source
//!
//! [`TokenType::name`] is a stable contract: syntax highlighters and the
//! `tokens` command print it verbatim. Register, condition and a few Next
//! mnemonic names keep their established spellings (`HL`, `AF_`,
//! `NextReg`) rather than the Rust variant names.

use ecow::EcoString;

use super::TokenLocation;

macro_rules! token_types {
    (@name $name:ident $external:literal) => { $external };
    (@name $name:ident) => { stringify!($name) };
    ($($(#[$meta:meta])* $name:ident $(= $external:literal)?,)*) => {
        /// The type of a token.
        ///
        /// Registers, conditions, mnemonics, pragmas, statements, built-in
        /// functions and directives each get their own variant so that the
        /// parser can match on them directly. Capability queries ("is this an
        /// 8-bit register?") go through [`traits`](super::traits).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenType {
            $($(#[$meta])* $name,)*
        }

        impl TokenType {
            /// Every token type, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$name,)*];

            /// Returns the stable name of this token type.
            ///
            /// This is the variant name unless the variant declares an
            /// external spelling (`Xl = "XL"`).
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => token_types!(@name $name $($external)?),)*
                }
            }
        }
    };
}

token_types! {
    // === Sentinels and trivia ===
    /// End of input.
    Eof,
    /// A run of spaces and tabs.
    Ws,
    /// A `/* ... */` comment.
    InlineComment,
    /// A `;` or `//` comment running to the end of the line.
    EolComment,
    /// A lexeme the lexer could not recognize.
    Unknown,
    /// `\n`, `\r\n` or a bare `\r`.
    NewLine,

    // === Registers ===
    A,
    B,
    C,
    D,
    E,
    H,
    L,
    I,
    R,
    Xl = "XL",
    Xh = "XH",
    Yl = "YL",
    Yh = "YH",
    Bc = "BC",
    De = "DE",
    Hl = "HL",
    Sp = "SP",
    Ix = "IX",
    Iy = "IY",
    Af = "AF",
    /// The shadow `af'` register pair.
    AfPrime = "AF_",

    // === Conditions (`c` is the register token) ===
    Z,
    Nz = "NZ",
    Nc = "NC",
    Po = "PO",
    Pe = "PE",
    P,
    M,

    // === Operand-less instructions ===
    Nop,
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,
    Halt,
    Exx,
    Di,
    Ei,
    Neg,
    Retn,
    Reti,
    Rld,
    Rrd,
    Ldi,
    Cpi,
    Ini,
    Outi,
    Ldd,
    Cpd,
    Ind,
    Outd,
    Ldir,
    Cpir,
    Inir,
    Otir,
    Lddr,
    Cpdr,
    Indr,
    Otdr,

    // === Instructions with operands ===
    Ret,
    Ld,
    Inc,
    Dec,
    Ex,
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
    Djnz,
    Jr,
    Jp,
    Call,
    Rst,
    Push,
    Pop,
    In,
    Out,
    Im,
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Sll,
    Srl,
    Bit,
    Res,
    Set,

    // === ZX Spectrum Next instructions ===
    Swapnib,
    Mirror,
    Test,
    Bsla,
    Bsra,
    Bsrl,
    Bsrf,
    Brlc,
    Mul,
    Outinb = "OutInB",
    Nextreg = "NextReg",
    Pixeldn = "PixelDn",
    Pixelad = "PixelAd",
    Setae = "SetAE",
    Ldix,
    Ldws,
    Lddx,
    Ldirx,
    Ldpirx,
    Lddrx,

    // === Operators and punctuation ===
    Colon,
    DoubleColon,
    Comma,
    Assign,
    Equal,
    CiEqual,
    NotEqual,
    CiNotEqual,
    LPar,
    RPar,
    LSBrac,
    RSBrac,
    QuestionMark,
    Plus,
    Minus,
    GoesTo,
    VerticalBar,
    UpArrow,
    Ampersand,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LeftShift,
    RightShift,
    MinOp,
    MaxOp,
    Multiplication,
    Divide,
    Modulo,
    BinaryNot,
    Exclamation,
    LDBrac,
    RDBrac,
    Dot,
    /// `:=` and the `.var` pragma.
    Var,

    Identifier,

    // === Pragmas ===
    Org,
    Xorg,
    Ent,
    Xent,
    Equ,
    Disp,
    Defb,
    Defw,
    Defm,
    Defn,
    Defh,
    Defgx,
    Defg,
    Defc,
    Defs,
    Skip,
    Extern,
    Fillb,
    Fillw,
    Model,
    Align,
    Trace,
    TraceHex,
    RndSeed,
    Error,
    IncludeBin,
    CompareBin,
    Bank,
    ZxBasic,
    InjectOpt,

    // === Statements ===
    Macro,
    Endm,
    Proc,
    Endp,
    Loop,
    Endl,
    Repeat,
    Until,
    While,
    Endw,
    If,
    IfUsed,
    IfNUsed,
    Elif,
    Else,
    Endif,
    For,
    To,
    Step,
    Next,
    Break,
    Continue,
    Module,
    EndModule,
    Struct,
    Ends,
    Local,

    // === Built-in functions ===
    TextOf,
    LTextOf,
    HReg,
    LReg,
    Def,
    IsReg8,
    IsReg8Std,
    IsReg8Spec,
    IsReg8Idx,
    IsReg16,
    IsReg16Std,
    IsReg16Idx,
    IsRegIndirect,
    IsCPort,
    IsIndexedAddr,
    IsCondition,
    IsExpr,
    IsRegA,
    IsRegAf,
    IsRegB,
    IsRegC,
    IsRegBc,
    IsRegD,
    IsRegE,
    IsRegDe,
    IsRegH,
    IsRegL,
    IsRegHl,
    IsRegI,
    IsRegR,
    IsRegXh,
    IsRegXl,
    IsRegIx,
    IsRegYh,
    IsRegYl,
    IsRegIy,
    IsRegSp,

    // === Literal keywords and pseudo-literals ===
    True,
    False,
    /// `$cnt` / `.cnt`, the loop counter.
    CurCnt,
    /// `$`, the current assembly address.
    CurAddress,
    /// The `$<none>$` placeholder.
    NoneArg,

    // === Preprocessor directives ===
    IfDefDir,
    IfNDefDir,
    EndIfDir,
    ElseDir,
    DefineDir,
    UndefDir,
    IncludeDir,
    IfDir,
    IfModDir,
    IfNModDir,
    LineDir,

    // === Literals ===
    BinaryLiteral,
    OctalLiteral,
    DecimalLiteral,
    HexadecimalLiteral,
    RealLiteral,
    CharLiteral,
    StringLiteral,
}

impl TokenType {
    /// Returns `true` for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Ws | Self::InlineComment | Self::EolComment)
    }

    /// Returns `true` for comments.
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::InlineComment | Self::EolComment)
    }

    /// Returns `true` if this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an unrecognized lexeme.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns `true` if this token ends an assembly line.
    #[must_use]
    pub const fn is_line_end(self) -> bool {
        matches!(self, Self::NewLine | Self::Eof)
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A token: its source text, type and location.
///
/// # Examples
///
/// ```
/// use z80asm_core::source_analysis::{Token, TokenLocation, TokenType};
///
/// let token = Token::new("djnz", TokenType::Djnz, TokenLocation::new(0, 4, 1, 0, 4));
/// assert_eq!(token.text(), "djnz");
/// assert_eq!(token.token_type(), TokenType::Djnz);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: EcoString,
    token_type: TokenType,
    location: TokenLocation,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(text: impl Into<EcoString>, token_type: TokenType, location: TokenLocation) -> Self {
        Self {
            text: text.into(),
            token_type,
            location,
        }
    }

    /// Returns the exact source text of the token.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the token type.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Returns the token location.
    #[must_use]
    pub const fn location(&self) -> TokenLocation {
        self.location
    }

    /// Consumes the token, returning its text.
    #[must_use]
    pub fn into_text(self) -> EcoString {
        self.text
    }
}
