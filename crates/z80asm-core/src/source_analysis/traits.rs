// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token classification table.
//!
//! The parser asks "can this token start an expression?" or "is this an
//! 8-bit register?" through [`traits`] instead of listing token types in
//! every grammar rule. The table is an exhaustive `match`, so a new
//! [`TokenType`] does not compile until it has been classified.

use super::TokenType;

/// A set of syntactic capabilities of a token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenTraits(u32);

impl TokenTraits {
    /// No capabilities.
    pub const NONE: Self = Self(0);
    /// A Z80 or Next mnemonic.
    pub const INSTRUCTION: Self = Self(1 << 0);
    /// A mnemonic that takes no operands.
    pub const SIMPLE: Self = Self(1 << 1);
    /// An assembler pragma (`.org`, `.defb`, `=`).
    pub const PRAGMA: Self = Self(1 << 2);
    /// A block-structuring statement (`.macro`, `.loop`, `.if`).
    pub const STATEMENT: Self = Self(1 << 3);
    /// A preprocessor directive (`#ifdef`).
    pub const DIRECTIVE: Self = Self(1 << 4);
    /// The token can begin an expression.
    pub const EXPRESSION_START: Self = Self(1 << 5);
    /// A built-in function name (`isreg8`, `textof`).
    pub const BUILT_IN_FUNCTION: Self = Self(1 << 6);
    /// A literal value.
    pub const LITERAL: Self = Self(1 << 7);
    /// Any register.
    pub const REG: Self = Self(1 << 8);
    /// A standard 8-bit register (`a b c d e h l`).
    pub const REG8: Self = Self(1 << 9);
    /// `i` or `r`.
    pub const REG8_SPEC: Self = Self(1 << 10);
    /// An index register half (`xl xh yl yh`).
    pub const REG8_IDX: Self = Self(1 << 11);
    /// A standard 16-bit register (`bc de hl sp`).
    pub const REG16: Self = Self(1 << 12);
    /// `af` or `af'`.
    pub const REG16_SPEC: Self = Self(1 << 13);
    /// An index register (`ix iy`).
    pub const REG16_IDX: Self = Self(1 << 14);
    /// A condition usable by `jp`, `call` and `ret`.
    pub const CONDITION: Self = Self(1 << 15);
    /// A condition usable by `jr`.
    pub const REL_CONDITION: Self = Self(1 << 16);

    /// Combines two trait sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if every capability in `other` is present in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if the set has no capabilities.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn instruction(self) -> bool {
        self.contains(Self::INSTRUCTION)
    }

    #[must_use]
    pub const fn simple(self) -> bool {
        self.contains(Self::SIMPLE)
    }

    #[must_use]
    pub const fn pragma(self) -> bool {
        self.contains(Self::PRAGMA)
    }

    #[must_use]
    pub const fn statement(self) -> bool {
        self.contains(Self::STATEMENT)
    }

    #[must_use]
    pub const fn directive(self) -> bool {
        self.contains(Self::DIRECTIVE)
    }

    #[must_use]
    pub const fn expression_start(self) -> bool {
        self.contains(Self::EXPRESSION_START)
    }

    #[must_use]
    pub const fn built_in_function(self) -> bool {
        self.contains(Self::BUILT_IN_FUNCTION)
    }

    #[must_use]
    pub const fn literal(self) -> bool {
        self.contains(Self::LITERAL)
    }

    #[must_use]
    pub const fn reg(self) -> bool {
        self.contains(Self::REG)
    }

    #[must_use]
    pub const fn reg8(self) -> bool {
        self.contains(Self::REG8)
    }

    #[must_use]
    pub const fn reg8_spec(self) -> bool {
        self.contains(Self::REG8_SPEC)
    }

    #[must_use]
    pub const fn reg8_idx(self) -> bool {
        self.contains(Self::REG8_IDX)
    }

    #[must_use]
    pub const fn reg16(self) -> bool {
        self.contains(Self::REG16)
    }

    #[must_use]
    pub const fn reg16_spec(self) -> bool {
        self.contains(Self::REG16_SPEC)
    }

    #[must_use]
    pub const fn reg16_idx(self) -> bool {
        self.contains(Self::REG16_IDX)
    }

    #[must_use]
    pub const fn condition(self) -> bool {
        self.contains(Self::CONDITION)
    }

    #[must_use]
    pub const fn rel_condition(self) -> bool {
        self.contains(Self::REL_CONDITION)
    }
}

const REG8: TokenTraits = TokenTraits::REG.union(TokenTraits::REG8);
const REG8_SPEC: TokenTraits = TokenTraits::REG.union(TokenTraits::REG8_SPEC);
const REG8_IDX: TokenTraits = TokenTraits::REG.union(TokenTraits::REG8_IDX);
const REG16: TokenTraits = TokenTraits::REG.union(TokenTraits::REG16);
const REG16_SPEC: TokenTraits = TokenTraits::REG.union(TokenTraits::REG16_SPEC);
const REG16_IDX: TokenTraits = TokenTraits::REG.union(TokenTraits::REG16_IDX);
const REL_CONDITION: TokenTraits = TokenTraits::CONDITION.union(TokenTraits::REL_CONDITION);
const SIMPLE_INSTRUCTION: TokenTraits = TokenTraits::INSTRUCTION.union(TokenTraits::SIMPLE);
const LITERAL: TokenTraits = TokenTraits::EXPRESSION_START.union(TokenTraits::LITERAL);
const FUNCTION: TokenTraits =
    TokenTraits::EXPRESSION_START.union(TokenTraits::BUILT_IN_FUNCTION);

/// Returns the capabilities of a token type.
///
/// # Examples
///
/// ```
/// use z80asm_core::source_analysis::{TokenType, traits};
///
/// assert!(traits(TokenType::C).reg8());
/// assert!(traits(TokenType::C).rel_condition());
/// assert!(traits(TokenType::Po).condition());
/// assert!(!traits(TokenType::Po).rel_condition());
/// assert!(traits(TokenType::Ws).is_empty());
/// ```
#[must_use]
#[expect(
    clippy::too_many_lines,
    reason = "one arm per token family keeps the table readable"
)]
pub const fn traits(token_type: TokenType) -> TokenTraits {
    use TokenType as T;

    match token_type {
        T::Eof
        | T::Ws
        | T::InlineComment
        | T::EolComment
        | T::Unknown
        | T::NewLine
        | T::Colon
        | T::Comma
        | T::Equal
        | T::CiEqual
        | T::NotEqual
        | T::CiNotEqual
        | T::RPar
        | T::RSBrac
        | T::QuestionMark
        | T::GoesTo
        | T::VerticalBar
        | T::UpArrow
        | T::Ampersand
        | T::LessThan
        | T::LessThanOrEqual
        | T::GreaterThan
        | T::GreaterThanOrEqual
        | T::LeftShift
        | T::RightShift
        | T::MinOp
        | T::MaxOp
        | T::Divide
        | T::Modulo
        | T::RDBrac
        | T::To
        | T::Step
        | T::NoneArg => TokenTraits::NONE,

        T::A | T::B | T::D | T::E | T::H | T::L => REG8,
        T::C => REG8.union(REL_CONDITION),
        T::I | T::R => REG8_SPEC,
        T::Xl | T::Xh | T::Yl | T::Yh => REG8_IDX,
        T::Bc | T::De | T::Hl | T::Sp => REG16,
        T::Af | T::AfPrime => REG16_SPEC,
        T::Ix | T::Iy => REG16_IDX,

        T::Z | T::Nz | T::Nc => REL_CONDITION,
        T::Po | T::Pe | T::P | T::M => TokenTraits::CONDITION,

        T::Nop
        | T::Rlca
        | T::Rrca
        | T::Rla
        | T::Rra
        | T::Daa
        | T::Cpl
        | T::Scf
        | T::Ccf
        | T::Halt
        | T::Exx
        | T::Di
        | T::Ei
        | T::Neg
        | T::Retn
        | T::Reti
        | T::Rld
        | T::Rrd
        | T::Ldi
        | T::Cpi
        | T::Ini
        | T::Outi
        | T::Ldd
        | T::Cpd
        | T::Ind
        | T::Outd
        | T::Ldir
        | T::Cpir
        | T::Inir
        | T::Otir
        | T::Lddr
        | T::Cpdr
        | T::Indr
        | T::Otdr
        | T::Swapnib
        | T::Outinb
        | T::Pixeldn
        | T::Pixelad
        | T::Setae
        | T::Ldix
        | T::Ldws
        | T::Lddx
        | T::Ldirx
        | T::Ldpirx
        | T::Lddrx => SIMPLE_INSTRUCTION,

        T::Ret
        | T::Ld
        | T::Inc
        | T::Dec
        | T::Ex
        | T::Add
        | T::Adc
        | T::Sub
        | T::Sbc
        | T::And
        | T::Xor
        | T::Or
        | T::Cp
        | T::Djnz
        | T::Jr
        | T::Jp
        | T::Call
        | T::Rst
        | T::Push
        | T::Pop
        | T::In
        | T::Out
        | T::Im
        | T::Rlc
        | T::Rrc
        | T::Rl
        | T::Rr
        | T::Sla
        | T::Sra
        | T::Sll
        | T::Srl
        | T::Bit
        | T::Res
        | T::Set
        | T::Mirror
        | T::Test
        | T::Bsla
        | T::Bsra
        | T::Bsrl
        | T::Bsrf
        | T::Brlc
        | T::Mul
        | T::Nextreg => TokenTraits::INSTRUCTION,

        T::Assign
        | T::Var
        | T::Org
        | T::Xorg
        | T::Ent
        | T::Xent
        | T::Equ
        | T::Disp
        | T::Defb
        | T::Defw
        | T::Defm
        | T::Defn
        | T::Defh
        | T::Defgx
        | T::Defg
        | T::Defc
        | T::Defs
        | T::Skip
        | T::Extern
        | T::Fillb
        | T::Fillw
        | T::Model
        | T::Align
        | T::Trace
        | T::TraceHex
        | T::RndSeed
        | T::Error
        | T::IncludeBin
        | T::CompareBin
        | T::Bank
        | T::ZxBasic
        | T::InjectOpt => TokenTraits::PRAGMA,

        T::Macro
        | T::Endm
        | T::Proc
        | T::Endp
        | T::Loop
        | T::Endl
        | T::Repeat
        | T::Until
        | T::While
        | T::Endw
        | T::If
        | T::IfUsed
        | T::IfNUsed
        | T::Elif
        | T::Else
        | T::Endif
        | T::For
        | T::Next
        | T::Break
        | T::Continue
        | T::Module
        | T::EndModule
        | T::Struct
        | T::Ends
        | T::Local => TokenTraits::STATEMENT,

        T::IfDefDir
        | T::IfNDefDir
        | T::EndIfDir
        | T::ElseDir
        | T::DefineDir
        | T::UndefDir
        | T::IncludeDir
        | T::IfDir
        | T::IfModDir
        | T::IfNModDir
        | T::LineDir => TokenTraits::DIRECTIVE,

        T::TextOf
        | T::LTextOf
        | T::HReg
        | T::LReg
        | T::Def
        | T::IsReg8
        | T::IsReg8Std
        | T::IsReg8Spec
        | T::IsReg8Idx
        | T::IsReg16
        | T::IsReg16Std
        | T::IsReg16Idx
        | T::IsRegIndirect
        | T::IsCPort
        | T::IsIndexedAddr
        | T::IsCondition
        | T::IsExpr
        | T::IsRegA
        | T::IsRegAf
        | T::IsRegB
        | T::IsRegC
        | T::IsRegBc
        | T::IsRegD
        | T::IsRegE
        | T::IsRegDe
        | T::IsRegH
        | T::IsRegL
        | T::IsRegHl
        | T::IsRegI
        | T::IsRegR
        | T::IsRegXh
        | T::IsRegXl
        | T::IsRegIx
        | T::IsRegYh
        | T::IsRegYl
        | T::IsRegIy
        | T::IsRegSp => FUNCTION,

        T::BinaryLiteral
        | T::OctalLiteral
        | T::DecimalLiteral
        | T::HexadecimalLiteral
        | T::RealLiteral
        | T::CharLiteral
        | T::StringLiteral
        | T::CurAddress
        | T::CurCnt
        | T::True
        | T::False
        | T::Dot
        | T::Multiplication => LITERAL,

        T::Identifier
        | T::LPar
        | T::LSBrac
        | T::LDBrac
        | T::Plus
        | T::Minus
        | T::Exclamation
        | T::BinaryNot
        | T::DoubleColon => TokenTraits::EXPRESSION_START,
    }
}
