// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Reserved word resolution.
//!
//! The lexer hands every identifier-like lexeme (`ld`, `.org`, `#ifdef`,
//! `$cnt`) to [`resolve_keyword`]. The table is keyed by lower-case spelling
//! and built once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::TokenType;

/// Reserved words that have no dotted spelling.
const PLAIN_KEYWORDS: &[(&str, TokenType)] = &[
    // Registers
    ("a", TokenType::A),
    ("b", TokenType::B),
    ("c", TokenType::C),
    ("d", TokenType::D),
    ("e", TokenType::E),
    ("h", TokenType::H),
    ("l", TokenType::L),
    ("i", TokenType::I),
    ("r", TokenType::R),
    ("xl", TokenType::Xl),
    ("ixl", TokenType::Xl),
    ("xh", TokenType::Xh),
    ("ixh", TokenType::Xh),
    ("yl", TokenType::Yl),
    ("iyl", TokenType::Yl),
    ("yh", TokenType::Yh),
    ("iyh", TokenType::Yh),
    ("bc", TokenType::Bc),
    ("de", TokenType::De),
    ("hl", TokenType::Hl),
    ("sp", TokenType::Sp),
    ("ix", TokenType::Ix),
    ("iy", TokenType::Iy),
    ("af", TokenType::Af),
    ("af'", TokenType::AfPrime),
    // Conditions
    ("z", TokenType::Z),
    ("nz", TokenType::Nz),
    ("nc", TokenType::Nc),
    ("po", TokenType::Po),
    ("pe", TokenType::Pe),
    ("p", TokenType::P),
    ("m", TokenType::M),
    // Operand-less instructions
    ("nop", TokenType::Nop),
    ("rlca", TokenType::Rlca),
    ("rrca", TokenType::Rrca),
    ("rla", TokenType::Rla),
    ("rra", TokenType::Rra),
    ("daa", TokenType::Daa),
    ("cpl", TokenType::Cpl),
    ("scf", TokenType::Scf),
    ("ccf", TokenType::Ccf),
    ("halt", TokenType::Halt),
    ("exx", TokenType::Exx),
    ("di", TokenType::Di),
    ("ei", TokenType::Ei),
    ("neg", TokenType::Neg),
    ("retn", TokenType::Retn),
    ("reti", TokenType::Reti),
    ("rld", TokenType::Rld),
    ("rrd", TokenType::Rrd),
    ("ldi", TokenType::Ldi),
    ("cpi", TokenType::Cpi),
    ("ini", TokenType::Ini),
    ("outi", TokenType::Outi),
    ("ldd", TokenType::Ldd),
    ("cpd", TokenType::Cpd),
    ("ind", TokenType::Ind),
    ("outd", TokenType::Outd),
    ("ldir", TokenType::Ldir),
    ("cpir", TokenType::Cpir),
    ("inir", TokenType::Inir),
    ("otir", TokenType::Otir),
    ("lddr", TokenType::Lddr),
    ("cpdr", TokenType::Cpdr),
    ("indr", TokenType::Indr),
    ("otdr", TokenType::Otdr),
    // Instructions with operands
    ("ret", TokenType::Ret),
    ("ld", TokenType::Ld),
    ("inc", TokenType::Inc),
    ("dec", TokenType::Dec),
    ("ex", TokenType::Ex),
    ("add", TokenType::Add),
    ("adc", TokenType::Adc),
    ("sub", TokenType::Sub),
    ("sbc", TokenType::Sbc),
    ("and", TokenType::And),
    ("xor", TokenType::Xor),
    ("or", TokenType::Or),
    ("cp", TokenType::Cp),
    ("djnz", TokenType::Djnz),
    ("jr", TokenType::Jr),
    ("jp", TokenType::Jp),
    ("call", TokenType::Call),
    ("rst", TokenType::Rst),
    ("push", TokenType::Push),
    ("pop", TokenType::Pop),
    ("in", TokenType::In),
    ("out", TokenType::Out),
    ("im", TokenType::Im),
    ("rlc", TokenType::Rlc),
    ("rrc", TokenType::Rrc),
    ("rl", TokenType::Rl),
    ("rr", TokenType::Rr),
    ("sla", TokenType::Sla),
    ("sra", TokenType::Sra),
    ("sll", TokenType::Sll),
    ("srl", TokenType::Srl),
    ("bit", TokenType::Bit),
    ("res", TokenType::Res),
    ("set", TokenType::Set),
    // ZX Spectrum Next
    ("swapnib", TokenType::Swapnib),
    ("mirror", TokenType::Mirror),
    ("test", TokenType::Test),
    ("bsla", TokenType::Bsla),
    ("bsra", TokenType::Bsra),
    ("bsrl", TokenType::Bsrl),
    ("bsrf", TokenType::Bsrf),
    ("brlc", TokenType::Brlc),
    ("mul", TokenType::Mul),
    ("outinb", TokenType::Outinb),
    ("nextreg", TokenType::Nextreg),
    ("pixeldn", TokenType::Pixeldn),
    ("pixelad", TokenType::Pixelad),
    ("setae", TokenType::Setae),
    ("ldix", TokenType::Ldix),
    ("ldws", TokenType::Ldws),
    ("lddx", TokenType::Lddx),
    ("ldirx", TokenType::Ldirx),
    ("ldpirx", TokenType::Ldpirx),
    ("lddrx", TokenType::Lddrx),
    // Built-in functions
    ("textof", TokenType::TextOf),
    ("ltextof", TokenType::LTextOf),
    ("hreg", TokenType::HReg),
    ("lreg", TokenType::LReg),
    ("def", TokenType::Def),
    ("isreg8", TokenType::IsReg8),
    ("isreg8std", TokenType::IsReg8Std),
    ("isreg8spec", TokenType::IsReg8Spec),
    ("isreg8idx", TokenType::IsReg8Idx),
    ("isreg16", TokenType::IsReg16),
    ("isreg16std", TokenType::IsReg16Std),
    ("isreg16idx", TokenType::IsReg16Idx),
    ("isregindirect", TokenType::IsRegIndirect),
    ("iscport", TokenType::IsCPort),
    ("isindexedaddr", TokenType::IsIndexedAddr),
    ("iscondition", TokenType::IsCondition),
    ("isexpr", TokenType::IsExpr),
    ("isrega", TokenType::IsRegA),
    ("isregaf", TokenType::IsRegAf),
    ("isregb", TokenType::IsRegB),
    ("isregc", TokenType::IsRegC),
    ("isregbc", TokenType::IsRegBc),
    ("isregd", TokenType::IsRegD),
    ("isrege", TokenType::IsRegE),
    ("isregde", TokenType::IsRegDe),
    ("isregh", TokenType::IsRegH),
    ("isregl", TokenType::IsRegL),
    ("isreghl", TokenType::IsRegHl),
    ("isregi", TokenType::IsRegI),
    ("isregr", TokenType::IsRegR),
    ("isregxh", TokenType::IsRegXh),
    ("isregxl", TokenType::IsRegXl),
    ("isregix", TokenType::IsRegIx),
    ("isregyh", TokenType::IsRegYh),
    ("isregyl", TokenType::IsRegYl),
    ("isregiy", TokenType::IsRegIy),
    ("isregsp", TokenType::IsRegSp),
    // Current loop counter
    ("$cnt", TokenType::CurCnt),
    // Preprocessor directives
    ("#ifdef", TokenType::IfDefDir),
    ("#ifndef", TokenType::IfNDefDir),
    ("#endif", TokenType::EndIfDir),
    ("#else", TokenType::ElseDir),
    ("#define", TokenType::DefineDir),
    ("#undef", TokenType::UndefDir),
    ("#include", TokenType::IncludeDir),
    ("#if", TokenType::IfDir),
    ("#ifmod", TokenType::IfModDir),
    ("#ifnmod", TokenType::IfNModDir),
    ("#line", TokenType::LineDir),
];

/// Reserved words accepted both bare and with a leading `.` (`org`, `.org`).
const DOTTED_KEYWORDS: &[(&str, TokenType)] = &[
    // Pragmas
    ("org", TokenType::Org),
    ("xorg", TokenType::Xorg),
    ("ent", TokenType::Ent),
    ("xent", TokenType::Xent),
    ("equ", TokenType::Equ),
    ("var", TokenType::Var),
    ("disp", TokenType::Disp),
    ("defb", TokenType::Defb),
    ("db", TokenType::Defb),
    ("defw", TokenType::Defw),
    ("dw", TokenType::Defw),
    ("defm", TokenType::Defm),
    ("dm", TokenType::Defm),
    ("defn", TokenType::Defn),
    ("dn", TokenType::Defn),
    ("defh", TokenType::Defh),
    ("dh", TokenType::Defh),
    ("defgx", TokenType::Defgx),
    ("dgx", TokenType::Defgx),
    ("defg", TokenType::Defg),
    ("dg", TokenType::Defg),
    ("defc", TokenType::Defc),
    ("dc", TokenType::Defc),
    ("defs", TokenType::Defs),
    ("ds", TokenType::Defs),
    ("skip", TokenType::Skip),
    ("extern", TokenType::Extern),
    ("fillb", TokenType::Fillb),
    ("fillw", TokenType::Fillw),
    ("model", TokenType::Model),
    ("align", TokenType::Align),
    ("trace", TokenType::Trace),
    ("tracehex", TokenType::TraceHex),
    ("rndseed", TokenType::RndSeed),
    ("error", TokenType::Error),
    ("includebin", TokenType::IncludeBin),
    ("include_bin", TokenType::IncludeBin),
    ("comparebin", TokenType::CompareBin),
    ("bank", TokenType::Bank),
    ("zxbasic", TokenType::ZxBasic),
    ("injectopt", TokenType::InjectOpt),
    // Statements
    ("macro", TokenType::Macro),
    ("endm", TokenType::Endm),
    ("mend", TokenType::Endm),
    ("proc", TokenType::Proc),
    ("endp", TokenType::Endp),
    ("pend", TokenType::Endp),
    ("loop", TokenType::Loop),
    ("endl", TokenType::Endl),
    ("lend", TokenType::Endl),
    ("repeat", TokenType::Repeat),
    ("until", TokenType::Until),
    ("while", TokenType::While),
    ("endw", TokenType::Endw),
    ("wend", TokenType::Endw),
    ("if", TokenType::If),
    ("ifused", TokenType::IfUsed),
    ("ifnused", TokenType::IfNUsed),
    ("elif", TokenType::Elif),
    ("else", TokenType::Else),
    ("endif", TokenType::Endif),
    ("for", TokenType::For),
    ("to", TokenType::To),
    ("step", TokenType::Step),
    ("next", TokenType::Next),
    ("break", TokenType::Break),
    ("continue", TokenType::Continue),
    ("module", TokenType::Module),
    ("scope", TokenType::Module),
    ("endmodule", TokenType::EndModule),
    ("endscope", TokenType::EndModule),
    ("moduleend", TokenType::EndModule),
    ("scopeend", TokenType::EndModule),
    ("struct", TokenType::Struct),
    ("ends", TokenType::Ends),
    ("local", TokenType::Local),
    // Literal keywords
    ("true", TokenType::True),
    ("false", TokenType::False),
    ("cnt", TokenType::CurCnt),
];

static KEYWORDS: LazyLock<HashMap<String, TokenType>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(PLAIN_KEYWORDS.len() + 2 * DOTTED_KEYWORDS.len());
    for &(spelling, token_type) in PLAIN_KEYWORDS {
        map.insert(spelling.to_owned(), token_type);
    }
    for &(spelling, token_type) in DOTTED_KEYWORDS {
        // `cnt` is only reserved as `.cnt`; bare `cnt` stays a symbol.
        if spelling != "cnt" {
            map.insert(spelling.to_owned(), token_type);
        }
        map.insert(format!(".{spelling}"), token_type);
    }
    map
});

/// Looks up `text` in the reserved word table, ignoring case.
///
/// # Examples
///
/// ```
/// use z80asm_core::source_analysis::{TokenType, resolve_keyword};
///
/// assert_eq!(resolve_keyword("Ld"), Some(TokenType::Ld));
/// assert_eq!(resolve_keyword(".ORG"), Some(TokenType::Org));
/// assert_eq!(resolve_keyword("#ifdef"), Some(TokenType::IfDefDir));
/// assert_eq!(resolve_keyword("counter"), None);
/// ```
#[must_use]
pub fn resolve_keyword(text: &str) -> Option<TokenType> {
    if text.bytes().any(|b| b.is_ascii_uppercase()) {
        KEYWORDS.get(&text.to_ascii_lowercase()).copied()
    } else {
        KEYWORDS.get(text).copied()
    }
}
