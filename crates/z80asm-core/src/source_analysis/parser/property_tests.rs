// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Z80 assembly parser.
//!
//! These tests use `proptest` to verify parser invariants over generated inputs:
//!
//! 1. **Parser never panics**: arbitrary string input always returns a result
//! 2. **Diagnostic locations within input**: every location ends at or before `input.len()`
//! 3. **Valid lines parse cleanly**: lines from the seed corpus never report errors
//! 4. **Line-level recovery**: each source line yields at most one node or one diagnostic
//! 5. **Error messages are user-facing**: no internal type names in diagnostics

use proptest::prelude::*;

use crate::source_analysis::parse;

// ============================================================================
// Near-valid assembly generators
// ============================================================================

/// Valid assembly lines for composing near-valid inputs.
const VALID_LINES: &[&str] = &[
    "nop",
    "ld a,b",
    "ld hl,#4000",
    "ld (ix+2),a",
    "ld a,(iy-3)",
    "ld (#5c00),hl",
    "ex af,af'",
    "add a,(hl)",
    "sub 12",
    "push af",
    "bit 7,(hl)",
    "rlc (ix+1),b",
    "in a,(c)",
    "out (#fe),a",
    "djnz again",
    "jr nz,back",
    "jp (hl)",
    "call pe,::Main",
    "ret z",
    "start: halt",
    "count equ 10",
    "value = count * 2 + 1",
    "defb 1, 2, \"text\", 'A'",
    "defw $, %1010, 0x12, 17q",
    "defs 10, #ff",
    "mul d,e",
    "bsla de,b",
    "nextreg #07,a",
    "mirror a",
    "Delay: macro(ticks)",
    "endm",
    "for idx = 1 to 8 step 2",
    "next",
    "if isreg8(b) ? 1 : 0",
    "endif",
    "#ifdef DEBUG",
    "#include \"defs.z80asm\"",
    "MyMacro(a, #10, (hl))",
    "ld a,{{value}} ; comment",
    "/* block */ nop // trailing",
];

/// Generates a line from the valid corpus.
fn valid_line() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_LINES).prop_map(std::string::ToString::to_string)
}

/// Generates a truncated valid line (cut at a random char boundary).
fn truncated_line() -> impl Strategy<Value = String> {
    valid_line().prop_flat_map(|s| {
        let boundaries: Vec<usize> = s.char_indices().map(|(index, _)| index).skip(1).collect();
        if boundaries.is_empty() {
            Just(s).boxed()
        } else {
            prop::sample::select(boundaries)
                .prop_map(move |cut| s[..cut].to_string())
                .boxed()
        }
    })
}

/// Generates a line with mismatched parentheses and commas removed.
fn mangled_line() -> impl Strategy<Value = String> {
    valid_line().prop_map(|s| {
        s.chars()
            .filter(|&ch| ch != ',')
            .map(|ch| match ch {
                '(' => '[',
                ')' => '}',
                _ => ch,
            })
            .collect()
    })
}

/// Generates a line using one of several mutation strategies.
fn near_valid_line() -> impl Strategy<Value = String> {
    prop_oneof![valid_line(), truncated_line(), mangled_line()]
}

/// Generates a multi-line program of near-valid lines.
fn near_valid_program() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(near_valid_line(), 1..20)
}

/// Internal names that should never appear in user-facing diagnostics.
const INTERNAL_NAMES: &[&str] = &[
    "TokenType",
    "unwrap()",
    "panic!",
    "unreachable!",
    "Expression::",
    "Operand::",
    "SyntaxError::",
    "internal error",
];

// ============================================================================
// Property tests
// ============================================================================

/// Default is 512 cases for standard CI; override via `PROPTEST_CASES` env var
/// for nightly extended runs (e.g., `PROPTEST_CASES=10000`).
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        // Use at least 512 cases, but allow PROPTEST_CASES to increase beyond that
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: Parser never panics on arbitrary string input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,500}") {
        let _result = parse(&input);
    }

    /// Property 1b: Parser never panics on near-valid programs, which
    /// exercise line recovery more deeply.
    #[test]
    fn parser_never_panics_near_valid(lines in near_valid_program()) {
        let _result = parse(&lines.join("\n"));
    }

    /// Property 2: All diagnostic locations are within the input bounds.
    #[test]
    fn diagnostic_locations_within_input(input in "\\PC{0,500}") {
        let result = parse(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for diag in &result.errors {
            prop_assert!(
                diag.location.end_pos() <= input_len,
                "Diagnostic end {} exceeds input length {} for input {:?}: {}",
                diag.location.end_pos(),
                input_len,
                input,
                diag,
            );
            prop_assert!(
                diag.location.start_pos() <= diag.location.end_pos(),
                "Diagnostic start {} > end {} for input {:?}: {}",
                diag.location.start_pos(),
                diag.location.end_pos(),
                input,
                diag,
            );
        }
    }

    /// Property 3: Programs built from valid lines parse without errors,
    /// one node per line.
    #[test]
    fn valid_lines_parse_cleanly(lines in prop::collection::vec(valid_line(), 1..20)) {
        let result = parse(&lines.join("\n"));
        prop_assert!(!result.has_errors(), "Unexpected errors: {:?}", result.errors);
        prop_assert_eq!(result.assembly_lines.len(), lines.len());
        for (index, line) in result.assembly_lines.iter().enumerate() {
            prop_assert_eq!(line.location.line() as usize, index + 1);
        }
    }

    /// Property 4: A source line yields at most one node or one diagnostic.
    #[test]
    fn one_outcome_per_line(lines in near_valid_program()) {
        let result = parse(&lines.join("\n"));
        prop_assert!(
            result.assembly_lines.len() + result.errors.len() <= lines.len(),
            "{} nodes and {} errors for {} lines",
            result.assembly_lines.len(),
            result.errors.len(),
            lines.len(),
        );
        let mut error_lines: Vec<u32> = result.errors.iter().map(|e| e.location.line()).collect();
        error_lines.dedup();
        prop_assert_eq!(error_lines.len(), result.errors.len());
    }

    /// Property 5: Error messages are user-facing (no internal type names).
    #[test]
    fn error_messages_are_user_facing(lines in near_valid_program()) {
        let result = parse(&lines.join("\n"));
        for diag in &result.errors {
            for internal in INTERNAL_NAMES {
                prop_assert!(
                    !diag.message.contains(internal),
                    "Diagnostic message contains internal name {:?}: {:?}",
                    internal,
                    diag.message,
                );
            }
        }
    }
}
