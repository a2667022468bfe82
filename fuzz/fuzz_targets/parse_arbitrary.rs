// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for lexer and parser crash safety.
//!
//! Feeds arbitrary byte sequences to the lexer and the parser and asserts
//! that neither panics. Every input must produce tokens, assembly lines
//! and diagnostics, never a crash.
//!
//! # Success Criteria
//!
//! - No panic on any input
//! - Token locations always re-slice the source
//! - Diagnostic locations never run past the end of the source
//!
//! # Corpus Seeding
//!
//! Seed `fuzz/corpus/parse_arbitrary/` with `.asm` and `.z80asm` files to
//! give the mutator realistic starting points.

#![no_main]

use libfuzzer_sys::fuzz_target;
use z80asm_core::source_analysis::{lex_with_eof, parse};

fuzz_target!(|data: &[u8]| {
    // Sources are read as UTF-8 before they reach the lexer
    if let Ok(source) = std::str::from_utf8(data) {
        for token in lex_with_eof(source) {
            assert_eq!(&source[token.location().as_range()], token.text());
        }

        let result = parse(source);
        for diagnostic in &result.errors {
            assert!(diagnostic.location.end_pos() as usize <= source.len());
        }
    }
});
