// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Dump the token stream of a source file.
//!
//! Each token prints as `line:start_column-end_column <TokenType> <text>`,
//! with control characters in the text escaped so every token stays on one
//! output line.

use camino::Utf8PathBuf;
use miette::{Context, IntoDiagnostic, Result};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use tracing::{debug, instrument};
use z80asm_core::source_analysis::{Lexer, Token};

/// Print the tokens of `file`, including trivia when `include_ws` is set.
#[instrument(skip_all, fields(path = %file))]
pub fn tokens(file: &str, include_ws: bool) -> Result<()> {
    let path = Utf8PathBuf::from(file);
    let source = fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read file '{path}'"))?;

    let listing = render_tokens(&source, include_ws);
    debug!(bytes = listing.len(), "Rendered token listing");

    std::io::stdout()
        .lock()
        .write_all(listing.as_bytes())
        .into_diagnostic()
}

/// Render one line per token, excluding the final EOF.
fn render_tokens(source: &str, include_ws: bool) -> String {
    let mut lexer = Lexer::new(source);
    let mut listing = String::new();
    loop {
        let token = lexer.get(include_ws);
        if token.token_type().is_eof() {
            break;
        }
        write_token(&mut listing, &token);
    }
    listing
}

fn write_token(out: &mut String, token: &Token) {
    let location = token.location();
    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "{}:{}-{} {} {}",
        location.line(),
        location.start_column(),
        location.end_column(),
        token.token_type(),
        token.text().escape_debug()
    );
}
