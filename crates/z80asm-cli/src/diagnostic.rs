// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error diagnostics using miette.
//!
//! Converts z80asm-core diagnostics into miette-formatted errors with:
//! - Source code context around the failing line
//! - A label under the offending tokens
//! - The stable `Z1xxx` error code

use miette::{Diagnostic, LabeledSpan, SourceCode, SourceSpan};
use z80asm_core::source_analysis::{Diagnostic as CoreDiagnostic, ErrorCode};

/// A syntax diagnostic bound to the file it was found in.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source code for context
    pub src: miette::NamedSource<String>,
    /// Location of the error
    pub span: SourceSpan,
}

impl SourceDiagnostic {
    /// Create a new diagnostic from a z80asm-core diagnostic.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        Self {
            code: diagnostic.code,
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: (
                diagnostic.location.start_pos() as usize,
                diagnostic.location.len() as usize,
            )
                .into(),
        }
    }
}

// The code varies per diagnostic, which the derive macro cannot express.
impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("error here".to_string()),
            self.span,
        ))))
    }
}
