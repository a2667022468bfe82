// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and assembly line carries a [`TokenLocation`]: the byte range
//! it covers plus the line and column where it starts and ends. Editors use
//! the line/column pair, renderers use the byte range.

use std::ops::Range;

/// The location of a token (or a whole assembly line) in the source.
///
/// Offsets are byte offsets into the source buffer, so slicing the source
/// with [`as_range`](Self::as_range) always yields the token text. Columns
/// count characters from 0, and `line` is 1-based and fixed at the start of
/// the token.
///
/// # Examples
///
/// ```
/// use z80asm_core::source_analysis::TokenLocation;
///
/// let location = TokenLocation::new(0, 10, 1, 0, 10);
/// assert_eq!(location.start_pos(), 0);
/// assert_eq!(location.end_pos(), 10);
/// assert_eq!(location.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenLocation {
    start_pos: u32,
    end_pos: u32,
    line: u32,
    start_column: u32,
    end_column: u32,
}

impl TokenLocation {
    /// Creates a location from its offsets, line and columns.
    #[must_use]
    pub const fn new(
        start_pos: u32,
        end_pos: u32,
        line: u32,
        start_column: u32,
        end_column: u32,
    ) -> Self {
        Self {
            start_pos,
            end_pos,
            line,
            start_column,
            end_column,
        }
    }

    /// Returns the start byte offset.
    #[must_use]
    pub const fn start_pos(self) -> u32 {
        self.start_pos
    }

    /// Returns the end byte offset (exclusive).
    #[must_use]
    pub const fn end_pos(self) -> u32 {
        self.end_pos
    }

    /// Returns the 1-based line the location starts on.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns the 0-based start column.
    #[must_use]
    pub const fn start_column(self) -> u32 {
        self.start_column
    }

    /// Returns the 0-based end column (exclusive).
    #[must_use]
    pub const fn end_column(self) -> u32 {
        self.end_column
    }

    /// Returns the length of the location in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end_pos - self.start_pos
    }

    /// Returns true if the location covers no text.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start_pos == self.end_pos
    }

    /// Creates a location running from the start of `self` to the end of `other`.
    ///
    /// The line and start column come from `self`, the end column from `other`.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        Self {
            start_pos: self.start_pos,
            end_pos: other.end_pos,
            line: self.line,
            start_column: self.start_column,
            end_column: other.end_column,
        }
    }

    /// Converts to a `Range<usize>` for indexing into source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start_pos as usize..self.end_pos as usize
    }
}

impl From<TokenLocation> for Range<usize> {
    fn from(location: TokenLocation) -> Self {
        location.as_range()
    }
}

impl From<TokenLocation> for miette::SourceSpan {
    fn from(location: TokenLocation) -> Self {
        (location.start_pos as usize, location.len() as usize).into()
    }
}
