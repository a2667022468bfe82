// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Character cursor over the source buffer.
//!
//! The cursor hands out one character at a time and keeps track of the
//! byte position, the 1-based line and the 0-based column of the next
//! character. It supports a small, bounded amount of non-consuming
//! lookahead, which is all the lexer needs to disambiguate literals.

/// Maximum number of characters the cursor can look ahead.
pub const MAX_CHAR_LOOKAHEAD: usize = 8;

/// A position/line/column tracking reader over a source string.
///
/// # Examples
///
/// ```
/// use z80asm_core::source_analysis::CharCursor;
///
/// let mut cursor = CharCursor::new("ld\na");
/// assert_eq!(cursor.peek_at(1), Some('d'));
/// assert_eq!(cursor.get(), Some('l'));
/// assert_eq!(cursor.get(), Some('d'));
/// assert_eq!(cursor.get(), Some('\n'));
/// assert_eq!((cursor.line(), cursor.column()), (2, 0));
/// assert_eq!(cursor.get(), Some('a'));
/// assert_eq!(cursor.get(), None);
/// assert_eq!(cursor.get(), None);
/// ```
#[derive(Debug, Clone)]
pub struct CharCursor<'src> {
    source: &'src str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'src> CharCursor<'src> {
    /// Creates a cursor positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 0,
        }
    }

    /// Returns the source text the cursor reads from.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the byte offset of the next character.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the 1-based line of the next character.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 0-based column of the next character.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns true once every character has been consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Consumes and returns the next character, or `None` at end of input.
    ///
    /// `\n` and a bare `\r` end the current line. In a `\r\n` pair only the
    /// `\n` does, so the pair counts as a single line break.
    pub fn get(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        match ch {
            '\n' => self.new_line(),
            '\r' if self.peek() != Some('\n') => self.new_line(),
            _ => self.column += 1,
        }
        Some(ch)
    }

    /// Returns the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// Returns the character `n` positions past the next one without consuming.
    ///
    /// `peek_at(0)` is the same as [`peek`](Self::peek).
    ///
    /// # Panics
    ///
    /// Panics if `n` is not below [`MAX_CHAR_LOOKAHEAD`].
    #[must_use]
    pub fn peek_at(&self, n: usize) -> Option<char> {
        assert!(
            n < MAX_CHAR_LOOKAHEAD,
            "character lookahead {n} exceeds the maximum of {MAX_CHAR_LOOKAHEAD}"
        );
        self.source[self.position..].chars().nth(n)
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_tracks_position_and_column() {
        let mut cursor = CharCursor::new("nop");
        assert_eq!(cursor.get(), Some('n'));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn end_sentinel_is_sticky() {
        let mut cursor = CharCursor::new("a");
        assert_eq!(cursor.get(), Some('a'));
        assert!(cursor.is_eof());
        for _ in 0..3 {
            assert_eq!(cursor.get(), None);
            assert_eq!(cursor.peek(), None);
        }
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let mut cursor = CharCursor::new("a\r\nb");
        cursor.get();
        cursor.get();
        assert_eq!(cursor.line(), 1);
        cursor.get();
        assert_eq!((cursor.line(), cursor.column()), (2, 0));
        assert_eq!(cursor.get(), Some('b'));
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    fn bare_carriage_return_ends_line() {
        let mut cursor = CharCursor::new("a\rb");
        cursor.get();
        cursor.get();
        assert_eq!((cursor.line(), cursor.column()), (2, 0));
    }

    #[test]
    fn peek_does_not_consume() {
        let cursor = CharCursor::new("#4000");
        assert_eq!(cursor.peek(), Some('#'));
        assert_eq!(cursor.peek(), Some('#'));
        assert_eq!(cursor.peek_at(4), Some('0'));
        assert_eq!(cursor.peek_at(5), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn multibyte_characters_advance_by_bytes() {
        let mut cursor = CharCursor::new("é1");
        assert_eq!(cursor.get(), Some('é'));
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    #[should_panic(expected = "character lookahead")]
    fn peek_at_beyond_bound_panics() {
        let cursor = CharCursor::new("abcdefghij");
        let _ = cursor.peek_at(MAX_CHAR_LOOKAHEAD);
    }
}
