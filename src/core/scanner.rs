//! Byte cursor over a changeset dump
//!
//! Lexical primitives for the narrow XML subset the dump uses. The scanner
//! never copies the input; spans are returned as subslices.
//! Uses memchr for quote search (SIMD when available).

use memchr::memchr;

use crate::error::DecodeError;

/// Which closing form `match_close_bracket` consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKind {
    /// `/>` - element has no children
    SelfClosing,
    /// `?>` - end of a processing instruction
    Declaration,
    /// `>` - children follow
    Open,
}

/// Cursor over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Create a scanner positioned at `pos`
    #[inline]
    pub fn at(input: &'a [u8], pos: usize) -> Self {
        Scanner {
            input,
            pos: pos.min(input.len()),
        }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    /// The whole underlying buffer
    #[inline]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Skip ASCII whitespace (the `isspace` set, including vertical tab)
    #[inline]
    pub fn skip_space(&mut self) {
        while let Some(b) = self.peek() {
            if !is_space(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consume `<` after optional whitespace
    pub fn match_open_bracket(&mut self) -> bool {
        self.skip_space();
        if self.peek() == Some(b'<') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `/>`, `?>` or `>` after optional whitespace
    pub fn match_close_bracket(&mut self) -> Option<CloseKind> {
        self.skip_space();
        let kind = match (self.peek()?, self.peek_at(1)) {
            (b'/', Some(b'>')) => CloseKind::SelfClosing,
            (b'?', Some(b'>')) => CloseKind::Declaration,
            (b'>', _) => CloseKind::Open,
            _ => return None,
        };
        self.pos += if kind == CloseKind::Open { 1 } else { 2 };
        Some(kind)
    }

    /// Consume a single literal byte after optional whitespace
    pub fn match_byte(&mut self, byte: u8) -> bool {
        self.skip_space();
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Read a key: a letter, `?` or `/`, then a run of identifier bytes
    pub fn read_key(&mut self) -> Option<&'a [u8]> {
        self.skip_space();
        let start = self.pos;
        let first = self.peek()?;
        if !(first.is_ascii_alphabetic() || first == b'?' || first == b'/') {
            return None;
        }
        self.pos += 1;
        while let Some(b) = self.peek() {
            // `?>` closes a declaration and is never part of its name
            if !is_ident(b) || (b == b'?' && self.peek_at(1) == Some(b'>')) {
                break;
            }
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }

    /// Read a double-quoted value and return its interior
    ///
    /// `Ok(None)` when no opening quote is present (cursor untouched past
    /// whitespace); an opening quote with no match is an error.
    pub fn read_quoted_value(&mut self) -> Result<Option<&'a [u8]>, DecodeError> {
        self.skip_space();
        if self.peek() != Some(b'"') {
            return Ok(None);
        }
        let open = self.pos;
        let start = open + 1;
        match memchr(b'"', &self.input[start..]) {
            Some(len) => {
                self.pos = start + len + 1;
                Ok(Some(&self.input[start..start + len]))
            }
            None => Err(DecodeError::UnterminatedValue { position: open }),
        }
    }

    /// Read `key="value"`
    ///
    /// Returns `Ok(None)` and restores the cursor when there is no pair here.
    pub fn read_key_value(&mut self) -> Result<Option<(&'a [u8], &'a [u8])>, DecodeError> {
        let checkpoint = self.pos;
        let pair = self.try_key_value()?;
        if pair.is_none() {
            self.pos = checkpoint;
        }
        Ok(pair)
    }

    fn try_key_value(&mut self) -> Result<Option<(&'a [u8], &'a [u8])>, DecodeError> {
        let Some(key) = self.read_key() else {
            return Ok(None);
        };
        if !self.match_byte(b'=') {
            return Ok(None);
        }
        Ok(self.read_quoted_value()?.map(|value| (key, value)))
    }
}

/// `isspace` in the C locale
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

#[inline]
fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'?'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_space() {
        let mut scanner = Scanner::new(b"  \t\n\x0b\x0c hello");
        scanner.skip_space();
        assert_eq!(scanner.position(), 7);
    }

    #[test]
    fn test_close_bracket_forms() {
        let mut scanner = Scanner::new(b" />?>  >");
        assert_eq!(scanner.match_close_bracket(), Some(CloseKind::SelfClosing));
        assert_eq!(scanner.match_close_bracket(), Some(CloseKind::Declaration));
        assert_eq!(scanner.match_close_bracket(), Some(CloseKind::Open));
        assert_eq!(scanner.match_close_bracket(), None);
    }

    #[test]
    fn test_lone_slash_is_not_close() {
        let mut scanner = Scanner::new(b"/");
        assert_eq!(scanner.match_close_bracket(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_read_key() {
        let mut scanner = Scanner::new(b"  /changeset>");
        assert_eq!(scanner.read_key(), Some(b"/changeset" as &[u8]));
        assert_eq!(scanner.position(), 12);

        let mut scanner = Scanner::new(b"?xml version");
        assert_eq!(scanner.read_key(), Some(b"?xml" as &[u8]));

        let mut scanner = Scanner::new(b"num_changes=");
        assert_eq!(scanner.read_key(), Some(b"num_changes" as &[u8]));

        let mut scanner = Scanner::new(b"1abc");
        assert_eq!(scanner.read_key(), None);
    }

    #[test]
    fn test_read_key_stops_before_declaration_close() {
        let mut scanner = Scanner::new(b"?xml?>");
        assert_eq!(scanner.read_key(), Some(b"?xml" as &[u8]));
        assert_eq!(scanner.match_close_bracket(), Some(CloseKind::Declaration));

        let mut scanner = Scanner::new(b"a?b ");
        assert_eq!(scanner.read_key(), Some(b"a?b" as &[u8]));
    }

    #[test]
    fn test_read_key_value() {
        let mut scanner = Scanner::new(b" k = \"created_by\" v=\"JOSM 1.2\"/>");
        assert_eq!(
            scanner.read_key_value().unwrap(),
            Some((b"k" as &[u8], b"created_by" as &[u8]))
        );
        assert_eq!(
            scanner.read_key_value().unwrap(),
            Some((b"v" as &[u8], b"JOSM 1.2" as &[u8]))
        );
        // "/" reads as a key but has no '=': no pair, cursor restored
        let before = scanner.position();
        assert_eq!(scanner.read_key_value().unwrap(), None);
        assert_eq!(scanner.position(), before);
        assert_eq!(scanner.match_close_bracket(), Some(CloseKind::SelfClosing));
    }

    #[test]
    fn test_unterminated_value() {
        let mut scanner = Scanner::new(b"id=\"12");
        assert_eq!(
            scanner.read_key_value(),
            Err(DecodeError::UnterminatedValue { position: 3 })
        );
    }

    #[test]
    fn test_eof_is_safe() {
        let mut scanner = Scanner::new(b"");
        assert!(!scanner.match_open_bracket());
        assert_eq!(scanner.match_close_bracket(), None);
        assert_eq!(scanner.read_key(), None);
        assert_eq!(scanner.read_quoted_value().unwrap(), None);
        assert!(scanner.is_eof());
    }
}
