//! Tag productions built from scanner primitives

use super::scanner::{CloseKind, Scanner};
use crate::error::DecodeError;

impl<'a> Scanner<'a> {
    /// Skip `<tag key="value" ...>` (any closing form) if the next element is `tag`
    ///
    /// On mismatch the cursor is restored and `false` is returned.
    pub fn skip_tag_with_name(&mut self, tag: &[u8]) -> bool {
        let checkpoint = self.position();
        if self.try_skip_tag(tag) == Some(true) {
            return true;
        }
        self.set_position(checkpoint);
        false
    }

    fn try_skip_tag(&mut self, tag: &[u8]) -> Option<bool> {
        if !self.match_open_bracket() || self.read_key()? != tag {
            return Some(false);
        }
        while self.read_key_value().ok()?.is_some() {}
        self.match_close_bracket()?;
        Some(true)
    }

    /// Opening bracket followed by an element name
    pub fn expect_element_start(&mut self) -> Result<&'a [u8], DecodeError> {
        if !self.match_open_bracket() {
            return Err(DecodeError::grammar("`<`", self.position()));
        }
        self.read_key()
            .ok_or_else(|| DecodeError::grammar("element name", self.position()))
    }

    /// A closing bracket in any of its three forms
    pub fn expect_close_bracket(&mut self) -> Result<CloseKind, DecodeError> {
        self.match_close_bracket()
            .ok_or_else(|| DecodeError::grammar("closing bracket", self.position()))
    }

    /// A key/value pair whose key must equal `key`
    pub fn expect_attribute(&mut self, key: &'static str) -> Result<&'a [u8], DecodeError> {
        match self.read_key_value()? {
            Some((k, v)) if k == key.as_bytes() => Ok(v),
            _ => Err(DecodeError::grammar(attribute_label(key), self.position())),
        }
    }
}

fn attribute_label(key: &'static str) -> &'static str {
    match key {
        "k" => "`k` attribute",
        "v" => "`v` attribute",
        _ => "attribute",
    }
}
