//! Pull iterator over changesets
//!
//! An alternative to listener dispatch when the caller wants to drive the
//! loop itself. Yields owned records; stops at `</osm>` and after the first
//! error.

use crate::changeset::{Changeset, Decoder, Step};
use crate::error::DecodeError;

/// Iterator of changesets in file order
pub struct Changesets<'a> {
    decoder: Decoder<'a>,
    record: Changeset,
    done: bool,
}

impl<'a> Changesets<'a> {
    /// Iterate every changeset in `input`, skipping the XML header
    pub fn new(input: &'a [u8]) -> Self {
        let mut decoder = Decoder::new(input);
        decoder.skip_header();
        Changesets {
            decoder,
            record: Changeset::default(),
            done: false,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.decoder.position()
    }
}

impl<'a> Iterator for Changesets<'a> {
    type Item = Result<Changeset, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.decode_next(&mut self.record) {
            Ok(Step::Changeset) => Some(Ok(self.record.clone())),
            Ok(Step::EndOfStream) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Changesets<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_until_end() {
        let input = b"<?xml version=\"1.0\"?><osm><changeset id=\"1\"/><changeset id=\"2\"></changeset></osm>trailing";
        let ids: Vec<i64> = Changesets::new(input).map(|r| r.unwrap().id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn test_fuses_after_error() {
        let input = b"<osm><changeset id=\"1\"/><way/><changeset id=\"2\"/></osm>";
        let mut iter = Changesets::new(input);
        assert_eq!(iter.next().unwrap().unwrap().id, 1);
        assert!(matches!(
            iter.next(),
            Some(Err(DecodeError::UnexpectedElement { .. }))
        ));
        assert!(iter.next().is_none());
    }
}
