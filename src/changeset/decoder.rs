//! Changeset element decoder
//!
//! Consumes one `<changeset ...>` element per call:
//!
//! ```text
//! <changeset id="1" created_at="..." ...>      attributes
//!   <tag k="created_by" v="JOSM 1.2"/>          zero or more children
//! </changeset>
//! <changeset id="2" ... />                      legacy form, no children
//! </osm>                                        end of stream
//! ```
//!
//! After an error the cursor position is unspecified; callers must stop.

use super::editor::canonical_editor;
use super::record::{parse_float, parse_int, Changeset};
use crate::core::entities::unescape_str;
use crate::core::scanner::{CloseKind, Scanner};
use crate::error::DecodeError;

/// Bytes of `created_at` kept as the date
const DATE_LEN: usize = 10;

/// Outcome of a successful decode step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The record was filled from one changeset element
    Changeset,
    /// `</osm>` was consumed; nothing follows
    EndOfStream,
}

/// Tags copied into the record; every other `k` is skipped
#[derive(Clone, Copy)]
enum TagField {
    CreatedBy,
    Comment,
    Locale,
    QuestType,
}

impl TagField {
    fn from_key(key: &[u8]) -> Option<Self> {
        match key {
            b"created_by" => Some(TagField::CreatedBy),
            b"comment" => Some(TagField::Comment),
            b"locale" => Some(TagField::Locale),
            b"StreetComplete:quest_type" => Some(TagField::QuestType),
            _ => None,
        }
    }
}

/// Pull decoder over a dump held in memory
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Decoder<'a> {
    /// Decoder positioned at the start of `input`
    pub fn new(input: &'a [u8]) -> Self {
        Decoder {
            scanner: Scanner::new(input),
        }
    }

    /// Decoder positioned at byte `pos`
    pub fn at(input: &'a [u8], pos: usize) -> Self {
        Decoder {
            scanner: Scanner::at(input, pos),
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Move to byte `pos`
    pub fn seek_to(&mut self, pos: usize) {
        self.scanner.set_position(pos);
    }

    /// The buffer being decoded
    pub fn input(&self) -> &'a [u8] {
        self.scanner.input()
    }

    /// Skip `<?xml ...?>`, `<osm ...>` and `<bound .../>`, each optional
    pub fn skip_header(&mut self) {
        for tag in [&b"?xml"[..], b"osm", b"bound"] {
            self.scanner.skip_tag_with_name(tag);
        }
    }

    /// Decode the next element into `record`
    ///
    /// The record is reset first, so nothing from a previous element leaks.
    pub fn decode_next(&mut self, record: &mut Changeset) -> Result<Step, DecodeError> {
        record.reset();

        let name = self.scanner.expect_element_start()?;
        match name {
            b"changeset" => {}
            b"/osm" => {
                self.scanner.expect_close_bracket()?;
                return Ok(Step::EndOfStream);
            }
            other => {
                let at = self.scanner.position() - other.len();
                return Err(DecodeError::unexpected_element(other, at));
            }
        }

        self.read_attributes(record)?;
        if self.scanner.expect_close_bracket()? == CloseKind::SelfClosing {
            // 2005-era changesets carry no tags
            return Ok(Step::Changeset);
        }
        self.read_children(record)?;
        Ok(Step::Changeset)
    }

    fn read_attributes(&mut self, record: &mut Changeset) -> Result<(), DecodeError> {
        while let Some((key, value)) = self.scanner.read_key_value()? {
            match key {
                b"id" => record.id = parse_int(value),
                b"created_at" => set_text(&mut record.date, &value[..value.len().min(DATE_LEN)]),
                b"user" => set_text(&mut record.user, value),
                b"uid" => record.uid = parse_int(value),
                b"num_changes" => record.edit_count = parse_int(value),
                b"min_lat" => record.min_lat = parse_float(value),
                b"max_lat" => record.max_lat = parse_float(value),
                b"min_lon" => record.min_lon = parse_float(value),
                b"max_lon" => record.max_lon = parse_float(value),
                _ => {}
            }
        }
        Ok(())
    }

    fn read_children(&mut self, record: &mut Changeset) -> Result<(), DecodeError> {
        loop {
            let name = self.scanner.expect_element_start()?;
            match name {
                b"tag" => {
                    self.read_tag(record)?;
                    self.scanner.expect_close_bracket()?;
                }
                b"/changeset" => {
                    self.scanner.expect_close_bracket()?;
                    return Ok(());
                }
                other => {
                    let at = self.scanner.position() - other.len();
                    return Err(DecodeError::unexpected_element(other, at));
                }
            }
        }
    }

    fn read_tag(&mut self, record: &mut Changeset) -> Result<(), DecodeError> {
        let key = self.scanner.expect_attribute("k")?;
        let Some(field) = TagField::from_key(key) else {
            // consume the value of a tag we don't keep
            self.scanner.read_key_value()?;
            return Ok(());
        };

        let value = self.scanner.expect_attribute("v")?;
        match field {
            TagField::CreatedBy => {
                set_text(&mut record.application_raw, value);
                let family = canonical_editor(&record.application_raw);
                record.application.clear();
                record.application.push_str(&family);
            }
            TagField::Comment => set_text(&mut record.comment, value),
            TagField::Locale => set_text(&mut record.locale, value),
            TagField::QuestType => set_text(&mut record.quest_type, value),
        }
        Ok(())
    }
}

fn set_text(dst: &mut String, raw: &[u8]) {
    dst.clear();
    dst.push_str(&unescape_str(raw));
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &[u8] = br#"<changeset id="1" created_at="2006-01-01T00:00:00Z" user="a" uid="1" num_changes="3" min_lat="1.0" max_lat="2.0" min_lon="3.0" max_lon="4.0"/>"#;

    fn decode_one(input: &[u8]) -> (Result<Step, DecodeError>, Changeset, usize) {
        let mut decoder = Decoder::new(input);
        let mut record = Changeset::default();
        let step = decoder.decode_next(&mut record);
        (step, record, decoder.position())
    }

    #[test]
    fn test_legacy_self_closed() {
        let mut input = LEGACY.to_vec();
        input.extend_from_slice(b"\n</osm>");
        let mut decoder = Decoder::new(&input);
        let mut record = Changeset::default();

        assert_eq!(decoder.decode_next(&mut record), Ok(Step::Changeset));
        assert_eq!(record.id, 1);
        assert_eq!(record.date, "2006-01-01");
        assert_eq!(record.user, "a");
        assert_eq!(record.uid, 1);
        assert_eq!(record.edit_count, 3);
        assert_eq!((record.min_lat, record.max_lat), (1.0, 2.0));
        assert_eq!((record.min_lon, record.max_lon), (3.0, 4.0));
        assert!(record.application.is_empty());

        assert_eq!(decoder.decode_next(&mut record), Ok(Step::EndOfStream));
        assert_eq!(record, Changeset::default());
    }

    #[test]
    fn test_full_record_with_tags() {
        let input = br#"<changeset id="42" created_at="2023-05-01T10:11:12Z" user="M&amp;M" uid="7" num_changes="12" comments_count="0">
  <tag k="created_by" v="JOSM 1.2"/>
  <tag k="comment" v="fix &amp; tidy"/>
  <tag k="locale" v="de"/>
  <tag k="StreetComplete:quest_type" v="AddOpeningHours"/>
  <tag k="host" v="https://www.openstreetmap.org/edit"/>
 </changeset>"#;
        let (step, record, pos) = decode_one(input);
        assert_eq!(step, Ok(Step::Changeset));
        assert_eq!(pos, input.len());
        assert_eq!(record.id, 42);
        assert_eq!(record.user, "M&M");
        assert_eq!(record.application_raw, "JOSM 1.2");
        assert_eq!(record.application, "JOSM");
        assert_eq!(record.comment, "fix & tidy");
        assert_eq!(record.locale, "de");
        assert_eq!(record.quest_type, "AddOpeningHours");
        assert_eq!(record.min_lat, 0.0);
    }

    #[test]
    fn test_open_element_without_children() {
        let (step, record, _) = decode_one(b"<changeset id=\"5\" created_at=\"2010-02-03T00:00:00Z\"></changeset>");
        assert_eq!(step, Ok(Step::Changeset));
        assert_eq!(record.id, 5);
        assert_eq!(record.date, "2010-02-03");
    }

    #[test]
    fn test_short_created_at_is_kept_whole() {
        let (_, record, _) = decode_one(b"<changeset created_at=\"2010\"/>");
        assert_eq!(record.date, "2010");
    }

    #[test]
    fn test_lenient_numbers() {
        let (step, record, _) = decode_one(b"<changeset id=\"x1\" uid=\"\" num_changes=\"3a\" min_lat=\"north\"/>");
        assert_eq!(step, Ok(Step::Changeset));
        assert_eq!(record.id, 0);
        assert_eq!(record.uid, 0);
        assert_eq!(record.edit_count, 3);
        assert_eq!(record.min_lat, 0.0);
    }

    #[test]
    fn test_unknown_tag_without_value() {
        let (step, _, _) = decode_one(b"<changeset id=\"1\"><tag k=\"host\"/></changeset>");
        assert_eq!(step, Ok(Step::Changeset));
    }

    #[test]
    fn test_kept_tag_requires_value() {
        let (step, _, _) = decode_one(b"<changeset id=\"1\"><tag k=\"comment\"/></changeset>");
        assert!(matches!(
            step,
            Err(DecodeError::Grammar { expected: "`v` attribute", .. })
        ));
    }

    #[test]
    fn test_tag_requires_k_first() {
        let (step, _, _) = decode_one(b"<changeset id=\"1\"><tag v=\"x\" k=\"comment\"/></changeset>");
        assert!(matches!(
            step,
            Err(DecodeError::Grammar { expected: "`k` attribute", .. })
        ));
    }

    #[test]
    fn test_unexpected_root_child() {
        let (step, _, _) = decode_one(b"  <node id=\"1\"/>");
        assert_eq!(
            step,
            Err(DecodeError::UnexpectedElement { name: "node".into(), position: 3 })
        );
    }

    #[test]
    fn test_unexpected_changeset_child() {
        let (step, _, _) = decode_one(b"<changeset id=\"1\"><discussion></discussion></changeset>");
        assert!(matches!(step, Err(DecodeError::UnexpectedElement { ref name, .. }) if name == "discussion"));
    }

    #[test]
    fn test_unterminated_value() {
        let (step, _, _) = decode_one(b"<changeset id=\"1\" user=\"abc");
        assert_eq!(step, Err(DecodeError::UnterminatedValue { position: 23 }));
    }

    #[test]
    fn test_missing_closing_bracket() {
        let (step, _, _) = decode_one(b"<changeset id=\"1\" <tag");
        assert!(matches!(
            step,
            Err(DecodeError::Grammar { expected: "closing bracket", .. })
        ));
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let (step, _, _) = decode_one(b"   ");
        assert_eq!(step, Err(DecodeError::Grammar { expected: "`<`", position: 3 }));
    }

    #[test]
    fn test_skip_header() {
        let input = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<osm version=\"0.6\">\n<bound box=\"1\"/>\n</osm>";
        let mut decoder = Decoder::new(input);
        decoder.skip_header();
        let mut record = Changeset::default();
        assert_eq!(decoder.decode_next(&mut record), Ok(Step::EndOfStream));
    }
}
