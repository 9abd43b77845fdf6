//! Editor-name canonicalization
//!
//! Maps a free-form `created_by` value to a stable application family, e.g.
//! `JOSM/1.5 (18678 en)` -> `JOSM`. Known names are matched by prefix first;
//! everything else is truncated at what looks like a version number. The
//! heuristic misfires on names that legitimately contain ` 2` and friends.

use std::borrow::Cow;

/// Applications that must be cut before their version-looking suffix
const KNOWN_EDITORS: &[&str] = &[
    "Go Map!!",
    "Paint The Town Red",
    "Every Door",
    "MAPS.ME",
    "OsmAnd",
    "Organic Maps",
    "OMaps",
    "StreetComplete",
];

/// Canonical application family for a raw `created_by` value
pub fn canonical_editor(raw: &str) -> Cow<'_, str> {
    if let Some(name) = KNOWN_EDITORS.iter().find(|name| raw.starts_with(*name)) {
        return Cow::Borrowed(*name);
    }
    match version_separator(raw.as_bytes()) {
        Some(end) => Cow::Borrowed(&raw[..end]),
        None => Cow::Borrowed(raw),
    }
}

/// Index of a ` `, `/` or `-` that introduces `1...` or `v1...`
fn version_separator(bytes: &[u8]) -> Option<usize> {
    let is_digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);
    (1..bytes.len()).find(|&i| {
        let separator = match bytes[i] {
            b' ' | b'-' => true,
            b'/' => bytes[i - 1] != b'/',
            _ => false,
        };
        separator && (is_digit_at(i + 1) || (bytes.get(i + 1) == Some(&b'v') && is_digit_at(i + 2)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("JOSM 1.2", "JOSM")]
    #[case("JOSM/1.5 (18678 en)", "JOSM")]
    #[case("iD 2.27.3", "iD")]
    #[case("Vespucci v19.1", "Vespucci")]
    #[case("osmtools-2.0", "osmtools")]
    #[case("Go Map!! 4.1.0", "Go Map!!")]
    #[case("StreetComplete 53.1", "StreetComplete")]
    #[case("MAPS.ME android 13.1", "MAPS.ME")]
    #[case("Every Door Android 5.0", "Every Door")]
    #[case("https://example.org//2", "https://example.org//2")]
    #[case("Potlatch", "Potlatch")]
    #[case("", "")]
    #[case("1 2", "1")]
    fn test_canonical_editor(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(canonical_editor(raw), expected);
    }

    #[test]
    fn test_first_character_is_never_a_separator() {
        assert_eq!(canonical_editor("-1"), "-1");
        assert_eq!(canonical_editor(" v2"), " v2");
    }

    #[test]
    fn test_known_names_are_case_sensitive() {
        assert_eq!(canonical_editor("osmand 4.5"), "osmand");
        assert_eq!(canonical_editor("OsmAnd~ 4.5"), "OsmAnd");
    }
}
