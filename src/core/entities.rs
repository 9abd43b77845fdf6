//! XML Entity Decoding
//!
//! Only the five predefined entities are recognized:
//! &quot; &apos; &lt; &gt; &amp;
//!
//! Anything else starting with `&` is copied through literally; changeset
//! comments contain plenty of bare ampersands.
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Entities in the order they are tried at each `&`
const ENTITIES: [(&[u8], u8); 5] = [
    (b"&quot;", b'"'),
    (b"&apos;", b'\''),
    (b"&lt;", b'<'),
    (b"&gt;", b'>'),
    (b"&amp;", b'&'),
];

/// Decode entity references in an attribute value
///
/// Returns Borrowed if no `&` is present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn unescape(input: &[u8]) -> Cow<'_, [u8]> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while let Some(amp_pos) = memchr(b'&', &input[pos..]) {
        result.extend_from_slice(&input[pos..pos + amp_pos]);
        pos += amp_pos;

        let rest = &input[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, decoded)) => {
                result.push(*decoded);
                pos += entity.len();
            }
            None => {
                result.push(b'&');
                pos += 1;
            }
        }
    }
    result.extend_from_slice(&input[pos..]);
    result
}

/// Decode an attribute value into a string, replacing invalid UTF-8
#[inline]
pub fn unescape_str(input: &[u8]) -> Cow<'_, str> {
    match unescape(input) {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
        Cow::Owned(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Cow::Owned(s),
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
    }
}

/// Encode text for use in an attribute value (inverse of `unescape`)
pub fn escape(input: &str) -> Cow<'_, str> {
    // Fast path: check if any escaping needed
    if !input.bytes().any(|b| matches!(b, b'<' | b'>' | b'&' | b'"' | b'\'')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
