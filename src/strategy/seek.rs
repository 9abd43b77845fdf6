//! Date-indexed seek
//!
//! Dumps are written in ascending `created_at` order, so a binary search over
//! byte offsets finds a starting point near the first changeset on or after a
//! date. Each probe scans forward to the next `<changeset ` and decodes it.
//!
//! The result is approximate but never late: it is at or before the first
//! matching changeset. Callers still filter by date while scanning forward.

use log::trace;
use memchr::memmem;

use crate::changeset::{Changeset, Decoder, Step};

const MARKER: &[u8] = b"<changeset ";

/// Offset in `[start, end)` at or before the first changeset dated `>= target`
///
/// Returns `start` whenever a probe fails to decode.
pub fn seek_date(input: &[u8], mut start: usize, mut end: usize, target: &str) -> usize {
    let finder = memmem::Finder::new(MARKER);
    end = end.min(input.len());
    let mut record = Changeset::default();

    while start < end {
        let mid = start + (end - start) / 2;
        let Some(found) = finder.find(&input[mid..end]).map(|i| mid + i) else {
            break;
        };
        // the marker must end strictly before `end`
        if found + MARKER.len() >= end {
            break;
        }

        let mut probe = Decoder::at(input, found);
        match probe.decode_next(&mut record) {
            Ok(Step::Changeset) => {}
            Ok(Step::EndOfStream) | Err(_) => {
                trace!("seek probe at {found} failed, settling on {start}");
                return start;
            }
        }
        trace!("seek probe at {found}: {} (window {start}..{end})", record.date);

        if record.date.as_str() < target {
            start = found;
        } else {
            end = found;
        }
    }
    start
}
