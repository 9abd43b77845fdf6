//! Changeset listeners
//!
//! ## Protocol
//!
//! ```text
//! initialize()  ---> once per listener, before the first decode
//! process(&cs)  ---> once per in-range changeset, in file order
//! finalize()    ---> once per listener, after `</osm>`
//! ```
//!
//! Listeners are called sequentially in registration order. `finalize` is
//! skipped when decoding fails. Each listener owns its own state.

pub mod collector;
pub mod stats;

pub use collector::RecordCollector;
pub use stats::{CommentRanking, EditorUsage};

use crate::changeset::Changeset;

/// Consumer of decoded changesets
pub trait ChangesetListener {
    /// Called before any changeset is decoded
    fn initialize(&mut self) {}

    /// Called for each changeset on or after the start date
    fn process(&mut self, changeset: &Changeset);

    /// Called after the last changeset
    fn finalize(&mut self) {}
}
