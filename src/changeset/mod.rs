//! Changeset records and the element decoder

pub mod decoder;
pub mod editor;
pub mod record;

pub use decoder::{Decoder, Step};
pub use editor::canonical_editor;
pub use record::Changeset;
