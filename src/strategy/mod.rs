//! Decode strategies
//!
//! - Dispatch: full forward scan feeding listeners
//! - Seek: binary search to a start date before the forward scan

pub mod dispatch;
pub mod seek;

pub use dispatch::{decode, DecodeOptions, DecodeSummary, Dispatcher};
pub use seek::seek_date;
