//! Core parsing primitives
//!
//! - Scanner: bounds-checked cursor over the raw dump
//! - Grammar: tag productions (element start, attributes, closing bracket)
//! - Entities: the five predefined entities, with Cow (zero-copy when possible)

pub mod entities;
pub mod grammar;
pub mod scanner;
