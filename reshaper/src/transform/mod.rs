//! Transformation module.
//!
//! - Melt: wide table to long records
//! - Pipeline: parse, melt and write in one call

pub mod melt;
pub mod pipeline;

pub use melt::{melt, RowOrder};
pub use pipeline::*;
