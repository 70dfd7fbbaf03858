//! Record wire schema
//!
//! This module defines the boundary between raw persisted rows and typed
//! records: group-checked attribute payloads, row/record conversion and batch
//! parsing of row exports.

mod adapter;
mod attributes;
mod record;

pub use adapter::*;
pub use attributes::*;
pub use record::*;
