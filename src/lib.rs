//! baby-records - Record taxonomy and attribute resolution for baby-tracking apps
//!
//! Every logged event (feeding, sleep, diaper, growth) has a record type. This
//! crate maps record types to their group and display metadata, checks and
//! formats the group-shaped attribute payloads, and derives the views the app
//! shows on top of them: the day-grouped records timeline and new-record drafts.
//!
//! ## Modules
//!
//! - **Taxonomy**: static group and metadata tables (`taxonomy`)
//! - **Schema**: raw rows to typed records, with checked attribute payloads (`schema`)
//! - **Formatting**: one-line attribute summaries and display helpers (`formatter`, `display`)
//! - **Views**: records timeline and editor drafts (`timeline`, `draft`)

pub mod display;
pub mod draft;
pub mod error;
pub mod formatter;
pub mod schema;
pub mod taxonomy;
pub mod timeline;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use draft::RecordDraft;
pub use error::TaxonomyError;
pub use formatter::{format_attributes, format_raw_attributes, format_record};
pub use schema::{AttributePayload, Record, RecordRow, RecordRowAdapter};
pub use taxonomy::{group_of, info_of, info_of_name, types_in, RECORD_TYPE_GROUPS, RECORD_TYPE_INFO};
pub use timeline::{build_timeline, group_by_date, timeline_from_rows, RecordFilter, TimelineReport};
pub use types::{RecordGroup, RecordType, RecordTypeInfo};

/// Library version
pub const RECORDS_VERSION: &str = env!("CARGO_PKG_VERSION");
