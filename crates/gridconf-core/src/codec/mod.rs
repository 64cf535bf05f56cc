//! Text codecs for the administrative tool's formats
//!
//! - [`override_list`]: `value,[scope=value]` lists
//! - [`multiline`]: values wrapped across continuation lines
//! - [`record`]: `key value` attribute blocks and typed accessors
//! - [`entities`]: per-kind record codecs
//! - [`complex_table`]: the fixed-column complex attribute table

pub mod complex_table;
pub mod entities;
pub mod multiline;
pub mod override_list;
pub mod record;

pub use multiline::read_multiline_value;
pub use override_list::{decode, encode, join_list, ListFormat};
pub use record::{Record, RecordCodec};
