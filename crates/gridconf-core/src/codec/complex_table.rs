//! The complex attribute table
//!
//! ```text
//! #name      shortcut type   relop requestable consumable default urgency
//! #---------------------------------------------------------------------
//! arch       a        STRING ##    YES         NO         NONE    0
//! slots      s        INT    <=    YES         YES        1       1000
//! ```

use crate::codec::record::parse_int;
use crate::errors::{GridConfError, Result};
use crate::model::{collection_from_entities, Collection, ComplexEntryConfig, EntityKind};

/// Columns per table row
pub const COMPLEX_COLUMNS: usize = 8;

const HEADER: &str = "#name               shortcut   type        relop   requestable consumable default  urgency\n\
#----------------------------------------------------------------------------------------\n";

/// Parse the whole table
///
/// # Errors
///
/// Returns `FieldCount` for a row without exactly eight columns,
/// `NotANumber` for a non-numeric urgency and `DuplicateName` for a
/// repeated attribute name.
pub fn parse_complex_table(text: &str) -> Result<Collection<ComplexEntryConfig>> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        entries.push(parse_complex_row(trimmed)?);
    }
    collection_from_entities(EntityKind::ComplexEntry, entries)
}

/// Parse one table row
///
/// # Errors
///
/// See [`parse_complex_table`].
pub fn parse_complex_row(line: &str) -> Result<ComplexEntryConfig> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != COMPLEX_COLUMNS {
        return Err(GridConfError::FieldCount {
            expected: COMPLEX_COLUMNS,
            found: fields.len(),
            line: line.to_string(),
        });
    }
    Ok(ComplexEntryConfig {
        name: fields[0].to_string(),
        shortcut: fields[1].to_string(),
        value_type: fields[2].to_string(),
        relop: fields[3].to_string(),
        requestable: fields[4].to_string(),
        consumable: fields[5].to_string(),
        default: fields[6].to_string(),
        urgency: parse_int("urgency", fields[7])?,
    })
}

pub fn render_complex_row(entry: &ComplexEntryConfig) -> String {
    format!(
        "{:<20} {:<10} {:<11} {:<7} {:<11} {:<10} {:<8} {}",
        entry.name,
        entry.shortcut,
        entry.value_type,
        entry.relop,
        entry.requestable,
        entry.consumable,
        entry.default,
        entry.urgency
    )
}

/// Render the table with its header, one row per entry in name order
pub fn render_complex_table(entries: &Collection<ComplexEntryConfig>) -> String {
    let mut out = String::from(HEADER);
    for entry in entries.values() {
        out.push_str(&render_complex_row(entry));
        out.push('\n');
    }
    out
}
