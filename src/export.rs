//! Serialization of harvested records to CSV and JSON.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::metadata::PageRecord;

/// Well-known columns emitted first, in this order, when present.
const PRIORITY_FIELDS: &[&str] = &[
    "url",
    "title",
    "description",
    "keywords",
    "author",
    "canonical",
    "og_title",
    "image",
];

/// Compute the column ordering for a set of records: the priority fields
/// that actually occur, then every remaining observed field name in
/// lexical order.
pub fn column_order(records: &[PageRecord]) -> Vec<String> {
    let mut all_keys: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        all_keys.extend(record.field_names());
    }

    let mut columns: Vec<String> = PRIORITY_FIELDS
        .iter()
        .filter(|field| all_keys.contains(*field))
        .map(|field| field.to_string())
        .collect();
    for key in all_keys {
        if !PRIORITY_FIELDS.contains(&key) {
            columns.push(key.to_string());
        }
    }
    columns
}

/// Write records as CSV, absent fields as empty cells.
pub fn write_csv(path: &Path, records: &[PageRecord]) -> Result<()> {
    let columns = column_order(records);
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(&columns)?;
    for record in records {
        let row: Vec<&str> = columns
            .iter()
            .map(|column| record.field(column).unwrap_or(""))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write records as a pretty-printed JSON array.
pub fn write_json(path: &Path, records: &[PageRecord]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, records)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
