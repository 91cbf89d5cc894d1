//! # Import Module
//!
//! Turns sheet records into rows for a target table and upserts them.
//!
//! A run goes through four steps:
//!
//! 1. load the selected sheet, every cell as text
//! 2. project and rename columns through the job's column map
//! 3. apply the derived-field rules in order
//! 4. upsert every row in one transaction
pub mod row;
pub mod rule;
pub mod spec;

pub use crate::import::row::{Row, Value};
pub use crate::import::rule::{extract_number, parse_number, Annotation, DerivedRule};
pub use crate::import::spec::ImportSpec;

use crate::database::write_rows;
use crate::error::{ImportError, Result};
use crate::spreadsheet::{load_sheet, Sheet};
use duckdb::Connection;
use std::time::Instant;

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportResult {
    /// Target table name
    pub table: String,
    /// Rows read from the sheet and written
    pub rows: usize,
    /// Distinct conflict keys among those rows
    pub distinct_keys: usize,
}

/// Projects, renames and derives the rows of a sheet for one import job.
///
/// Every target column must have a value afterwards, otherwise a
/// `SchemaMismatchError` names the first offending line and column.
pub fn transform(spec: &ImportSpec, sheet: &Sheet) -> Result<Vec<Row>> {
    let header = sheet.header();
    let projection: Vec<(usize, &str)> = spec
        .column_map
        .iter()
        .filter_map(|(source, target)| {
            let index = header.iter().position(|name| name == source);
            if index.is_none() {
                log::info!("Column '{}' not found in sheet '{}', skipped", source, sheet.name);
            }
            index.map(|index| (index, target.as_str()))
        })
        .collect();

    let mut rows = Vec::new();
    for (position, record) in sheet.records(spec.criteria.skip_empty_rows).into_iter().enumerate() {
        let mut row = Row::new(record.line);
        for (index, field) in &projection {
            row.set(field, record.values[*index].to_owned());
        }
        for rule in &spec.rules {
            rule.apply(&mut row, position + 1);
        }
        if let Some(column) = spec.table.columns.iter().find(|column| !row.contains(column)) {
            return Err(ImportError::SchemaMismatchError {
                line: row.line(),
                column: column.to_owned(),
            });
        }
        log::debug!("Line {}: {:?}", row.line(), row);
        rows.push(row);
    }
    Ok(rows)
}

/// Loads the spreadsheet of an import job and transforms its rows.
pub fn prepare(spec: &ImportSpec) -> Result<Vec<Row>> {
    spec.validate()?;
    let sheet = load_sheet(&spec.source, &spec.criteria)?;
    transform(spec, &sheet)
}

/// Runs a whole import: load, transform, upsert, commit.
pub fn run(spec: &ImportSpec, connection: &mut Connection) -> Result<ImportResult> {
    let started = Instant::now();
    log::info!(
        "Import '{}' from '{}' into '{}'",
        spec.name,
        spec.source.display(),
        spec.table.name
    );
    let rows = prepare(spec)?;
    let distinct_keys = write_rows(connection, &spec.table, &rows)?;
    log::info!(
        "Imported {} rows ({} distinct keys) into '{}' in {:.2?}",
        rows.len(),
        distinct_keys,
        spec.table.name,
        started.elapsed()
    );
    Ok(ImportResult {
        table: spec.table.name.to_owned(),
        rows: rows.len(),
        distinct_keys,
    })
}
