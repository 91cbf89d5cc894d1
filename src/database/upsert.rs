//! Transactional upsert of transformed rows into a DuckDB table.

use crate::database::table::TargetTable;
use crate::error::{ImportError, Result};
use crate::import::{Row, Value};
use duckdb::{params_from_iter, Connection};
use std::collections::HashMap;

/// Quotes an identifier for DuckDB.
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Renders the parameterized insert-or-update statement for a table.
///
/// Parameters bind in `table.columns` order. On conflict the non-key,
/// non-preserved columns take the incoming values.
pub fn upsert_sql(table: &TargetTable) -> String {
    let columns: Vec<String> = table.columns.iter().map(|column| quote(column)).collect();
    let placeholders = vec!["?"; table.columns.len()].join(", ");
    let keys: Vec<String> = table.conflict_keys.iter().map(|key| quote(key)).collect();
    let updates: Vec<String> = table
        .update_columns()
        .map(|column| format!("{0} = excluded.{0}", quote(column)))
        .collect();
    let action = if updates.is_empty() {
        "DO NOTHING".to_owned()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
        quote(&table.name),
        columns.join(", "),
        placeholders,
        keys.join(", "),
        action
    )
}

/// Values of a row in binding order.
fn bind_values<'a>(table: &TargetTable, row: &'a Row) -> Result<Vec<&'a Value>> {
    table
        .columns
        .iter()
        .map(|column| {
            row.get(column).ok_or_else(|| ImportError::SchemaMismatchError {
                line: row.line(),
                column: column.to_owned(),
            })
        })
        .collect()
}

/// Collapses rows sharing a conflict key, later rows winning.
///
/// Preserved columns keep the first row's value, the same outcome as
/// running the upserts one after another.
pub fn merge_by_key(table: &TargetTable, rows: &[Row]) -> Vec<Row> {
    let mut merged: Vec<Row> = Vec::with_capacity(rows.len());
    let mut positions: HashMap<Vec<String>, usize> = HashMap::with_capacity(rows.len());
    for row in rows {
        let key: Vec<String> = table.conflict_keys.iter().map(|key| row.text(key)).collect();
        match positions.get(&key) {
            Some(&position) => {
                let target = &mut merged[position];
                log::warn!(
                    "Line {} repeats key ({}) of line {} in '{}', later values win",
                    row.line(),
                    key.join(", "),
                    target.line(),
                    table.name
                );
                for column in table.update_columns() {
                    if let Some(value) = row.get(column) {
                        target.set(column, value.clone());
                    }
                }
                target.set_line(row.line());
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(row.clone());
            }
        }
    }
    merged
}

/// Upserts all rows in one transaction and returns the number of distinct keys written.
///
/// Nothing is committed unless every statement succeeds.
pub fn write_rows(connection: &mut Connection, table: &TargetTable, rows: &[Row]) -> Result<usize> {
    let merged = merge_by_key(table, rows);
    let sql = upsert_sql(table);
    log::debug!("Upsert statement: {}", sql);

    let transaction = connection.transaction()?;
    {
        let mut statement = transaction.prepare(&sql)?;
        for row in &merged {
            let values = bind_values(table, row)?;
            if let Err(error) = statement.execute(params_from_iter(values)) {
                log::error!("Upsert of line {} into '{}' failed", row.line(), table.name);
                return Err(error.into());
            }
        }
    }
    transaction.commit()?;
    log::info!("Committed {} rows into '{}'", merged.len(), table.name);
    Ok(merged.len())
}
