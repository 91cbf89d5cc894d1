//! # Database Module
//!
//! Target table description, upsert statement rendering and the
//! transactional writer on top of DuckDB.
mod bridge;
pub mod table;
pub mod upsert;

pub use crate::database::table::TargetTable;
pub use crate::database::upsert::{merge_by_key, upsert_sql, write_rows};

use crate::error::{ImportError, Result};
use duckdb::Connection;

/// Path that selects a transient in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Opens a DuckDB database file, or an in-memory database for `:memory:`.
pub fn open(path: &str) -> Result<Connection> {
    let connection = match path.trim() {
        "" => return Err(ImportError::EmptyDatabasePath),
        IN_MEMORY => Connection::open_in_memory()?,
        path => Connection::open(path)?,
    };
    log::info!("Opened database '{}'", path);
    Ok(connection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_in_memory() {
        let connection = open(IN_MEMORY).unwrap();
        let one: i64 = connection.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn open_empty_path() {
        assert!(matches!(open("").unwrap_err(), ImportError::EmptyDatabasePath));
        assert!(matches!(open("  ").unwrap_err(), ImportError::EmptyDatabasePath));
    }

    #[test]
    fn open_file_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.duckdb");
        let path = path.to_string_lossy();
        {
            let connection = open(&path).unwrap();
            connection
                .execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (3);")
                .unwrap();
        }
        let connection = open(&path).unwrap();
        let value: i64 = connection.query_row("SELECT v FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(value, 3);
    }
}
