//! # Spreadsheet Upsert Importer
//!
//! Loads catalog spreadsheets and upserts their rows into DuckDB tables.
//!
//! ## Features
//!
//! - **Multi-format support**: Excel (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.xla`, `.xlam`)
//!   and OpenDocument (`.ods`) files, every cell read as text
//! - **Column mapping**: source headers renamed to target fields, unmapped columns dropped
//! - **Derived fields**: constants, defaults, sequential codes and numeric extraction
//!   from free-form text such as `123.45元`
//! - **Idempotent writes**: insert-or-update on the table's conflict key, with
//!   selected columns kept from the first insert
//! - **All or nothing**: every run writes inside a single transaction
//!
//! ## Built-in Jobs
//!
//! - `disease`: ICD-10 disease codes
//! - `medical-service`: medical service items and prices
//! - `drug`: insurance drug catalog
pub mod config;
pub mod database;
pub mod error;
pub mod import;
pub mod jobs;
pub mod spreadsheet;

pub use crate::config::Config;
pub use crate::error::{ImportError, Result};
pub use crate::import::{run, ImportResult, ImportSpec};
pub use crate::jobs::{run_with_config, Job};
