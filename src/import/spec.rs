use crate::database::TargetTable;
use crate::error::{ImportError, Result};
use crate::import::rule::DerivedRule;
use crate::spreadsheet::Criteria;
use std::collections::HashSet;
use std::path::PathBuf;

/// Immutable description of one import job.
#[derive(Clone, Debug)]
pub struct ImportSpec {
    /// Job name used in logs and errors
    pub name: String,
    /// Spreadsheet to read
    pub source: PathBuf,
    /// Sheet and row selection
    pub criteria: Criteria,
    /// Source header to target field, in declaration order
    pub column_map: Vec<(String, String)>,
    /// Derived fields, applied in declaration order
    pub rules: Vec<DerivedRule>,
    pub table: TargetTable,
}

impl ImportSpec {
    pub fn new<P: Into<PathBuf>>(name: &str, source: P, table: TargetTable) -> Self {
        Self {
            name: name.to_owned(),
            source: source.into(),
            criteria: Criteria::default(),
            column_map: Vec::new(),
            rules: Vec::new(),
            table,
        }
    }

    pub fn map_column(mut self, header: &str, field: &str) -> Self {
        self.column_map.push((header.to_owned(), field.to_owned()));
        self
    }

    pub fn rule(mut self, rule: DerivedRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    fn invalid(&self, message: String) -> ImportError {
        ImportError::InvalidSpec {
            name: self.name.to_owned(),
            message,
        }
    }

    /// Checks mapping uniqueness and that keys and preserved columns are target columns.
    pub fn validate(&self) -> Result<()> {
        let mut headers = HashSet::new();
        let mut fields = HashSet::new();
        for (header, field) in &self.column_map {
            if !headers.insert(header.as_str()) {
                return Err(self.invalid(format!("header '{}' is mapped twice", header)));
            }
            if !fields.insert(field.as_str()) {
                return Err(self.invalid(format!("field '{}' is a target twice", field)));
            }
        }
        let columns: HashSet<&str> = self.table.columns.iter().map(String::as_str).collect();
        if columns.len() != self.table.columns.len() {
            return Err(self.invalid(format!("table '{}' repeats a column", self.table.name)));
        }
        if self.table.conflict_keys.is_empty() {
            return Err(self.invalid("no conflict key columns".to_owned()));
        }
        for key in &self.table.conflict_keys {
            if !columns.contains(key.as_str()) {
                return Err(self.invalid(format!("conflict key '{}' is not a target column", key)));
            }
        }
        for preserved in &self.table.preserved_columns {
            if !columns.contains(preserved.as_str()) {
                return Err(self.invalid(format!(
                    "preserved column '{}' is not a target column",
                    preserved
                )));
            }
            if self.table.is_key(preserved) {
                return Err(self.invalid(format!(
                    "preserved column '{}' is also a conflict key",
                    preserved
                )));
            }
        }
        Ok(())
    }
}
