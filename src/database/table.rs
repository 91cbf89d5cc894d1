/// Target table of an import: column order for binding plus upsert keys.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetTable {
    /// Table name
    pub name: String,
    /// Columns in statement binding order
    pub columns: Vec<String>,
    /// Columns of the unique constraint used to detect existing rows
    pub conflict_keys: Vec<String>,
    /// Non-key columns written on insert but kept on conflict
    pub preserved_columns: Vec<String>,
}

impl TargetTable {
    pub fn new(name: &str, columns: &[&str], conflict_keys: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            conflict_keys: conflict_keys.iter().map(|column| column.to_string()).collect(),
            preserved_columns: Vec::new(),
        }
    }

    pub fn with_preserved(mut self, columns: &[&str]) -> Self {
        self.preserved_columns = columns.iter().map(|column| column.to_string()).collect();
        self
    }

    pub fn is_key(&self, column: &str) -> bool {
        self.conflict_keys.iter().any(|key| key == column)
    }

    pub fn is_preserved(&self, column: &str) -> bool {
        self.preserved_columns.iter().any(|preserved| preserved == column)
    }

    /// Columns overwritten when the conflict key already exists.
    pub fn update_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| !self.is_key(column) && !self.is_preserved(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_columns_skip_keys_and_preserved() {
        let table = TargetTable::new(
            "disease",
            &["icd_code", "disease_code", "disease_name", "create_by", "update_by"],
            &["icd_code", "disease_code"],
        )
        .with_preserved(&["create_by"]);

        assert!(table.is_key("icd_code"));
        assert!(!table.is_key("disease_name"));
        assert!(table.is_preserved("create_by"));
        assert_eq!(
            table.update_columns().collect::<Vec<_>>(),
            vec!["disease_name", "update_by"]
        );
    }
}
