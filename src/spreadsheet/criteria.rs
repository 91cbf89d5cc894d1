use glob::Pattern;

/// Criteria for selecting the sheet and rows to import.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Sheet name patterns; the first matching sheet is imported.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Skip rows where all columns are empty.
    pub skip_empty_rows: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            sheet_name_patterns: None,
            skip_empty_rows: true,
        }
    }
}

impl Criteria {
    /// Restricts the import to sheets matching a glob pattern.
    pub fn with_sheet_pattern(mut self, pattern: Pattern) -> Self {
        self.sheet_name_patterns
            .get_or_insert_with(Vec::new)
            .push(pattern);
        self
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(sheet_name)),
            None => true,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns
                .iter()
                .map(|pattern| pattern.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => "*".to_owned(),
        }
    }
}
