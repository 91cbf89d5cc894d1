use crate::error::{ImportError, Result, ResultMessage};
use crate::spreadsheet::Criteria;
use glob::Pattern;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml::Table;

/// File name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "sheet-upsert.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub defaults: Defaults,
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// DuckDB file, or `:memory:`
    pub path: String,
}

/// Values stamped on every imported row.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Defaults {
    /// Written to `create_by` and `update_by`
    pub operator: String,
    /// Written to `status`
    pub status: i64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ImportConfig {
    /// Glob pattern selecting the sheet, first sheet when absent
    pub sheet: Option<String>,
    pub skip_empty_rows: bool,
}

/// Default configuration embedded in the binary.
/// Every key a file leaves out is taken from here.
const DEFAULT_CONFIG: &str = r#"
[database]
path = "sheet_upsert.duckdb"

[defaults]
operator = "admin"
status = 1

[import]
skip_empty_rows = true
"#;

impl Default for Config {
    fn default() -> Self {
        Self::parse("").expect("Embedded default configuration")
    }
}

/// Overlays `overrides` on `base`, descending into nested tables.
fn merge(base: &mut Table, overrides: Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(nested)), toml::Value::Table(value)) => merge(nested, value),
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

impl Config {
    /// Parses a configuration file on top of the embedded default.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut table: Table = toml::from_str(DEFAULT_CONFIG)?;
        merge(&mut table, toml::from_str(contents)?);
        Ok(toml::Value::Table(table).try_into()?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(ImportError::from)
            .with_prefix(&format!("Read config '{}'", path.display()))?;
        Self::parse(&contents)
    }

    /// Load configuration.
    ///
    /// Search order:
    /// 1. The explicit path, when given
    /// 2. `sheet-upsert.toml` next to the executable
    /// 3. The embedded default
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Loading config from: {}", path.display());
            return Self::read(path);
        }
        if let Some(path) = beside_executable() {
            if path.is_file() {
                log::info!("Loading config from: {}", path.display());
                return Self::read(&path);
            }
        }
        log::info!("Using default embedded configuration");
        Self::parse("")
    }

    /// Sheet selection derived from the `[import]` section.
    pub fn criteria(&self) -> Result<Criteria> {
        let mut criteria = Criteria {
            skip_empty_rows: self.import.skip_empty_rows,
            ..Criteria::default()
        };
        if let Some(sheet) = &self.import.sheet {
            criteria = criteria.with_sheet_pattern(Pattern::new(sheet)?);
        }
        Ok(criteria)
    }
}

fn beside_executable() -> Option<PathBuf> {
    let executable = std::env::current_exe().ok()?;
    Some(executable.parent()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_loads() {
        let config = Config::default();
        assert_eq!(config, Config::parse(DEFAULT_CONFIG).unwrap());
        assert_eq!(config.database.path, "sheet_upsert.duckdb");
        assert_eq!(config.defaults.operator, "admin");
        assert_eq!(config.defaults.status, 1);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::parse("[defaults]\noperator = \"importer\"\n").unwrap();
        assert_eq!(config.defaults.operator, "importer");
        assert_eq!(config.defaults.status, 1);
        assert_eq!(config.database.path, "sheet_upsert.duckdb");
        assert!(config.import.skip_empty_rows);
    }

    #[test]
    fn nested_override_keeps_siblings() {
        let config = Config::parse("[import]\nsheet = \"诊疗*\"\n").unwrap();
        assert_eq!(config.import.sheet.as_deref(), Some("诊疗*"));
        assert!(config.import.skip_empty_rows);
        assert_eq!(config.defaults, Config::default().defaults);
    }

    #[test]
    fn invalid_config() {
        let error = Config::parse("[defaults]\nstatus = \"on\"\n").unwrap_err();
        assert!(matches!(error, ImportError::ConfigError(_)));
    }

    #[test]
    fn read_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[database]\npath = \":memory:\"\n[import]\nsheet = \"药品*\"\nskip_empty_rows = false\n",
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.database.path, ":memory:");

        let criteria = config.criteria().unwrap();
        assert!(!criteria.skip_empty_rows);
        assert!(criteria.accept("药品目录"));
        assert!(!criteria.accept("Sheet1"));
    }

    #[test]
    fn read_missing_file() {
        let error = Config::load(Some(Path::new("missing/sheet-upsert.toml"))).unwrap_err();
        assert!(error.to_string().starts_with("Read config 'missing/sheet-upsert.toml'"));
    }

    #[test]
    fn invalid_sheet_pattern() {
        let mut config = Config::default();
        config.import.sheet = Some("[".to_owned());
        assert!(matches!(config.criteria().unwrap_err(), ImportError::PatternError(_)));
    }
}
