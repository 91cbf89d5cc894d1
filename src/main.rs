use anyhow::{Context, Result};
use clap::Parser;
use glob::Pattern;
use sheet_upsert::config::Config;
use sheet_upsert::database;
use sheet_upsert::import::{prepare, run};
use sheet_upsert::jobs::Job;
use std::path::PathBuf;
use std::process::ExitCode;

/// Upsert the rows of a catalog spreadsheet into a DuckDB table.
#[derive(Debug, Parser)]
#[command(name = "sheet-upsert", version, about)]
struct Cli {
    /// Import job to run
    #[arg(value_enum)]
    job: Job,

    /// Spreadsheet file (.xlsx, .xlsm, .xlsb, .xls, .ods)
    file: PathBuf,

    /// Configuration file, `sheet-upsert.toml` next to the executable by default
    #[arg(long)]
    config: Option<PathBuf>,

    /// DuckDB database file, or `:memory:`
    #[arg(long, env = "SHEET_UPSERT_DATABASE")]
    database: Option<String>,

    /// Target table name instead of the job's default
    #[arg(long)]
    table: Option<String>,

    /// Glob pattern selecting the sheet to read
    #[arg(long)]
    sheet: Option<String>,

    /// Name written to create_by and update_by
    #[arg(long)]
    operator: Option<String>,

    /// Keep rows whose cells are all empty
    #[arg(long)]
    keep_empty_rows: bool,

    /// Read and transform the file without writing to the database
    #[arg(long)]
    dry_run: bool,
}

fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    if let Some(operator) = cli.operator {
        config.defaults.operator = operator;
    }
    if cli.keep_empty_rows {
        config.import.skip_empty_rows = false;
    }

    let mut criteria = config.criteria().context("Invalid [import] section")?;
    if let Some(sheet) = &cli.sheet {
        let pattern = Pattern::new(sheet).with_context(|| format!("Invalid sheet pattern '{}'", sheet))?;
        criteria.sheet_name_patterns = Some(vec![pattern]);
    }

    let mut spec = cli.job.spec(&cli.file, &config.defaults).with_criteria(criteria);
    if let Some(table) = cli.table {
        spec.table.name = table;
    }

    if cli.dry_run {
        let rows = prepare(&spec).with_context(|| format!("Failed to read '{}'", cli.file.display()))?;
        log::info!(
            "Dry run of '{}': {} rows ready for '{}'",
            cli.job,
            rows.len(),
            spec.table.name
        );
        return Ok(());
    }

    let mut connection = database::open(&config.database.path)
        .with_context(|| format!("Failed to open database '{}'", config.database.path))?;
    let result = run(&spec, &mut connection).with_context(|| format!("Import '{}' failed", cli.job))?;
    println!(
        "{}: {} rows, {} distinct keys upserted into '{}'",
        cli.job, result.rows, result.distinct_keys, result.table
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}
