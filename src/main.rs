//! Errstore CLI - create error namespaces and load validation errors into them

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use errstore::config::{self, ErrstoreConfig};
use errstore::storage::{DatabaseFile, ErrorStore, StoreOptions, TableMode};
use errstore::ErrorRecord;
use errstore::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "errstore")]
#[command(version)]
#[command(about = "Append-only SQLite storage for batch validation errors")]
#[command(long_about = r#"
Errstore keeps the errors of a validation run in three prefixed tables:
  <prefix>errors, <prefix>error_refs, <prefix>error_info

Example usage:
  errstore init --database feeds.db --prefix feed_42_
  errstore ingest --database feeds.db --prefix feed_42_ --input errors.jsonl
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors and warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file (defaults to ./errstore.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the error tables for a namespace
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Table name prefix for this validation run
        #[arg(short, long)]
        prefix: Option<String>,

        /// Also write the settings used to the config file
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Store newline-delimited JSON error records
    Ingest {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Table name prefix for this validation run
        #[arg(short, long)]
        prefix: Option<String>,

        /// Input file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Create the namespace tables instead of attaching to existing ones
        #[arg(long)]
        create: bool,

        /// Number of errors per insert batch
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

fn main() {
    if let Err(err) = run() {
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    errstore::output::init_quiet(cli.quiet);

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let loaded = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Init { database, prefix, write_config, force } => {
            let settings = merge(&loaded, database, prefix, None);
            let database = settings.database_path();
            let source = DatabaseFile::new(&database);

            ui::header(&format!("Creating error tables in {}", database.display()));
            let store = ErrorStore::open(&source, settings.table_prefix(), TableMode::Create)?;
            let tables = store.tables().clone();
            store.finish()?;

            ui::summary_row("errors:", &tables.errors);
            ui::summary_row("refs:", &tables.error_refs);
            ui::summary_row("info:", &tables.error_info);

            if write_config {
                let path = cli.config.clone().unwrap_or_else(config::default_config_path);
                config::write_config(&path, &settings, force)?;
                ui::info("Config written to", &path.display().to_string());
            }
            ui::success("Namespace ready");
        }

        Commands::Ingest { database, prefix, input, create, batch_size } => {
            let settings = merge(&loaded, database, prefix, batch_size);
            let database = settings.database_path();
            let options: StoreOptions = settings.store_options()?;
            let mode = if create { TableMode::Create } else { TableMode::Attach };

            tracing::info!("Ingesting {} into {:?}", input.display(), database);
            let source = DatabaseFile::new(&database);
            let mut store = ErrorStore::open_with_options(&source, settings.table_prefix(), mode, options)?;
            let first_id = store.error_count();

            let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
                Box::new(BufReader::new(std::io::stdin()))
            } else {
                let file = std::fs::File::open(&input)
                    .with_context(|| format!("failed to open {}", input.display()))?;
                Box::new(BufReader::new(file))
            };

            for (index, line) in reader.lines().enumerate() {
                let line = line.with_context(|| format!("failed to read line {}", index + 1))?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: ErrorRecord = serde_json::from_str(&line)
                    .with_context(|| format!("invalid error record on line {}", index + 1))?;
                store.store_error(record)?;
            }

            let next_id = store.error_count();
            store.finish()?;

            let stored = next_id - first_id;
            if stored == 0 {
                ui::warn("No error records found in input");
            } else {
                ui::info(
                    &format!("{} Stored", Icons::DATABASE),
                    &format!("{} errors (ids {}..={})", stored, first_id, next_id - 1),
                );
            }
            ui::success("Ingest complete");
        }
    }

    Ok(())
}

/// Command-line values win over the config file
fn merge(
    loaded: &ErrstoreConfig,
    database: Option<PathBuf>,
    prefix: Option<String>,
    batch_size: Option<usize>,
) -> ErrstoreConfig {
    ErrstoreConfig {
        database: database
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| loaded.database.clone()),
        table_prefix: prefix.or_else(|| loaded.table_prefix.clone()),
        batch_size: batch_size.or(loaded.batch_size),
    }
}
