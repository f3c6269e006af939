//! AlgoeDB CLI
//!
//! Command-line access to an AlgoeDB collection file.
//!
//! # Commands
//!
//! - `insert` - Insert a record or an array of records
//! - `find` - Print matching records
//! - `update` - Merge fields into matching records
//! - `delete` - Remove matching records
//! - `count` - Count matching records
//! - `inspect` - Display collection statistics
//!
//! Record selection uses repeated `--where` filters, combined with AND.

mod commands;
mod filter;

use algoedb_core::Database;
use clap::{Parser, Subcommand};
use commands::Format;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// AlgoeDB command-line tool.
#[derive(Parser)]
#[command(name = "algoedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the collection file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a JSON object or an array of objects
    Insert {
        /// Record(s) as JSON
        json: String,
    },

    /// Print records matching the filters
    Find {
        /// Filter such as `age>25`, `name=alice` or `email?` (repeatable)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,

        /// Only the first match
        #[arg(short, long)]
        one: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Merge fields into records matching the filters
    Update {
        /// Fields to set, as a JSON object
        #[arg(short, long)]
        set: String,

        /// Filter (repeatable)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,

        /// Only the first match
        #[arg(short, long)]
        one: bool,
    },

    /// Delete records matching the filters
    Delete {
        /// Filter (repeatable)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,

        /// Only the first match
        #[arg(short, long)]
        one: bool,
    },

    /// Count records matching the filters
    Count {
        /// Filter (repeatable)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,
    },

    /// Display collection statistics
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let open = |command: &str| -> Result<Database, Box<dyn std::error::Error>> {
        let path = cli
            .path
            .as_deref()
            .ok_or_else(|| format!("Database path required for {command}"))?;
        Ok(Database::open(path)?)
    };

    match &cli.command {
        Commands::Insert { json } => {
            commands::insert::run(&open("insert")?, json)?;
        }
        Commands::Find {
            filters,
            one,
            format,
        } => {
            let query = filter::build_query(filters)?;
            commands::find::run(&open("find")?, &query, *one, *format)?;
        }
        Commands::Update { set, filters, one } => {
            let query = filter::build_query(filters)?;
            commands::update::run(&open("update")?, &query, set, *one)?;
        }
        Commands::Delete { filters, one } => {
            let query = filter::build_query(filters)?;
            commands::delete::run(&open("delete")?, &query, *one)?;
        }
        Commands::Count { filters } => {
            let query = filter::build_query(filters)?;
            commands::count::run(&open("count")?, &query);
        }
        Commands::Inspect { format } => {
            let path = cli.path.as_deref().ok_or("Database path required for inspect")?;
            commands::inspect::run(path, *format)?;
        }
        Commands::Version => {
            println!("AlgoeDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("AlgoeDB Core v{}", algoedb_core::VERSION);
        }
    }

    Ok(())
}
