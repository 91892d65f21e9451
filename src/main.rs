//! Rosterload CLI - personnel roster with CSV bulk import
//!
//! ```bash
//! rosterload serve                  # Start HTTP server (port 3000)
//! rosterload import people.csv     # Import a CSV file into the roster
//! rosterload list                  # Print the roster, surname order
//! ```
//!
//! The database URL comes from `--database-url`, the `DATABASE_URL`
//! environment variable, or defaults to `sqlite:roster.db`.

use clap::{Parser, Subcommand};
use rosterload::{import_file, RecordStore, DEFAULT_DATABASE_URL};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "rosterload")]
#[command(about = "Personnel roster service with CSV bulk import", long_about = None)]
struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Import a CSV file into the roster
    Import {
        /// Input CSV file
        input: PathBuf,
    },

    /// Print all records, ordered by surname
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    let store = RecordStore::new(&database_url).await?;

    match cli.command {
        Commands::Serve { port } => cmd_serve(port, store).await,
        Commands::Import { input } => cmd_import(&input, store).await,
        Commands::List => cmd_list(store).await,
    }
}

async fn cmd_serve(port: u16, store: RecordStore) -> anyhow::Result<()> {
    rosterload::server::start_server(port, store)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))
}

async fn cmd_import(input: &std::path::Path, store: RecordStore) -> anyhow::Result<()> {
    let outcome = import_file(&store, input).await?;

    println!("{}", outcome.summary());
    if let Some(issues) = outcome.issues() {
        eprintln!("{}", issues);
    }

    Ok(())
}

async fn cmd_list(store: RecordStore) -> anyhow::Result<()> {
    let records = store.list().await?;

    if records.is_empty() {
        println!("Roster is empty.");
        return Ok(());
    }

    for record in records {
        println!(
            "[{}] {} - {}, {} (started {})",
            record.id,
            record.fields.payroll_number,
            record.fields.surname,
            record.fields.forenames,
            record.fields.start_date,
        );
    }

    Ok(())
}
