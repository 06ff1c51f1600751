use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use marquee::config::Config;
use marquee::importer::ImportUseCase;
use marquee::observability::logging;
use marquee::server::{self, AppState};
use marquee::storage::{JsonFileStore, MemoryStore, Store};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Theatre events calendar backend with spreadsheet import")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Override the bind address from config.toml
        #[arg(long)]
        bind: Option<String>,
        /// Keep data in memory only (nothing written to disk)
        #[arg(long)]
        ephemeral: bool,
    },
    /// Import a spreadsheet from disk into the data file
    Import {
        /// Path to the workbook (.xlsx/.xls/.ods)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    logging::init_logging();

    let config = Config::load()?;

    match cli.command {
        Commands::Serve { bind, ephemeral } => {
            let store: Arc<dyn Store> = if ephemeral {
                info!("using in-memory store; data will not persist");
                Arc::new(MemoryStore::new())
            } else {
                Arc::new(JsonFileStore::new(config.server.data_file.clone()))
            };
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let state = AppState {
                store,
                config: Arc::new(config),
            };
            server::serve(state, &bind).await?;
        }
        Commands::Import { file } => {
            let bytes = std::fs::read(&file)?;
            let store: Arc<dyn Store> = Arc::new(JsonFileStore::new(config.server.data_file.clone()));
            let use_case = ImportUseCase::new(config.import, store);
            let summary = use_case.import_bytes(&bytes).await?;
            println!("✅ {}", summary.message());
            if summary.rejected_rows > 0 {
                println!("⚠️  {} row(s) skipped for missing required fields", summary.rejected_rows);
            }
        }
    }

    Ok(())
}
