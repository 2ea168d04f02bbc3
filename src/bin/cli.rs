use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trivia_api::config::LoggingSettings;
use trivia_api::db::{self, export};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories and questions from CSV files in a directory
    Import { path: PathBuf },
    /// Export categories and questions to CSV files in a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing(&LoggingSettings::default());
    let cli = Cli::parse();
    let db_path = cli.db_path.display().to_string();
    let pool = db::establish_connection(&db_path, 1)
        .await
        .with_context(|| format!("Cannot connect to DB {db_path}"))?;
    db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Export { path } => export::export_data(&pool, &path)
            .await
            .context("Cannot export"),
        Commands::Import { path } => export::import_data(&pool, &path)
            .await
            .context("Cannot import"),
    }
}
