pub mod chat;
pub mod ingest;
pub mod search;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Docqa CLI
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(version = "0.1.0")]
#[command(about = "Ask questions about your documents from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory of text documents
    Ingest(ingest::IngestArgs),

    /// Search the index without generating an answer
    Search(search::SearchArgs),

    /// Chat with your documents
    Chat(chat::ChatArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ingest(args) => ingest::run_ingest(args).await,
        Commands::Search(args) => search::run_search(args).await,
        Commands::Chat(args) => chat::run_chat(args).await,
    }
}
