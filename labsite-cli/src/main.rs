//! labsite CLI - lab website backend
//!
//! Entry point for the `labsite` binary:
//! - `serve` runs the HTTP API (news, members, image uploads)
//! - `schema` prints the PostgreSQL schema

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "labsite",
    author,
    version,
    about = "HTTP backend for the lab website: news posts, members and their photos"
)]
struct Cli {
    /// Debug logging (when RUST_LOG is not set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Print the PostgreSQL schema (CREATE TABLE statements)
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap sees variables from .env files
    config::load_env_files();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Schema => commands::run_schema()?,
    }
    Ok(())
}
