use anyhow::Result;
use clap::Parser;
use workflow_documenter::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Diagnostics go to stderr so streamed generation output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}
