use crate::contract::ConsoleEcho;
use crate::generate::OpenAiGenerator;
use crate::load_config::load_config;
use crate::pipeline::{self, PipelineReport};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for workflow-documenter: document GitHub Actions workflows with a model runner.
#[derive(Parser)]
#[clap(
    name = "workflow-documenter",
    version,
    about = "Generate markdown documentation for GitHub Actions workflows via an OpenAI-compatible model"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Document every workflow file using the given config file
    Generate {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate { config } => {
            let config = load_config(config)?;
            config.trace_loaded();

            let generator = OpenAiGenerator::new(&config.generation);
            let mut observer = ConsoleEcho;

            println!("Documentation run starting...");
            match pipeline::run(&config, &generator, &mut observer).await {
                Ok(report) => {
                    print_summary(&report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Documentation run failed: {e}");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}

fn print_summary(report: &PipelineReport) {
    if report.discovered == 0 {
        println!("No workflow files found, nothing to document.");
        return;
    }

    println!(
        "Documented {} of {} workflow(s)",
        report.succeeded(),
        report.discovered
    );

    match &report.index_path {
        Some(path) => println!("Index written: {}", path.display()),
        None if report.succeeded() > 0 => println!("Index could not be written."),
        None => {}
    }
}
