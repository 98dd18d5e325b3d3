mod commands;
mod engine;
mod predict;
mod preprocess;

use clap::Parser;
use commands::{Cli, Commands};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess {
            image,
            invert,
            json,
        } => {
            preprocess::print_preprocessed(&image, invert, json)?;
        }
        Commands::Predict {
            image,
            model,
            invert,
            json,
        } => {
            predict::predict(&image, &model, invert, json)?;
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays clean for --json
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
