pub mod config;
pub mod generate;

use crate::errors::{CodegenError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "rtk-codegen",
    version,
    about = "Generate RTK Query API definitions from OpenAPI documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a createApi module from an OpenAPI document
    Generate(generate::GenerateArgs),
    /// Inspect configuration
    Config(config::ConfigArgs),
}

/// Dispatch to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => generate::run(&args).await,
        Commands::Config(args) => config::run(&args),
    }
}

fn resolve_working_dir(path: &Option<PathBuf>) -> Result<PathBuf> {
    let p = path.clone().unwrap_or_else(|| PathBuf::from("."));
    p.canonicalize()
        .map_err(|_| CodegenError::Config(format!("Invalid path: {}", p.display())))
}
