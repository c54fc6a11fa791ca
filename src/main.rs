#![allow(dead_code)]

mod cli;
mod codegen;
mod config;
mod errors;
mod generate;
mod openapi;
mod output;
mod parse;
mod resolve;

use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries generated code
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    cli::dispatch(cli).await?;
    Ok(())
}
