use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show resolved configuration with provenance
    Show {
        /// Working directory (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Project config file (defaults to the nearest .rtk-codegen.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn run(args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show { path, config } => {
            let working_dir = super::resolve_working_dir(path)?;
            let overrides = CliOverrides {
                config_file: config.clone(),
                ..Default::default()
            };
            let resolved = resolve_config(&working_dir, &overrides)?;
            let mut stdout = std::io::stdout();
            crate::config::show::render_show(&mut stdout, &resolved)?;
        }
    }
    Ok(())
}
