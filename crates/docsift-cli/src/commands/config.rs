//! Config command - inspect and initialize configuration.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use docsift_core::DocsiftConfig;

use super::load_config;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init(InitArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "docsift.json")]
    output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommand::Init(init) => {
            if init.output.exists() && !init.force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    init.output.display()
                );
            }
            DocsiftConfig::default().save(&init.output)?;
            println!(
                "{} Wrote default configuration to {}",
                style("ok").green(),
                init.output.display()
            );
            Ok(())
        }
    }
}
