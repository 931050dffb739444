//! The `aurelia config` command.

use aurelia_core::config::GeminiConfig;
use aurelia_core::llm::build_provider;
use aurelia_core::Config;
use clap::{Args, Subcommand};
use console::Style;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration and whether the API key resolves
    Show,

    /// Show config file path
    Path,

    /// Write a config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);

            // Status goes to stderr so the TOML above can be redirected to a file
            let green = Style::new().for_stderr().green();
            let red = Style::new().for_stderr().red();
            let status = match build_provider(&config.llm) {
                Ok(client) if client.is_available().await => {
                    green.apply_to(format!("✓ {} credential found", client.name()))
                }
                Ok(client) => red.apply_to(format!("✗ {} client is not usable", client.name())),
                Err(e) => red.apply_to(format!("✗ {e}")),
            };
            eprintln!("{status}");
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // Spell out the default provider section so the key reference is visible
            let mut config = Config::default();
            config.llm.gemini = Some(GeminiConfig::default());
            std::fs::write(&path, config.to_toml()?)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
