//! `djforge config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            })?;
            output.data(&value)?;
        }

        ConfigCommands::List => {
            let serialised = toml::to_string_pretty(&config)
                .with_cli_context(|| "Failed to serialise config")?;
            output.data(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            let path = AppConfig::config_path().ok_or_else(|| CliError::ConfigError {
                message: "No home directory to place a config file in".into(),
                source: None,
            })?;
            output.data(&path.display().to_string())?;
        }
    }

    Ok(())
}
