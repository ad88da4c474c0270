use anyhow::{Context, Result};
use clap::Parser;
use lbprobe_config::domains::logging::LogLevel;
use lbprobe_config::{ConfigLoader, LbProbeConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{debug, error, info};

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};
use commands::run::{RunOutcome, RunOverrides};

/// Process exit codes: pass, distribution violated, fatal error
const EXIT_PASSED: u8 = 0;
const EXIT_VIOLATION: u8 = 1;
const EXIT_FATAL: u8 = 2;

/// Load from `config_path` when given, otherwise from the environment alone.
///
/// A path that was asked for but does not exist is an error.
fn load_config(config_path: Option<&PathBuf>) -> Result<LbProbeConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {:?}", path);
            }
            info!("Loading configuration from: {:?}", path);
            loader
                .from_file(path)
                .context(format!("Failed to load configuration from {:?}", path))
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

fn init_logging(config: &LbProbeConfig, log_level: Option<&String>) -> Result<()> {
    let mut logging = config.logging.clone();
    if let Some(level) = log_level {
        logging.level = LogLevel::from_str(level).map_err(|e| anyhow::anyhow!(e))?;
    }
    lbprobe_logging::init_logging_from_config(&logging)
}

async fn dispatch(cli: Cli) -> Result<RunOutcome> {
    // `config validate` reads its own file and must not fail on a bad --config
    if let Commands::Config {
        config_cmd: ConfigCommands::Validate { ref config_file },
    } = cli.command
    {
        lbprobe_logging::init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
        commands::config::handle_config_validate(config_file)?;
        return Ok(RunOutcome::Passed);
    }

    let config = load_config(cli.config.as_ref())?;
    init_logging(&config, cli.log_level.as_ref())?;

    match cli.command {
        Commands::Run {
            url,
            host,
            requests,
            replicas,
            concurrency,
            json,
        } => {
            let overrides = RunOverrides {
                url,
                host,
                requests,
                replicas,
                concurrency,
            };
            commands::run::run_command(config, overrides, json).await
        }
        Commands::Config { config_cmd } => {
            match config_cmd {
                ConfigCommands::Generate { output, force } => {
                    commands::config::handle_config_generate(output.as_deref(), force)?
                }
                ConfigCommands::Show { format } => {
                    commands::config::handle_config_show(&config, &format)?
                }
                ConfigCommands::Validate { .. } => {}
            }
            Ok(RunOutcome::Passed)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(RunOutcome::Passed) => ExitCode::from(EXIT_PASSED),
        Ok(RunOutcome::DistributionViolated) => ExitCode::from(EXIT_VIOLATION),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_path_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/lbprobe.yaml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
        assert!(err.to_string().contains("lbprobe.yaml"));
    }

    #[test]
    fn test_existing_config_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "target:\n  base_url: \"http://10.0.0.5:8080/\"\n  host: \"lb.example\"\n"
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.target.base_url, "http://10.0.0.5:8080/");
        assert_eq!(config.target.host, "lb.example");
    }
}
