//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the configured number of requests and verify the replica distribution
    Run {
        /// Base URL of the load balancer, e.g. http://192.168.49.2:30080/
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Value of the Host header that selects the routing rule
        #[arg(long, value_name = "HOST")]
        host: Option<String>,

        /// Number of requests to send
        #[arg(long, value_name = "N")]
        requests: Option<u64>,

        /// Number of replicas expected behind the host
        #[arg(long, value_name = "N")]
        replicas: Option<usize>,

        /// Requests in flight at once
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Print the run report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path; prints to stdout when omitted
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration after environment overrides
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}
