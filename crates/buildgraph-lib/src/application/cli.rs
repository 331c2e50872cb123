use crate::primitives::ConfigError;
use clap::{Parser, Subcommand};

use super::config::AppConfig;

/// buildgraph CLI - CI server package dependency graphs
#[derive(Debug, Clone, Parser)]
#[command(name = "buildgraph")]
#[command(about = "Graph which build configurations produce and consume which packages")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// buildgraph commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load configuration from `.env` and command line arguments
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env means env vars come from the process environment;
        // a malformed one is a real configuration error
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                return Err(ConfigError::EnvFileError {
                    file: ".env".to_string(),
                    source: error,
                });
            }
        }

        let cli = Cli::parse();
        Ok(Self {
            app_config: cli.config,
            command: cli.command,
        })
    }
}

/// Available buildgraph commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Crawl the server and emit the dependency graph as Graphviz dot
    Graph {
        /// Output file for the dot text
        #[arg(short, long, help = "Write the dot text to a file instead of stdout")]
        output: Option<String>,
    },

    /// Crawl the server and print the resolved hierarchy as plain text
    Dump,
}
