//! # buildgraph Library
//!
//! Crawls a TeamCity-style CI server's hypermedia REST API and derives a
//! directed graph of which build configurations produce which NuGet
//! packages and which packages depend on which others.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types, errors, and the domain entities
//! - [`logger`] - Structured logging with progress tracking
//! - [`networking`] - Shared HTTP client with basic auth and timeouts
//! - [`api`] - Hypermedia traversal, feed resolution, and edge derivation
//! - [`render`] - Graphviz output over the resolved entities
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() {
//! // Initialize and run buildgraph
//! buildgraph_lib::main().await.unwrap();
//! # }
//! ```

pub mod api;
pub mod application;
pub mod logger;
pub mod networking;
pub mod primitives;
pub mod render;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use logger::Logger;
pub use networking::{NetworkingConfig, NetworkingManager};
pub use primitives::{ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub async fn main() -> Result<()> {
    // Load CLI configuration
    let config = CliConfig::load()?;

    // Structured logging before anything touches the network
    Logger::init(config.app_config.logger_config())?;

    // Execute the command
    execute_command(config).await
}
