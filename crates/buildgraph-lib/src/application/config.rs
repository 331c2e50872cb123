//! Application configuration
//!
//! One flat config struct flattened into the CLI; every field has an
//! environment fallback so credentials stay out of shell history.

use crate::networking::NetworkingConfig;
use crate::primitives::{
    ConfigError, LogFormat, LogLevel, LogOutput, LoggerConfig, PackageFilter,
};
use clap::Args;
use reqwest::Url;

/// Global application configuration
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Root URL of the CI server's REST API (e.g. http://teamcity/app/rest/server)
    #[arg(long, env = "BUILDGRAPH_SERVER")]
    pub server: Option<String>,

    /// Basic-auth username for the server
    #[arg(long, env = "BUILDGRAPH_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password for the server
    #[arg(long, env = "BUILDGRAPH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Only packages whose id starts with this prefix enter the graph.
    /// Empty accepts every package.
    #[arg(long, env = "BUILDGRAPH_PACKAGE_PREFIX", default_value = "")]
    pub package_prefix: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Whole-crawl deadline in seconds
    #[arg(long, default_value_t = 300)]
    pub deadline: u64,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Log record format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Networking config for the configured server.
    ///
    /// Fails when no server URL is configured or it does not parse; both
    /// are configuration mistakes, reported before any crawling starts.
    pub fn networking_config(&self) -> Result<NetworkingConfig, ConfigError> {
        let server = self
            .server
            .as_deref()
            .ok_or_else(|| ConfigError::ValidationFailed {
                reason: "no server URL configured (--server or BUILDGRAPH_SERVER)".to_string(),
            })?;

        Url::parse(server).map_err(|e| ConfigError::InvalidServerUrl {
            url: server.to_string(),
            reason: e.to_string(),
        })?;

        Ok(NetworkingConfig {
            base_url: server.to_string(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout_seconds: self.timeout,
        })
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.log_level,
            format: self.log_format,
            output: LogOutput::Stderr,
        }
    }

    pub fn package_filter(&self) -> PackageFilter {
        PackageFilter::prefix(self.package_prefix.clone())
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
