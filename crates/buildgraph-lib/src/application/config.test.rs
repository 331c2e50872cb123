use super::*;

fn config_with_server(server: Option<&str>) -> AppConfig {
    AppConfig {
        server: server.map(str::to_string),
        username: None,
        password: None,
        package_prefix: String::new(),
        timeout: 30,
        deadline: 300,
        log_level: LogLevel::Warning,
        log_format: LogFormat::Text,
    }
}

#[test]
fn test_networking_config_requires_server() {
    let config = config_with_server(None);
    assert!(matches!(
        config.networking_config(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_networking_config_rejects_unparseable_server() {
    let config = config_with_server(Some("definitely not a url"));
    assert!(matches!(
        config.networking_config(),
        Err(ConfigError::InvalidServerUrl { .. })
    ));
}

#[test]
fn test_networking_config_carries_credentials_and_timeout() {
    let mut config = config_with_server(Some("http://teamcity/app/rest/server"));
    config.username = Some("bob".to_string());
    config.password = Some("s3cret".to_string());
    config.timeout = 5;

    let networking = config.networking_config().unwrap();
    assert_eq!(networking.base_url, "http://teamcity/app/rest/server");
    assert_eq!(networking.username.as_deref(), Some("bob"));
    assert_eq!(networking.password.as_deref(), Some("s3cret"));
    assert_eq!(networking.timeout_seconds, 5);
}

#[test]
fn test_package_filter_uses_configured_prefix() {
    let mut config = config_with_server(None);
    config.package_prefix = "Acme.".to_string();

    let filter = config.package_filter();
    assert!(filter.accepts(&crate::primitives::PackageVersionId::new("Acme.Core", "1.0.0")));
    assert!(!filter.accepts(&crate::primitives::PackageVersionId::new("Other", "1.0.0")));
}

#[test]
fn test_cli_parses_graph_command() {
    use crate::application::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::try_parse_from([
        "buildgraph",
        "--server",
        "http://teamcity/app/rest/server",
        "--package-prefix",
        "Acme.",
        "graph",
        "--output",
        "graph.dot",
    ])
    .unwrap();

    assert_eq!(
        cli.config.server.as_deref(),
        Some("http://teamcity/app/rest/server")
    );
    assert_eq!(cli.config.package_prefix, "Acme.");
    assert!(matches!(
        cli.command,
        Some(Commands::Graph { output: Some(ref o) }) if o == "graph.dot"
    ));
}
