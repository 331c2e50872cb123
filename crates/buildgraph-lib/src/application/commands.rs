//! Command execution handlers
//!
//! Wires the live networking stack into the crawler, runs the crawl under
//! the configured deadline, and hands the resolved entities to the
//! renderer or the plain-text dump.

use crate::api::crawler::Crawler;
use crate::api::fetcher::LiveDocumentFetcher;
use crate::api::graph;
use crate::application::{AppConfig, CliConfig, Commands};
use crate::networking::NetworkingManager;
use crate::primitives::Project;
use crate::render;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Execute the CLI command
pub async fn execute_command(config: CliConfig) -> Result<()> {
    let command = match config.command {
        Some(command) => command,
        None => {
            eprintln!("buildgraph - CI server package dependency graphs");
            eprintln!("Run 'buildgraph --help' for usage information");
            return Ok(());
        }
    };

    match command {
        Commands::Graph { output } => handle_graph(&config.app_config, output).await,
        Commands::Dump => handle_dump(&config.app_config).await,
    }
}

/// One full crawl against the configured server, bounded by the deadline.
/// Dropping the crawl at the deadline cancels every in-flight request.
async fn crawl(config: &AppConfig) -> Result<Vec<Project>> {
    let networking = NetworkingManager::new(config.networking_config()?)?;
    let fetcher = Arc::new(LiveDocumentFetcher::new(Arc::new(networking)));
    let crawler = Crawler::new(fetcher, config.package_filter());

    let deadline = Duration::from_secs(config.deadline);
    let projects = tokio::time::timeout(deadline, crawler.crawl())
        .await
        .map_err(|_| anyhow::anyhow!("Crawl exceeded deadline of {}s", config.deadline))??;

    info!(projects = projects.len(), "Crawl complete");
    Ok(projects)
}

async fn handle_graph(config: &AppConfig, output: Option<String>) -> Result<()> {
    let projects = crawl(config).await?;
    let edges = graph::build_edges(&projects);

    let mut dot = String::new();
    render::write_graph(&mut dot, &projects, &edges)
        .context("Failed to render dot output")?;

    match output {
        Some(path) => {
            std::fs::write(&path, dot)
                .with_context(|| format!("Failed to write dot output to '{}'", path))?;
            info!(%path, "Wrote graph");
        }
        None => print!("{}", dot),
    }
    Ok(())
}

async fn handle_dump(config: &AppConfig) -> Result<()> {
    let projects = crawl(config).await?;

    for project in &projects {
        println!("{}", project);
        for build_type in project.build_types.values() {
            println!("  {}", build_type);
            for build in build_type.builds.values() {
                println!("    {}", build);
                for package in build.created_packages.values() {
                    println!("      creates {}", package);
                }
                for package in build.dependencies.values() {
                    println!("      consumes {}", package);
                }
            }
        }
    }
    Ok(())
}
