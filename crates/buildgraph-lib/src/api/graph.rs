//! Dependency edge derivation over the assembled entity graph
//!
//! Pure and synchronous: runs after the concurrent crawl has fully
//! materialized the projects. Produces the edge set the renderer draws:
//! package-to-package edges for publishing builds, and configuration-to-
//! package edges with one-hop indirect-dependency elision for builds that
//! only consume.

use crate::primitives::{Build, BuildType, Package, Project};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::trace;

/// One directed edge of the rendered graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// One representative package per package id across every build's created
/// packages. Duplicate ids (same package created by several builds, even
/// at differing versions) collapse to the first one seen in scan order.
///
/// Read-only snapshot used only for indirect-dependency elision; holds
/// references into the assembled graph and is rebuilt fresh per crawl.
pub fn package_index(projects: &[Project]) -> BTreeMap<&str, &Package> {
    let mut index: BTreeMap<&str, &Package> = BTreeMap::new();
    for project in projects {
        for build_type in project.build_types.values() {
            for build in build_type.builds.values() {
                for package in build.created_packages.values() {
                    index
                        .entry(package.version_id.id.as_str())
                        .or_insert(package);
                }
            }
        }
    }
    index
}

/// Derive the full edge set for the assembled projects.
///
/// Only entities that touched packages contribute; everything else is
/// invisible to the graph.
pub fn build_edges(projects: &[Project]) -> Vec<Edge> {
    let index = package_index(projects);
    let mut edges = Vec::new();

    for project in projects.iter().filter(|p| p.uses_nuget()) {
        for build_type in project.build_types.values().filter(|bt| bt.uses_nuget()) {
            for build in build_type.builds.values().filter(|b| b.uses_nuget()) {
                edges_for_build(build_type, build, &index, &mut edges);
            }
        }
    }

    trace!(edges = edges.len(), "Derived dependency edges");
    edges
}

fn edges_for_build(
    build_type: &BuildType,
    build: &Build,
    index: &BTreeMap<&str, &Package>,
    edges: &mut Vec<Edge>,
) {
    if !build.created_packages.is_empty() {
        // The build publishes: draw each created package's own edges and
        // leave the configuration node out of it entirely.
        for package in build.created_packages.values() {
            let mut seen = HashSet::new();
            for dependency in &package.dependencies {
                if seen.insert(dependency.id.as_str()) {
                    edges.push(Edge::new(&package.version_id.id, &dependency.id));
                }
            }
        }
    } else {
        // Consumer-only: draw configuration-to-package edges, but elide
        // any dependency already reachable through another dependency one
        // hop away. A dependency id never created by a crawled build has
        // no known dependencies of its own and elides nothing.
        let indirect: BTreeSet<&str> = build
            .dependencies
            .values()
            .filter_map(|package| index.get(package.version_id.id.as_str()))
            .flat_map(|package| package.dependencies.iter().map(|d| d.id.as_str()))
            .collect();

        let mut seen = HashSet::new();
        for dependency in build.dependencies.keys() {
            if seen.insert(dependency.id.as_str()) && !indirect.contains(dependency.id.as_str()) {
                edges.push(Edge::new(&build_type.id, &dependency.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("graph.test.rs");
}
