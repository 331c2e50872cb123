use super::*;
use crate::primitives::{Build, BuildType, Package, PackageVersionId};
use std::collections::BTreeMap;

fn pkg(id: &str, version: &str) -> Package {
    Package::new(PackageVersionId::new(id, version), Vec::new())
}

fn publisher_project() -> Project {
    let package = pkg("Acme.Core", "1.0.0");
    let build = Build::new(
        "42",
        "1.0.42",
        [(package.version_id.clone(), package)].into(),
        BTreeMap::new(),
    );
    let build_type = BuildType::new("Bt1", "Core Build", [("42".to_string(), build)].into());
    Project::new("P1", "Alpha", [("Bt1".to_string(), build_type)].into())
}

fn consumer_project() -> Project {
    let package = pkg("Acme.Core", "1.0.0");
    let build = Build::new(
        "57",
        "2.0.57",
        BTreeMap::new(),
        [(package.version_id.clone(), package)].into(),
    );
    let build_type = BuildType::new("Bt2", "App Build", [("57".to_string(), build)].into());
    Project::new("P2", "Beta", [("Bt2".to_string(), build_type)].into())
}

fn render(projects: &[Project], edges: &[Edge]) -> String {
    let mut out = String::new();
    write_graph(&mut out, projects, edges).unwrap();
    out
}

#[test]
fn test_header_and_footer() {
    let out = render(&[], &[]);
    assert!(out.starts_with("digraph builds {colorscheme=brbg3;\n"));
    assert!(out.contains("  rankdir = LR;\n"));
    assert!(out.trim_end().ends_with('}'));
}

#[test]
fn test_publishing_build_type_becomes_package_cluster() {
    let out = render(&[publisher_project()], &[]);

    assert!(out.contains("subgraph \"cluster_project_P1\""));
    assert!(out.contains("label = \"Alpha\";"));
    assert!(out.contains("subgraph \"cluster_buildType_Bt1\""));
    assert!(out.contains("label = \"Core Build\"; color=2;"));
    assert!(out.contains("\"Acme.Core\";"));
    // Publishing configurations are clusters, not plain nodes
    assert!(!out.contains("\"Bt1\" [label="));
}

#[test]
fn test_consuming_build_type_becomes_plain_node() {
    let out = render(&[consumer_project()], &[]);

    assert!(out.contains("\"Bt2\" [label=\"App Build\", color=2];"));
    assert!(!out.contains("cluster_buildType_Bt2"));
}

#[test]
fn test_projects_without_package_usage_are_invisible() {
    let idle = Project::new("P3", "Idle", BTreeMap::new());
    let out = render(&[idle], &[]);

    assert!(!out.contains("P3"));
    assert!(!out.contains("Idle"));
}

#[test]
fn test_edges_are_appended() {
    let edges = vec![
        Edge {
            source: "Bt2".to_string(),
            target: "Acme.Core".to_string(),
        },
        Edge {
            source: "Acme.Core".to_string(),
            target: "Acme.Util".to_string(),
        },
    ];
    let out = render(&[], &edges);

    assert!(out.contains("  \"Bt2\" -> \"Acme.Core\";\n"));
    assert!(out.contains("  \"Acme.Core\" -> \"Acme.Util\";\n"));
}

#[test]
fn test_quotes_in_names_are_escaped() {
    let mut project = publisher_project();
    project.name = "Alpha \"stable\"".to_string();
    let out = render(&[project], &[]);

    assert!(out.contains(r#"label = "Alpha \"stable\"";"#));
}
