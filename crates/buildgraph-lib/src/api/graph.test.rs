use super::*;
use crate::primitives::PackageVersionId;

fn pkg(id: &str, version: &str, deps: &[(&str, &str)]) -> Package {
    Package::new(
        PackageVersionId::new(id, version),
        deps.iter()
            .map(|(i, v)| PackageVersionId::new(*i, *v))
            .collect(),
    )
}

fn build(id: &str, created: Vec<Package>, dependencies: Vec<Package>) -> Build {
    Build::new(
        id,
        format!("1.0.{}", id),
        created
            .into_iter()
            .map(|p| (p.version_id.clone(), p))
            .collect(),
        dependencies
            .into_iter()
            .map(|p| (p.version_id.clone(), p))
            .collect(),
    )
}

fn build_type(id: &str, build: Option<Build>) -> BuildType {
    BuildType::new(
        id,
        format!("{} name", id),
        build.into_iter().map(|b| (b.id.clone(), b)).collect(),
    )
}

fn project(id: &str, build_types: Vec<BuildType>) -> Project {
    Project::new(
        id,
        format!("{} name", id),
        build_types.into_iter().map(|bt| (bt.id.clone(), bt)).collect(),
    )
}

fn edge(source: &str, target: &str) -> Edge {
    Edge {
        source: source.to_string(),
        target: target.to_string(),
    }
}

// ============================================================================
// Global package index
// ============================================================================

#[test]
fn test_package_index_collapses_duplicate_ids_first_seen_wins() {
    // Two builds created the same package id at different versions
    let projects = vec![
        project(
            "P1",
            vec![build_type(
                "Bt1",
                Some(build("1", vec![pkg("Acme.Core", "1.0.0", &[])], vec![])),
            )],
        ),
        project(
            "P2",
            vec![build_type(
                "Bt2",
                Some(build("2", vec![pkg("Acme.Core", "2.0.0", &[])], vec![])),
            )],
        ),
    ];

    let index = package_index(&projects);
    assert_eq!(index.len(), 1);
    assert_eq!(index["Acme.Core"].version_id.version, "1.0.0");
}

#[test]
fn test_package_index_ignores_consumed_packages() {
    let projects = vec![project(
        "P1",
        vec![build_type(
            "Bt1",
            Some(build("1", vec![], vec![pkg("Acme.Core", "1.0.0", &[])])),
        )],
    )];

    assert!(package_index(&projects).is_empty());
}

// ============================================================================
// Publisher edges
// ============================================================================

#[test]
fn test_created_package_emits_package_to_package_edges_only() {
    // The build consumes R as well, but a publishing build never draws
    // configuration edges.
    let projects = vec![project(
        "P1",
        vec![build_type(
            "Bt1",
            Some(build(
                "1",
                vec![pkg("P", "1.0.0", &[("Q", "1.0.0")])],
                vec![pkg("R", "1.0.0", &[])],
            )),
        )],
    )];

    let edges = build_edges(&projects);
    assert_eq!(edges, vec![edge("P", "Q")]);
}

#[test]
fn test_created_package_dependency_ids_are_distinct() {
    // Same dependency id at two versions collapses to one edge
    let projects = vec![project(
        "P1",
        vec![build_type(
            "Bt1",
            Some(build(
                "1",
                vec![pkg("P", "1.0.0", &[("Q", "1.0.0"), ("Q", "2.0.0")])],
                vec![],
            )),
        )],
    )];

    let edges = build_edges(&projects);
    assert_eq!(edges, vec![edge("P", "Q")]);
}

// ============================================================================
// Consumer edges and one-hop elision
// ============================================================================

#[test]
fn test_indirect_dependency_is_elided_one_hop() {
    // X itself depends on Y, so the consumer's edge to Y is redundant
    let projects = vec![
        project(
            "P1",
            vec![build_type(
                "Pub",
                Some(build(
                    "1",
                    vec![
                        pkg("X", "1.0.0", &[("Y", "1.0.0")]),
                        pkg("Y", "1.0.0", &[]),
                    ],
                    vec![],
                )),
            )],
        ),
        project(
            "P2",
            vec![build_type(
                "Con",
                Some(build(
                    "2",
                    vec![],
                    vec![pkg("X", "1.0.0", &[]), pkg("Y", "1.0.0", &[])],
                )),
            )],
        ),
    ];

    let edges = build_edges(&projects);
    assert!(edges.contains(&edge("Con", "X")));
    assert!(!edges.contains(&edge("Con", "Y")));
}

#[test]
fn test_independent_dependencies_both_get_edges() {
    let projects = vec![
        project(
            "P1",
            vec![build_type(
                "Pub",
                Some(build(
                    "1",
                    vec![pkg("X", "1.0.0", &[]), pkg("Y", "1.0.0", &[])],
                    vec![],
                )),
            )],
        ),
        project(
            "P2",
            vec![build_type(
                "Con",
                Some(build(
                    "2",
                    vec![],
                    vec![pkg("X", "1.0.0", &[]), pkg("Y", "1.0.0", &[])],
                )),
            )],
        ),
    ];

    let edges = build_edges(&projects);
    assert!(edges.contains(&edge("Con", "X")));
    assert!(edges.contains(&edge("Con", "Y")));
}

#[test]
fn test_elision_is_one_hop_not_transitive() {
    // Chain X -> Y -> Z; the consumer depends on X, Y and Z. Y is elided
    // via X, Z is elided via Y. Z is NOT additionally reachable from X in
    // one hop, but Y's own dependency list already covers it.
    let projects = vec![
        project(
            "P1",
            vec![build_type(
                "Pub",
                Some(build(
                    "1",
                    vec![
                        pkg("X", "1.0.0", &[("Y", "1.0.0")]),
                        pkg("Y", "1.0.0", &[("Z", "1.0.0")]),
                        pkg("Z", "1.0.0", &[]),
                    ],
                    vec![],
                )),
            )],
        ),
        project(
            "P2",
            vec![build_type(
                "Con",
                Some(build(
                    "2",
                    vec![],
                    vec![
                        pkg("X", "1.0.0", &[]),
                        pkg("Y", "1.0.0", &[]),
                        pkg("Z", "1.0.0", &[]),
                    ],
                )),
            )],
        ),
    ];

    let edges = build_edges(&projects);
    assert!(edges.contains(&edge("Con", "X")));
    assert!(!edges.contains(&edge("Con", "Y")));
    assert!(!edges.contains(&edge("Con", "Z")));
}

#[test]
fn test_dependency_unknown_to_index_is_never_elided() {
    // Nothing ever created "External.Lib", so nothing can elide it
    let projects = vec![project(
        "P1",
        vec![build_type(
            "Con",
            Some(build("1", vec![], vec![pkg("External.Lib", "3.0.0", &[])])),
        )],
    )];

    let edges = build_edges(&projects);
    assert_eq!(edges, vec![edge("Con", "External.Lib")]);
}

// ============================================================================
// Emission gating
// ============================================================================

#[test]
fn test_entities_without_package_usage_contribute_nothing() {
    let projects = vec![project(
        "P1",
        vec![
            build_type("Idle", Some(build("1", vec![], vec![]))),
            build_type("Empty", None),
        ],
    )];

    assert!(build_edges(&projects).is_empty());
}

#[test]
fn test_no_projects_no_edges() {
    assert!(build_edges(&[]).is_empty());
}
