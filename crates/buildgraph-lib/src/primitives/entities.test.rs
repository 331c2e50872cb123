// Tests for domain entities and package identity semantics

use std::collections::{BTreeMap, HashSet};

fn pkg(id: &str, version: &str, deps: &[(&str, &str)]) -> Package {
    Package::new(
        PackageVersionId::new(id, version),
        deps.iter()
            .map(|(i, v)| PackageVersionId::new(*i, *v))
            .collect(),
    )
}

fn build_with(created: &[Package], deps: &[Package]) -> Build {
    Build::new(
        "42",
        "1.0.42",
        created
            .iter()
            .map(|p| (p.version_id.clone(), p.clone()))
            .collect(),
        deps.iter()
            .map(|p| (p.version_id.clone(), p.clone()))
            .collect(),
    )
}

// ============================================================================
// PackageVersionId value semantics
// ============================================================================

#[test]
fn test_equal_ids_compare_equal_regardless_of_construction_path() {
    let from_manifest = PackageVersionId::new("Acme.Core", "1.2.3");
    let from_feed = PackageVersionId::from_feed_entry("Acme.Core:1.2.3:net45").unwrap();

    assert_eq!(from_manifest, from_feed);

    let mut set = HashSet::new();
    set.insert(from_manifest);
    assert!(set.contains(&from_feed));
    set.insert(from_feed);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_differing_version_is_a_different_identity() {
    let a = PackageVersionId::new("Acme.Core", "1.0.0");
    let b = PackageVersionId::new("Acme.Core", "2.0.0");
    assert_ne!(a, b);
}

#[test]
fn test_from_feed_entry_ignores_target_framework() {
    let id = PackageVersionId::from_feed_entry("Acme.Web:3.1.0:portable-net45+win8").unwrap();
    assert_eq!(id.id, "Acme.Web");
    assert_eq!(id.version, "3.1.0");
}

#[test]
fn test_from_feed_entry_without_framework() {
    let id = PackageVersionId::from_feed_entry("Acme.Web:3.1.0").unwrap();
    assert_eq!(id, PackageVersionId::new("Acme.Web", "3.1.0"));
}

#[test]
fn test_from_feed_entry_rejects_missing_version() {
    assert!(PackageVersionId::from_feed_entry("Acme.Web").is_err());
    assert!(PackageVersionId::from_feed_entry("Acme.Web:").is_err());
    assert!(PackageVersionId::from_feed_entry("").is_err());
}

// ============================================================================
// Derived entity properties
// ============================================================================

#[test]
fn test_build_without_packages_does_not_use_nuget() {
    let build = build_with(&[], &[]);
    assert!(!build.uses_nuget());
}

#[test]
fn test_build_with_only_dependencies_uses_nuget() {
    let build = build_with(&[], &[pkg("Acme.Core", "1.0.0", &[])]);
    assert!(build.uses_nuget());
}

#[test]
fn test_build_with_created_packages_uses_nuget() {
    let build = build_with(&[pkg("Acme.Core", "1.0.0", &[])], &[]);
    assert!(build.uses_nuget());
}

#[test]
fn test_build_type_publishes_only_when_a_build_created_packages() {
    let consumer = BuildType::new(
        "Bt1",
        "Consumer",
        [(
            "42".to_string(),
            build_with(&[], &[pkg("Acme.Core", "1.0.0", &[])]),
        )]
        .into(),
    );
    assert!(consumer.uses_nuget());
    assert!(!consumer.publishes_packages());

    let publisher = BuildType::new(
        "Bt2",
        "Publisher",
        [(
            "43".to_string(),
            build_with(&[pkg("Acme.Core", "1.0.0", &[])], &[]),
        )]
        .into(),
    );
    assert!(publisher.publishes_packages());
}

#[test]
fn test_empty_build_type_and_project_do_not_use_nuget() {
    let bt = BuildType::new("Bt1", "Idle", BTreeMap::new());
    assert!(!bt.uses_nuget());

    let project = Project::new("P1", "Empty", [("Bt1".to_string(), bt)].into());
    assert!(!project.uses_nuget());
}

// ============================================================================
// PackageFilter
// ============================================================================

#[test]
fn test_prefix_filter() {
    let filter = PackageFilter::prefix("Acme.");
    assert!(filter.accepts(&PackageVersionId::new("Acme.Core", "1.0.0")));
    assert!(!filter.accepts(&PackageVersionId::new("Newtonsoft.Json", "13.0.1")));
}

#[test]
fn test_empty_prefix_accepts_everything() {
    let filter = PackageFilter::prefix("");
    assert!(filter.accepts(&PackageVersionId::new("Newtonsoft.Json", "13.0.1")));
}

#[test]
fn test_accept_all_filter() {
    let filter = PackageFilter::accept_all();
    assert!(filter.accepts(&PackageVersionId::new("anything", "0.0.0")));
}
