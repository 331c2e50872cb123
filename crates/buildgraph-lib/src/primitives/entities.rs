//! Domain entities for the crawled build graph
//!
//! The crawler materializes the server's hierarchy into these types:
//! Project -> BuildType -> Build -> Package. All of them are built once by
//! the crawler and never mutated afterwards. Child collections are
//! `BTreeMap`s keyed by stable identity, so iteration order is
//! deterministic no matter in which order the concurrent fetches landed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors parsing package identities out of feed metadata
#[derive(Debug, Error)]
pub enum PackageIdError {
    #[error("Malformed feed dependency entry: '{entry}'")]
    MalformedEntry { entry: String },
}

/// Value identity of one package at one version.
///
/// Equality, hashing and ordering are structural over both fields. Every
/// dedup in the graph builder keys on this type (or on its `id` alone), so
/// two instances with equal fields must be interchangeable regardless of
/// whether they were parsed from a manifest element or a feed dependency
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageVersionId {
    pub id: String,
    pub version: String,
}

impl PackageVersionId {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Parse one entry of the feed's `|`-delimited dependency string.
    ///
    /// Entries have the form `id:version[:targetFramework]`; only the first
    /// two fields matter. Fewer than two fields is malformed.
    pub fn from_feed_entry(entry: &str) -> Result<Self, PackageIdError> {
        let mut fields = entry.split(':');
        let id = fields.next().filter(|s| !s.is_empty());
        let version = fields.next().filter(|s| !s.is_empty());
        match (id, version) {
            (Some(id), Some(version)) => Ok(Self::new(id, version)),
            _ => Err(PackageIdError::MalformedEntry {
                entry: entry.to_string(),
            }),
        }
    }
}

impl fmt::Display for PackageVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// One package observed in a build's manifest, with its resolved
/// dependency list.
///
/// `dependencies` is fetched exactly once by the feed resolver and stored
/// materialized; the graph builder iterates it more than once and must
/// never re-trigger the fetch.
#[derive(Debug, Clone)]
pub struct Package {
    pub version_id: PackageVersionId,
    pub dependencies: Vec<PackageVersionId>,
}

impl Package {
    pub fn new(version_id: PackageVersionId, dependencies: Vec<PackageVersionId>) -> Self {
        Self {
            version_id,
            dependencies,
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.version_id.fmt(f)
    }
}

/// The single most recent successful build of a build configuration,
/// with the packages it consumed and produced.
#[derive(Debug, Clone)]
pub struct Build {
    pub id: String,
    pub number: String,
    pub created_packages: BTreeMap<PackageVersionId, Package>,
    pub dependencies: BTreeMap<PackageVersionId, Package>,
}

impl Build {
    pub fn new(
        id: impl Into<String>,
        number: impl Into<String>,
        created_packages: BTreeMap<PackageVersionId, Package>,
        dependencies: BTreeMap<PackageVersionId, Package>,
    ) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            created_packages,
            dependencies,
        }
    }

    /// Whether this build touched any packages at all, producing or consuming
    pub fn uses_nuget(&self) -> bool {
        !self.created_packages.is_empty() || !self.dependencies.is_empty()
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "build {} #{}", self.id, self.number)
    }
}

/// A build configuration within a project.
///
/// `builds` holds at most one entry: the most recent successful build, or
/// nothing if the configuration has never built successfully.
#[derive(Debug, Clone)]
pub struct BuildType {
    pub id: String,
    pub name: String,
    pub builds: BTreeMap<String, Build>,
}

impl BuildType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        builds: BTreeMap<String, Build>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            builds,
        }
    }

    pub fn uses_nuget(&self) -> bool {
        self.builds.values().any(Build::uses_nuget)
    }

    pub fn publishes_packages(&self) -> bool {
        self.builds
            .values()
            .any(|build| !build.created_packages.is_empty())
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A project grouping build configurations
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub build_types: BTreeMap<String, BuildType>,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        build_types: BTreeMap<String, BuildType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            build_types,
        }
    }

    pub fn uses_nuget(&self) -> bool {
        self.build_types.values().any(BuildType::uses_nuget)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Predicate over package identities, applied wherever a package identity
/// is first observed (manifest entries and parsed feed dependencies alike).
///
/// Cloneable and shareable across the concurrent crawl.
#[derive(Clone)]
pub struct PackageFilter(Arc<dyn Fn(&PackageVersionId) -> bool + Send + Sync>);

impl PackageFilter {
    /// Filter that accepts every package
    pub fn accept_all() -> Self {
        Self(Arc::new(|_| true))
    }

    /// Filter accepting packages whose id starts with `prefix`.
    /// An empty prefix accepts everything.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self(Arc::new(move |id| id.id.starts_with(&prefix)))
    }

    /// Filter from an arbitrary predicate
    pub fn from_fn(f: impl Fn(&PackageVersionId) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn accepts(&self, id: &PackageVersionId) -> bool {
        (self.0)(id)
    }
}

impl fmt::Debug for PackageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PackageFilter(..)")
    }
}
