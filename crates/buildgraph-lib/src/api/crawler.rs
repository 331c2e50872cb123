//! Concurrent assembly of the server's project hierarchy
//!
//! Recursive descent from the server root: projects, their build
//! configurations, each configuration's most recent successful build, that
//! build's package manifest, and one feed lookup per package. Every
//! fan-out point starts all child fetches before awaiting any of them; a
//! parent entity is constructed only once all of its children resolved.
//!
//! Failure policy: a failed project / build-configuration subtree is
//! logged and omitted, siblings proceed unaffected. Only the root and
//! project-list fetches are fatal to the whole crawl. Package feed
//! failures never surface at all (see [`super::feed`]).

use super::document::{Document, DocumentError, Element, resolve_link};
use super::feed::FeedResolver;
use super::fetcher::{DocumentFetcher, FetchError};
use crate::primitives::{Build, BuildType, Package, PackageFilter, PackageVersionId, Project};
use futures::future::join_all;
use reqwest::Url;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Crawl errors. Which level of the descent one of these aborts is the
/// caller's concern: subtree assemblers bubble them to the fan-out above.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },

    #[error("Document contract violated: {source}")]
    Document {
        #[from]
        source: DocumentError,
    },

    #[error("Failed to build request URL '{url}': {reason}")]
    Url { url: String, reason: String },
}

/// Assembles the in-memory entity graph from the server's hypermedia API
pub struct Crawler<F> {
    fetcher: Arc<F>,
    resolver: FeedResolver<F>,
    filter: PackageFilter,
}

impl<F: DocumentFetcher + Send + Sync> Crawler<F> {
    pub fn new(fetcher: Arc<F>, filter: PackageFilter) -> Self {
        Self {
            resolver: FeedResolver::new(fetcher.clone(), filter.clone()),
            fetcher,
            filter,
        }
    }

    /// Crawl the whole hierarchy into resolved [`Project`]s.
    ///
    /// Projects whose subtree failed are omitted from the result; the
    /// failure is logged with the failing entity.
    pub async fn crawl(&self) -> Result<Vec<Project>, CrawlError> {
        let base = self.fetcher.base_url();
        let root = self.fetcher.fetch(base).await?;
        let projects_url = resolve_link(&root, base, &["projects"])?;
        let list = self.fetcher.fetch(&projects_url).await?;

        let references: Vec<&Element> = list.root().children("project").collect();
        debug!(count = references.len(), "Crawling projects");

        let results = join_all(
            references
                .iter()
                .map(|reference| self.assemble_project(reference)),
        )
        .await;

        let mut projects = Vec::new();
        for (reference, result) in references.iter().zip(results) {
            match result {
                Ok(project) => projects.push(project),
                Err(error) => warn!(
                    project = reference.attr("id").unwrap_or("?"),
                    %error,
                    "Skipping project subtree"
                ),
            }
        }
        Ok(projects)
    }

    async fn assemble_project(&self, reference: &Element) -> Result<Project, CrawlError> {
        let id = reference.require_attr("id")?;
        let name = reference.require_attr("name")?;
        let doc = self.fetcher.fetch(&reference.link(self.fetcher.base_url())?).await?;

        let container = doc.root().require_child("buildTypes")?;
        let references: Vec<&Element> = container.children("buildType").collect();

        let results = join_all(
            references
                .iter()
                .map(|reference| self.assemble_build_type(reference)),
        )
        .await;

        let mut build_types = BTreeMap::new();
        for (reference, result) in references.iter().zip(results) {
            match result {
                Ok(build_type) => {
                    build_types.insert(build_type.id.clone(), build_type);
                }
                Err(error) => warn!(
                    build_type = reference.attr("id").unwrap_or("?"),
                    %error,
                    "Skipping build configuration subtree"
                ),
            }
        }

        debug!(project = id, build_types = build_types.len(), "Assembled project");
        Ok(Project::new(id, name, build_types))
    }

    async fn assemble_build_type(&self, reference: &Element) -> Result<BuildType, CrawlError> {
        let base = self.fetcher.base_url();
        let id = reference.require_attr("id")?;
        let name = reference.require_attr("name")?;
        let doc = self.fetcher.fetch(&reference.link(base)?).await?;

        let mut builds_url = resolve_link(&doc, base, &["builds"])?;
        builds_url.set_query(Some("status=SUCCESS"));
        let builds_doc = self.fetcher.fetch(&builds_url).await?;

        // Only the first entry matters: the server lists builds newest
        // first, and the graph reflects the latest successful build.
        let mut builds = BTreeMap::new();
        if let Some(build_ref) = builds_doc.root().children("build").next() {
            let build = self.assemble_build(build_ref).await?;
            builds.insert(build.id.clone(), build);
        }

        Ok(BuildType::new(id, name, builds))
    }

    async fn assemble_build(&self, reference: &Element) -> Result<Build, CrawlError> {
        let build_type_id = reference.require_attr("buildTypeId")?;
        let id = reference.require_attr("id")?;
        let number = reference.require_attr("number")?;

        let manifest_url = self.manifest_url(build_type_id, id)?;
        let manifest = self.fetcher.fetch_or_empty(&manifest_url).await?;

        let (dependencies, created_packages) = tokio::join!(
            self.assemble_packages(&manifest, "packages"),
            self.assemble_packages(&manifest, "created"),
        );

        Ok(Build::new(id, number, created_packages?, dependencies?))
    }

    /// Read one manifest group, filter the identities, and resolve every
    /// surviving package's dependencies concurrently.
    async fn assemble_packages(
        &self,
        manifest: &Document,
        group: &str,
    ) -> Result<BTreeMap<PackageVersionId, Package>, CrawlError> {
        let ids = manifest
            .root()
            .require_child(group)?
            .children("package")
            .map(package_id_from_element)
            .collect::<Result<Vec<_>, _>>()?;

        let packages = join_all(
            ids.into_iter()
                .filter(|id| self.filter.accepts(id))
                .map(|id| async move {
                    let dependencies = self.resolver.resolve_dependencies(&id).await;
                    Package::new(id, dependencies)
                }),
        )
        .await;

        Ok(packages
            .into_iter()
            .map(|package| (package.version_id.clone(), package))
            .collect())
    }

    /// Per-build package manifest path, rooted at the server origin
    fn manifest_url(&self, build_type_id: &str, build_id: &str) -> Result<Url, CrawlError> {
        let path = format!(
            "/repository/download/{}/{}:id/.teamcity/nuget/nuget.xml",
            build_type_id, build_id
        );
        self.fetcher
            .base_url()
            .join(&path)
            .map_err(|e| CrawlError::Url {
                url: path,
                reason: e.to_string(),
            })
    }
}

fn package_id_from_element(element: &Element) -> Result<PackageVersionId, DocumentError> {
    Ok(PackageVersionId::new(
        element.require_attr("id")?,
        element.require_attr("version")?,
    ))
}

#[cfg(test)]
mod tests {
    include!("crawler.test.rs");
}
