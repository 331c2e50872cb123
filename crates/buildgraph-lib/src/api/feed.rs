//! Per-package dependency resolution against the NuGet feed
//!
//! Each package observed in a manifest gets one feed lookup resolving its
//! declared dependency list. A package whose entry cannot be fetched or
//! parsed is treated as having no known dependencies, never as a
//! crawl-aborting error.

use super::document::DocumentError;
use super::fetcher::{DocumentFetcher, FetchError};
use crate::primitives::{PackageFilter, PackageIdError, PackageVersionId};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Url;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Feed lookup errors. These never leave the resolver; they only feed the
/// warn log before the result collapses to an empty dependency set.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Fetch failed: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },

    #[error("Feed entry malformed: {source}")]
    Entry {
        #[from]
        source: DocumentError,
    },

    #[error("Dependency string malformed: {source}")]
    Dependency {
        #[from]
        source: PackageIdError,
    },

    #[error("Feed URL construction failed: {reason}")]
    Url { reason: String },
}

/// Characters escaped inside the feed entry URL's quoted key values
const FEED_KEY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'\'')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'{')
    .add(b'}');

/// Resolves one package's declared dependencies from the server's feed
pub struct FeedResolver<F> {
    fetcher: Arc<F>,
    filter: PackageFilter,
}

impl<F: DocumentFetcher> FeedResolver<F> {
    pub fn new(fetcher: Arc<F>, filter: PackageFilter) -> Self {
        Self { fetcher, filter }
    }

    /// Resolve the dependency list for `id`.
    ///
    /// Any failure along the way (network, missing feed entry, malformed
    /// metadata) is logged and replaced with an empty list.
    pub async fn resolve_dependencies(&self, id: &PackageVersionId) -> Vec<PackageVersionId> {
        match self.try_resolve(id).await {
            Ok(dependencies) => dependencies,
            Err(error) => {
                warn!(package = %id, %error, "Failed to resolve package dependencies");
                Vec::new()
            }
        }
    }

    async fn try_resolve(&self, id: &PackageVersionId) -> Result<Vec<PackageVersionId>, FeedError> {
        let url = self.feed_entry_url(id)?;
        let doc = self.fetcher.fetch(&url).await?;
        let dependencies = doc.navigate(&["properties", "Dependencies"])?.text();
        parse_dependency_list(dependencies, &self.filter)
    }

    /// OData feed entry URL for one package version, rooted at the server
    /// origin (the feed lives outside the REST API's path)
    fn feed_entry_url(&self, id: &PackageVersionId) -> Result<Url, FeedError> {
        let path = format!(
            "/guestAuth/app/nuget/v1/FeedService.svc/Packages(Id='{}',Version='{}')",
            utf8_percent_encode(&id.id, FEED_KEY),
            utf8_percent_encode(&id.version, FEED_KEY),
        );
        self.fetcher
            .base_url()
            .join(&path)
            .map_err(|e| FeedError::Url {
                reason: e.to_string(),
            })
    }
}

/// Parse the feed's `|`-delimited dependency string.
///
/// Empty segments are dropped (the string routinely ends in a trailing
/// delimiter); every surviving entry must parse as `id:version[:...]`.
/// The package filter applies to each parsed identity.
fn parse_dependency_list(
    raw: &str,
    filter: &PackageFilter,
) -> Result<Vec<PackageVersionId>, FeedError> {
    raw.split('|')
        .filter(|segment| !segment.is_empty())
        .map(PackageVersionId::from_feed_entry)
        .filter(|parsed| match parsed {
            Ok(id) => filter.accepts(id),
            Err(_) => true,
        })
        .map(|parsed| parsed.map_err(FeedError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    include!("feed.test.rs");
}
