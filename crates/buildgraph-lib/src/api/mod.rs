//! # API Module
//!
//! Hypermedia traversal of the CI server and dependency resolution.
//!
//! ## Modules
//!
//! - [`document`] - XML document tree and link navigation
//! - [`fetcher`] - Document fetching (Live and Mock implementations)
//! - [`feed`] - Per-package dependency feed resolution
//! - [`crawler`] - Concurrent assembly of the entity graph
//! - [`graph`] - Dependency edge derivation with indirect-edge elision

pub mod crawler;
pub mod document;
pub mod feed;
pub mod fetcher;
pub mod graph;

pub use crawler::{CrawlError, Crawler};
pub use document::{Document, DocumentError, Element, resolve_link};
pub use feed::{FeedError, FeedResolver};
pub use fetcher::{DocumentFetcher, FetchError, LiveDocumentFetcher, MockDocumentFetcher};
pub use graph::{Edge, build_edges, package_index};
