use super::*;
use crate::api::fetcher::MockDocumentFetcher;

const FEED_URL: &str =
    "http://teamcity/guestAuth/app/nuget/v1/FeedService.svc/Packages(Id='Acme.Web',Version='2.0.0')";

fn feed_entry(dependencies: &str) -> String {
    format!(
        r#"<entry xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata"
                  xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices">
             <m:properties>
               <d:Dependencies>{}</d:Dependencies>
             </m:properties>
           </entry>"#,
        dependencies
    )
}

async fn resolver_with_feed(dependencies: &str) -> FeedResolver<MockDocumentFetcher> {
    let fetcher = MockDocumentFetcher::new("http://teamcity/")
        .with_document(FEED_URL, &feed_entry(dependencies))
        .await;
    FeedResolver::new(Arc::new(fetcher), PackageFilter::accept_all())
}

fn acme_web() -> PackageVersionId {
    PackageVersionId::new("Acme.Web", "2.0.0")
}

// ============================================================================
// Dependency string parsing
// ============================================================================

#[test]
fn test_parse_dependency_list_drops_trailing_empty_segment() {
    let deps = parse_dependency_list("A:1.0|B:2.0|", &PackageFilter::accept_all()).unwrap();
    assert_eq!(
        deps,
        vec![
            PackageVersionId::new("A", "1.0"),
            PackageVersionId::new("B", "2.0"),
        ]
    );
}

#[test]
fn test_parse_dependency_list_empty_string_yields_nothing() {
    let deps = parse_dependency_list("", &PackageFilter::accept_all()).unwrap();
    assert!(deps.is_empty());
}

#[test]
fn test_parse_dependency_list_is_idempotent_over_wellformed_input() {
    let filter = PackageFilter::accept_all();
    let first = parse_dependency_list("A:1.0|B:2.0:net45", &filter).unwrap();
    let second = parse_dependency_list("A:1.0|B:2.0:net45", &filter).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parse_dependency_list_applies_filter() {
    let filter = PackageFilter::prefix("Acme.");
    let deps =
        parse_dependency_list("Acme.Core:1.0|Newtonsoft.Json:13.0.1|Acme.Util:2.1", &filter)
            .unwrap();
    assert_eq!(
        deps,
        vec![
            PackageVersionId::new("Acme.Core", "1.0"),
            PackageVersionId::new("Acme.Util", "2.1"),
        ]
    );
}

#[test]
fn test_parse_dependency_list_rejects_malformed_entry() {
    assert!(parse_dependency_list("A:1.0|garbage", &PackageFilter::accept_all()).is_err());
}

// ============================================================================
// Resolution against the feed
// ============================================================================

#[tokio::test]
async fn test_resolve_dependencies_from_feed_entry() {
    let resolver = resolver_with_feed("Acme.Core:1.0.0|Acme.Util:2.1.0:net45|").await;
    let deps = resolver.resolve_dependencies(&acme_web()).await;

    assert_eq!(
        deps,
        vec![
            PackageVersionId::new("Acme.Core", "1.0.0"),
            PackageVersionId::new("Acme.Util", "2.1.0"),
        ]
    );
}

#[tokio::test]
async fn test_resolve_dependencies_swallows_fetch_failure() {
    let fetcher = MockDocumentFetcher::new("http://teamcity/")
        .with_failure(FEED_URL, "connection reset")
        .await;
    let resolver = FeedResolver::new(Arc::new(fetcher), PackageFilter::accept_all());

    assert!(resolver.resolve_dependencies(&acme_web()).await.is_empty());
}

#[tokio::test]
async fn test_resolve_dependencies_swallows_missing_feed_entry() {
    let fetcher = MockDocumentFetcher::new("http://teamcity/");
    let resolver = FeedResolver::new(Arc::new(fetcher), PackageFilter::accept_all());

    assert!(resolver.resolve_dependencies(&acme_web()).await.is_empty());
}

#[tokio::test]
async fn test_resolve_dependencies_swallows_malformed_metadata() {
    // One bad entry poisons the whole feed answer; the package is treated
    // as having no known dependencies.
    let resolver = resolver_with_feed("Acme.Core:1.0.0|oops").await;
    assert!(resolver.resolve_dependencies(&acme_web()).await.is_empty());
}

#[tokio::test]
async fn test_resolve_dependencies_swallows_missing_properties_element() {
    let fetcher = MockDocumentFetcher::new("http://teamcity/")
        .with_document(FEED_URL, "<entry/>")
        .await;
    let resolver = FeedResolver::new(Arc::new(fetcher), PackageFilter::accept_all());

    assert!(resolver.resolve_dependencies(&acme_web()).await.is_empty());
}

#[tokio::test]
async fn test_feed_entry_url_shape() {
    let resolver = resolver_with_feed("").await;
    let url = resolver.feed_entry_url(&acme_web()).unwrap();
    assert_eq!(url.as_str(), FEED_URL);
}
