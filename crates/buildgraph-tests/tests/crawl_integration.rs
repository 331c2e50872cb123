//! Library-level crawl against the mock server: assembled entities and
//! derived edges, without going through the binary.

use buildgraph_lib::api::{Crawler, LiveDocumentFetcher, build_edges};
use buildgraph_lib::networking::{NetworkingConfig, NetworkingManager};
use buildgraph_lib::primitives::{PackageFilter, PackageVersionId};
use buildgraph_tests::SmallServer;
use std::sync::Arc;

#[tokio::test]
async fn crawl_assembles_entities_and_derives_edges() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    let networking = NetworkingManager::new(NetworkingConfig {
        base_url: format!("{}/app/rest/server", server.url()),
        username: None,
        password: None,
        timeout_seconds: 30,
    })
    .unwrap();
    let fetcher = Arc::new(LiveDocumentFetcher::new(Arc::new(networking)));
    let crawler = Crawler::new(fetcher, PackageFilter::prefix("Acme."));

    let projects = crawler.crawl().await.unwrap();
    assert_eq!(projects.len(), 3);

    let libraries = &projects[0];
    assert!(libraries.uses_nuget());
    let core_build = &libraries.build_types["Bt1"].builds["42"];
    assert_eq!(core_build.created_packages.len(), 2);
    assert_eq!(
        core_build.created_packages[&PackageVersionId::new("Acme.Core", "1.2.0")].dependencies,
        vec![PackageVersionId::new("Acme.Abstractions", "1.0.0")]
    );

    let legacy = &projects[2];
    assert!(!legacy.uses_nuget());

    let edges = build_edges(&projects);
    assert_eq!(edges.len(), 2);
    assert!(
        edges
            .iter()
            .any(|e| e.source == "Acme.Core" && e.target == "Acme.Abstractions")
    );
    assert!(
        edges
            .iter()
            .any(|e| e.source == "Bt2" && e.target == "Acme.Core")
    );
}
