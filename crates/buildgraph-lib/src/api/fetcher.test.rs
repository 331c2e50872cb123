use super::*;
use crate::networking::NetworkingConfig;
use mockito::Server;

async fn live_fetcher(server: &Server) -> LiveDocumentFetcher {
    let networking = NetworkingManager::new(NetworkingConfig {
        base_url: server.url(),
        ..Default::default()
    })
    .unwrap();
    LiveDocumentFetcher::new(Arc::new(networking))
}

#[tokio::test]
async fn test_live_fetch_parses_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/app/rest/projects")
        .with_status(200)
        .with_body(r#"<projects count="1"><project id="P1"/></projects>"#)
        .create_async()
        .await;

    let fetcher = live_fetcher(&server).await;
    let url = fetcher.base_url().join("/app/rest/projects").unwrap();
    let doc = fetcher.fetch(&url).await.unwrap();

    assert_eq!(doc.root().name(), "projects");
    assert_eq!(doc.root().children("project").count(), 1);
}

#[tokio::test]
async fn test_live_fetch_propagates_http_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/app/rest/projects")
        .with_status(500)
        .create_async()
        .await;

    let fetcher = live_fetcher(&server).await;
    let url = fetcher.base_url().join("/app/rest/projects").unwrap();

    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_live_fetch_rejects_malformed_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/doc")
        .with_status(200)
        .with_body("<projects><project>")
        .create_async()
        .await;

    let fetcher = live_fetcher(&server).await;
    let url = fetcher.base_url().join("/doc").unwrap();

    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Document { .. })
    ));
}

#[tokio::test]
async fn test_live_fetch_or_empty_substitutes_sentinel_on_404() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repository/download/Bt1/42:id/.teamcity/nuget/nuget.xml")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = live_fetcher(&server).await;
    let url = fetcher
        .base_url()
        .join("/repository/download/Bt1/42:id/.teamcity/nuget/nuget.xml")
        .unwrap();
    let doc = fetcher.fetch_or_empty(&url).await.unwrap();

    assert_eq!(doc.root().name(), "nuget-dependencies");
    assert_eq!(
        doc.root().child("packages").unwrap().children("package").count(),
        0
    );
}

#[tokio::test]
async fn test_live_fetch_or_empty_parses_success_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/manifest")
        .with_status(200)
        .with_body(
            r#"<nuget-dependencies>
                 <packages><package id="Acme.Core" version="1.0.0"/></packages>
                 <created/>
                 <published/>
               </nuget-dependencies>"#,
        )
        .create_async()
        .await;

    let fetcher = live_fetcher(&server).await;
    let url = fetcher.base_url().join("/manifest").unwrap();
    let doc = fetcher.fetch_or_empty(&url).await.unwrap();

    assert_eq!(
        doc.root().child("packages").unwrap().children("package").count(),
        1
    );
}

#[tokio::test]
async fn test_mock_fetcher_counts_requests() {
    let fetcher = MockDocumentFetcher::new("http://teamcity/")
        .with_document("http://teamcity/doc", "<doc/>")
        .await;
    let url = Url::parse("http://teamcity/doc").unwrap();

    fetcher.fetch(&url).await.unwrap();
    fetcher.fetch(&url).await.unwrap();

    assert_eq!(fetcher.request_count("http://teamcity/doc").await, 2);
}

#[tokio::test]
async fn test_mock_fetcher_unknown_url_fails_fetch_but_not_fetch_or_empty() {
    let fetcher = MockDocumentFetcher::new("http://teamcity/");
    let url = Url::parse("http://teamcity/missing").unwrap();

    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Status { status: 404, .. })
    ));
    let doc = fetcher.fetch_or_empty(&url).await.unwrap();
    assert_eq!(doc.root().name(), "nuget-dependencies");
}
