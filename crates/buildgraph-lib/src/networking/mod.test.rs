use super::*;
use mockito::Server;

#[test]
fn test_default_config() {
    let config = NetworkingConfig::default();
    assert_eq!(config.timeout_seconds, 30);
    assert!(config.username.is_none());
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let config = NetworkingConfig {
        base_url: "not a url".to_string(),
        ..Default::default()
    };

    assert!(matches!(
        NetworkingManager::new(config),
        Err(NetworkingError::InvalidBaseUrl { .. })
    ));
}

#[tokio::test]
async fn test_get_without_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/app/rest/server")
        .with_status(200)
        .with_body("<server/>")
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig {
        base_url: server.url(),
        ..Default::default()
    })
    .unwrap();

    let url = manager.base_url().join("/app/rest/server").unwrap();
    let response = manager.get(&url).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "<server/>");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_sends_basic_auth_when_configured() {
    let mut server = Server::new_async().await;
    // "bob:s3cret" base64-encoded
    let mock = server
        .mock("GET", "/app/rest/server")
        .match_header("authorization", "Basic Ym9iOnMzY3JldA==")
        .with_status(200)
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig {
        base_url: server.url(),
        username: Some("bob".to_string()),
        password: Some("s3cret".to_string()),
        ..Default::default()
    })
    .unwrap();

    let url = manager.base_url().join("/app/rest/server").unwrap();
    let response = manager.get(&url).await.unwrap();

    assert!(response.status().is_success());
    mock.assert_async().await;
}
