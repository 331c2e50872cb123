//! End-to-end: `buildgraph graph` against a mock server

use assert_cmd::Command;
use buildgraph_tests::SmallServer;

fn run_graph(server_url: &str, extra_args: &[&str]) -> assert_cmd::assert::Assert {
    let server_arg = format!("{}/app/rest/server", server_url);
    Command::cargo_bin("buildgraph")
        .unwrap()
        .args(["--server", server_arg.as_str(), "--package-prefix", "Acme."])
        .arg("graph")
        .args(extra_args)
        .assert()
}

#[tokio::test(flavor = "multi_thread")]
async fn graph_emits_clusters_nodes_and_edges() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    let assert = run_graph(&server.url(), &[]).success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    // Publisher project renders as nested clusters with package nodes
    assert!(output.contains(r#"subgraph "cluster_project_P1""#));
    assert!(output.contains(r#"label = "Libraries";"#));
    assert!(output.contains(r#"subgraph "cluster_buildType_Bt1""#));
    assert!(output.contains(r#""Acme.Core";"#));
    assert!(output.contains(r#""Acme.Abstractions";"#));

    // Consumer configuration renders as a plain node
    assert!(output.contains(r#""Bt2" [label="Web App", color=2];"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn graph_elides_indirect_dependency_edges() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    let assert = run_graph(&server.url(), &[]).success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    // Package-to-package edge from the publisher
    assert!(output.contains(r#""Acme.Core" -> "Acme.Abstractions";"#));
    // Direct consumer edge survives...
    assert!(output.contains(r#""Bt2" -> "Acme.Core";"#));
    // ...but the edge already implied one hop away does not
    assert!(!output.contains(r#""Bt2" -> "Acme.Abstractions";"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn project_without_package_activity_is_invisible() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    let assert = run_graph(&server.url(), &[]).success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    // P3's manifest 404s, so nothing of it may appear
    assert!(!output.contains("P3"));
    assert!(!output.contains("Legacy"));
}

#[tokio::test(flavor = "multi_thread")]
async fn graph_writes_dot_file_when_output_given() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.dot");

    run_graph(&server.url(), &["--output", path.to_str().unwrap()]).success();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("digraph builds {"));
    assert!(written.contains(r#""Bt2" -> "Acme.Core";"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn graph_fails_without_server_configuration() {
    Command::cargo_bin("buildgraph")
        .unwrap()
        .env_remove("BUILDGRAPH_SERVER")
        .arg("graph")
        .assert()
        .failure();
}
