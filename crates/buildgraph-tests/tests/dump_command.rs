//! End-to-end: `buildgraph dump` against a mock server

use assert_cmd::Command;
use buildgraph_tests::SmallServer;
use predicates::prelude::*;

#[tokio::test(flavor = "multi_thread")]
async fn dump_prints_resolved_hierarchy() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    let server_arg = format!("{}/app/rest/server", server.url());
    Command::cargo_bin("buildgraph")
        .unwrap()
        .args(["--server", server_arg.as_str(), "--package-prefix", "Acme."])
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("Libraries (P1)"))
        .stdout(predicate::str::contains("Core Build (Bt1)"))
        .stdout(predicate::str::contains("build 42 #1.0.42"))
        .stdout(predicate::str::contains("creates Acme.Core 1.2.0"))
        .stdout(predicate::str::contains("consumes Acme.Abstractions 1.0.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn dump_lists_projects_without_package_activity() {
    let mut server = mockito::Server::new_async().await;
    SmallServer::mount(&mut server).await;

    // The dump is a diagnostic view: unlike the graph, it shows every
    // crawled project, including ones without package activity.
    let server_arg = format!("{}/app/rest/server", server.url());
    Command::cargo_bin("buildgraph")
        .unwrap()
        .args(["--server", server_arg.as_str()])
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("Legacy (P3)"))
        .stdout(predicate::str::contains("build 73 #0.9.73"));
}
