use super::*;
use crate::api::fetcher::MockDocumentFetcher;

const BASE: &str = "http://teamcity/app/rest/server";

fn feed_url(id: &str, version: &str) -> String {
    format!(
        "http://teamcity/guestAuth/app/nuget/v1/FeedService.svc/Packages(Id='{}',Version='{}')",
        id, version
    )
}

fn manifest_url(build_type_id: &str, build_id: &str) -> String {
    format!(
        "http://teamcity/repository/download/{}/{}:id/.teamcity/nuget/nuget.xml",
        build_type_id, build_id
    )
}

fn feed_entry(dependencies: &str) -> String {
    format!(
        r#"<entry xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata"
                  xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices">
             <m:properties><d:Dependencies>{}</d:Dependencies></m:properties>
           </entry>"#,
        dependencies
    )
}

/// Mock server skeleton: root document, project list, and per-project
/// documents wired the way the live server links them.
async fn fetcher_with_projects(projects: &[(&str, &str, &str)]) -> MockDocumentFetcher {
    let refs: String = projects
        .iter()
        .map(|(id, name, _)| {
            format!(
                r#"<project id="{id}" name="{name}" href="/app/rest/projects/id:{id}"/>"#,
                id = id,
                name = name
            )
        })
        .collect();

    let mut fetcher = MockDocumentFetcher::new(BASE)
        .with_document(BASE, r#"<server><projects href="/app/rest/projects"/></server>"#)
        .await
        .with_document(
            "http://teamcity/app/rest/projects",
            &format!("<projects>{}</projects>", refs),
        )
        .await;

    for (id, _, body) in projects {
        fetcher = fetcher
            .with_document(&format!("http://teamcity/app/rest/projects/id:{}", id), body)
            .await;
    }
    fetcher
}

fn project_doc(build_type_refs: &str) -> String {
    format!("<project><buildTypes>{}</buildTypes></project>", build_type_refs)
}

fn build_type_ref(id: &str, name: &str) -> String {
    format!(
        r#"<buildType id="{id}" name="{name}" href="/app/rest/buildTypes/id:{id}"/>"#,
        id = id,
        name = name
    )
}

/// Wire one build type's document, its SUCCESS-filtered build list, and
/// (optionally) the latest build's manifest.
async fn with_build_type(
    fetcher: MockDocumentFetcher,
    id: &str,
    build: Option<(&str, &str, &str)>,
) -> MockDocumentFetcher {
    let fetcher = fetcher
        .with_document(
            &format!("http://teamcity/app/rest/buildTypes/id:{}", id),
            &format!(
                r#"<buildType id="{id}"><builds href="/app/rest/buildTypes/id:{id}/builds/"/></buildType>"#,
                id = id
            ),
        )
        .await;

    match build {
        Some((build_id, number, manifest)) => {
            let fetcher = fetcher
                .with_document(
                    &format!(
                        "http://teamcity/app/rest/buildTypes/id:{}/builds/?status=SUCCESS",
                        id
                    ),
                    &format!(
                        r#"<builds><build id="{build_id}" number="{number}" buildTypeId="{id}" href="/app/rest/builds/id:{build_id}"/></builds>"#,
                        build_id = build_id,
                        number = number,
                        id = id
                    ),
                )
                .await;
            fetcher
                .with_document(&manifest_url(id, build_id), manifest)
                .await
        }
        None => {
            fetcher
                .with_document(
                    &format!(
                        "http://teamcity/app/rest/buildTypes/id:{}/builds/?status=SUCCESS",
                        id
                    ),
                    r#"<builds count="0"/>"#,
                )
                .await
        }
    }
}

fn crawler(fetcher: &Arc<MockDocumentFetcher>) -> Crawler<MockDocumentFetcher> {
    Crawler::new(fetcher.clone(), PackageFilter::accept_all())
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_crawl_assembles_publisher_and_consumer() {
    let fetcher = fetcher_with_projects(&[
        ("P1", "Alpha", &project_doc(&build_type_ref("Bt1", "Alpha Build"))),
        ("P2", "Beta", &project_doc(&build_type_ref("Bt2", "Beta Build"))),
    ])
    .await;
    let fetcher = with_build_type(
        fetcher,
        "Bt1",
        Some((
            "42",
            "1.0.42",
            r#"<nuget-dependencies>
                 <packages/>
                 <created><package id="Acme.Core" version="1.0.0"/></created>
                 <published/>
               </nuget-dependencies>"#,
        )),
    )
    .await;
    let fetcher = with_build_type(
        fetcher,
        "Bt2",
        Some((
            "57",
            "2.3.57",
            r#"<nuget-dependencies>
                 <packages><package id="Acme.Core" version="1.0.0"/></packages>
                 <created/>
                 <published/>
               </nuget-dependencies>"#,
        )),
    )
    .await;
    let fetcher = fetcher
        .with_document(
            &feed_url("Acme.Core", "1.0.0"),
            &feed_entry("Acme.Util:0.9.0|"),
        )
        .await;

    let fetcher = Arc::new(fetcher);
    let projects = crawler(&fetcher).crawl().await.unwrap();

    assert_eq!(projects.len(), 2);

    let alpha = &projects[0];
    assert_eq!(alpha.id, "P1");
    assert_eq!(alpha.name, "Alpha");
    assert!(alpha.uses_nuget());

    let bt1 = &alpha.build_types["Bt1"];
    assert_eq!(bt1.name, "Alpha Build");
    assert!(bt1.publishes_packages());
    let build = &bt1.builds["42"];
    assert_eq!(build.number, "1.0.42");
    let created = &build.created_packages[&PackageVersionId::new("Acme.Core", "1.0.0")];
    assert_eq!(
        created.dependencies,
        vec![PackageVersionId::new("Acme.Util", "0.9.0")]
    );

    let beta = &projects[1];
    let bt2 = &beta.build_types["Bt2"];
    assert!(bt2.uses_nuget());
    assert!(!bt2.publishes_packages());
    assert!(
        bt2.builds["57"]
            .dependencies
            .contains_key(&PackageVersionId::new("Acme.Core", "1.0.0"))
    );
}

#[tokio::test]
async fn test_build_type_without_successful_build_has_empty_builds() {
    let fetcher = fetcher_with_projects(&[(
        "P1",
        "Alpha",
        &project_doc(&build_type_ref("Bt1", "Never Green")),
    )])
    .await;
    let fetcher = Arc::new(with_build_type(fetcher, "Bt1", None).await);

    let projects = crawler(&fetcher).crawl().await.unwrap();

    let bt = &projects[0].build_types["Bt1"];
    assert!(bt.builds.is_empty());
    assert!(!bt.uses_nuget());
}

#[tokio::test]
async fn test_unreachable_manifest_yields_no_package_usage() {
    let fetcher = fetcher_with_projects(&[(
        "P1",
        "Alpha",
        &project_doc(&build_type_ref("Bt1", "Plain Build")),
    )])
    .await;
    // Build exists, but no manifest mapping: fetch_or_empty sees a 404
    let fetcher = with_build_type(fetcher, "Bt1", Some(("42", "1.0.42", "ignored"))).await;
    let fetcher = fetcher
        .with_failure(&manifest_url("Bt1", "42"), "404")
        .await;

    let fetcher = Arc::new(fetcher);
    let projects = crawler(&fetcher).crawl().await.unwrap();

    let build = &projects[0].build_types["Bt1"].builds["42"];
    assert!(!build.uses_nuget());
    assert!(build.created_packages.is_empty());
    assert!(build.dependencies.is_empty());
    assert!(!projects[0].uses_nuget());
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_failed_project_subtree_does_not_abort_siblings() {
    let fetcher = fetcher_with_projects(&[(
        "P1",
        "Alpha",
        &project_doc(&build_type_ref("Bt1", "Alpha Build")),
    )])
    .await;
    let fetcher = with_build_type(fetcher, "Bt1", None).await;

    // P2 is listed but its document cannot be fetched
    let fetcher = fetcher
        .with_document(
            "http://teamcity/app/rest/projects",
            r#"<projects>
                 <project id="P1" name="Alpha" href="/app/rest/projects/id:P1"/>
                 <project id="P2" name="Beta" href="/app/rest/projects/id:P2"/>
               </projects>"#,
        )
        .await
        .with_failure("http://teamcity/app/rest/projects/id:P2", "boom")
        .await;

    let fetcher = Arc::new(fetcher);
    let projects = crawler(&fetcher).crawl().await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "P1");
}

#[tokio::test]
async fn test_failed_build_type_subtree_does_not_abort_siblings() {
    let refs = format!(
        "{}{}",
        build_type_ref("Bt1", "Broken"),
        build_type_ref("Bt2", "Fine")
    );
    let fetcher = fetcher_with_projects(&[("P1", "Alpha", &project_doc(&refs))]).await;
    let fetcher = fetcher
        .with_failure("http://teamcity/app/rest/buildTypes/id:Bt1", "boom")
        .await;
    let fetcher = Arc::new(with_build_type(fetcher, "Bt2", None).await);

    let projects = crawler(&fetcher).crawl().await.unwrap();

    let project = &projects[0];
    assert_eq!(project.build_types.len(), 1);
    assert!(project.build_types.contains_key("Bt2"));
}

#[tokio::test]
async fn test_single_feed_failure_leaves_sibling_packages_intact() {
    let fetcher = fetcher_with_projects(&[(
        "P1",
        "Alpha",
        &project_doc(&build_type_ref("Bt1", "Alpha Build")),
    )])
    .await;
    let fetcher = with_build_type(
        fetcher,
        "Bt1",
        Some((
            "42",
            "1.0.42",
            r#"<nuget-dependencies>
                 <packages>
                   <package id="Good.Pkg" version="1.0.0"/>
                   <package id="Bad.Pkg" version="1.0.0"/>
                 </packages>
                 <created/>
                 <published/>
               </nuget-dependencies>"#,
        )),
    )
    .await;
    let fetcher = fetcher
        .with_document(&feed_url("Good.Pkg", "1.0.0"), &feed_entry("Dep.One:1.0|"))
        .await
        .with_failure(&feed_url("Bad.Pkg", "1.0.0"), "connection reset")
        .await;

    let fetcher = Arc::new(fetcher);
    let projects = crawler(&fetcher).crawl().await.unwrap();

    let build = &projects[0].build_types["Bt1"].builds["42"];
    assert_eq!(build.dependencies.len(), 2);
    assert_eq!(
        build.dependencies[&PackageVersionId::new("Good.Pkg", "1.0.0")].dependencies,
        vec![PackageVersionId::new("Dep.One", "1.0")]
    );
    assert!(
        build.dependencies[&PackageVersionId::new("Bad.Pkg", "1.0.0")]
            .dependencies
            .is_empty()
    );
}

#[tokio::test]
async fn test_root_fetch_failure_aborts_the_crawl() {
    let fetcher = Arc::new(MockDocumentFetcher::new(BASE));
    assert!(crawler(&fetcher).crawl().await.is_err());
}

// ============================================================================
// Filtering and caching
// ============================================================================

#[tokio::test]
async fn test_reject_all_filter_yields_no_package_usage_and_no_feed_fetches() {
    let fetcher = fetcher_with_projects(&[(
        "P1",
        "Alpha",
        &project_doc(&build_type_ref("Bt1", "Alpha Build")),
    )])
    .await;
    let fetcher = with_build_type(
        fetcher,
        "Bt1",
        Some((
            "42",
            "1.0.42",
            r#"<nuget-dependencies>
                 <packages><package id="Acme.Core" version="1.0.0"/></packages>
                 <created><package id="Acme.Web" version="2.0.0"/></created>
                 <published/>
               </nuget-dependencies>"#,
        )),
    )
    .await;

    let fetcher = Arc::new(fetcher);
    let crawler = Crawler::new(fetcher.clone(), PackageFilter::from_fn(|_| false));
    let projects = crawler.crawl().await.unwrap();

    assert!(!projects[0].uses_nuget());
    assert_eq!(
        fetcher.request_count(&feed_url("Acme.Core", "1.0.0")).await,
        0
    );
    assert_eq!(
        fetcher.request_count(&feed_url("Acme.Web", "2.0.0")).await,
        0
    );
}

#[tokio::test]
async fn test_dependencies_are_fetched_once_and_materialized() {
    let fetcher = fetcher_with_projects(&[(
        "P1",
        "Alpha",
        &project_doc(&build_type_ref("Bt1", "Alpha Build")),
    )])
    .await;
    let fetcher = with_build_type(
        fetcher,
        "Bt1",
        Some((
            "42",
            "1.0.42",
            r#"<nuget-dependencies>
                 <packages/>
                 <created><package id="Acme.Core" version="1.0.0"/></created>
                 <published/>
               </nuget-dependencies>"#,
        )),
    )
    .await;
    let fetcher = fetcher
        .with_document(
            &feed_url("Acme.Core", "1.0.0"),
            &feed_entry("Acme.Util:0.9.0|"),
        )
        .await;

    let fetcher = Arc::new(fetcher);
    let projects = crawler(&fetcher).crawl().await.unwrap();

    // Reading the dependency list repeatedly must not re-trigger the fetch
    let package =
        &projects[0].build_types["Bt1"].builds["42"].created_packages
            [&PackageVersionId::new("Acme.Core", "1.0.0")];
    for _ in 0..3 {
        assert_eq!(package.dependencies.len(), 1);
    }
    assert_eq!(
        fetcher.request_count(&feed_url("Acme.Core", "1.0.0")).await,
        1
    );
}
