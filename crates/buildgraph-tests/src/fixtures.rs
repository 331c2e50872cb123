//! Fixture documents for end-to-end tests
//!
//! A small TeamCity-shaped server with three projects:
//!
//! - `P1` "Libraries": `Bt1` publishes `Acme.Abstractions` (no dependencies)
//!   and `Acme.Core` (depends on `Acme.Abstractions`).
//! - `P2` "Apps": `Bt2` consumes both packages; the edge to
//!   `Acme.Abstractions` is expected to be elided because `Acme.Core`
//!   already depends on it.
//! - `P3` "Legacy": `Bt3` built successfully but has no package manifest
//!   (the server 404s), so it stays invisible in the graph.
//!
//! Tests mount these documents on a mockito server; the paths below are
//! the ones the crawler derives from the root document.

/// Hypermedia paths the fixture server answers
pub struct SmallServer;

impl SmallServer {
    pub const ROOT_PATH: &'static str = "/app/rest/server";
    pub const PROJECTS_PATH: &'static str = "/app/rest/projects";

    pub fn project_path(id: &str) -> String {
        format!("/app/rest/projects/id:{}", id)
    }

    pub fn build_type_path(id: &str) -> String {
        format!("/app/rest/buildTypes/id:{}", id)
    }

    pub fn builds_path(build_type_id: &str) -> String {
        format!("/app/rest/buildTypes/id:{}/builds/", build_type_id)
    }

    pub fn manifest_path(build_type_id: &str, build_id: &str) -> String {
        format!(
            "/repository/download/{}/{}:id/.teamcity/nuget/nuget.xml",
            build_type_id, build_id
        )
    }

    pub fn feed_path(id: &str, version: &str) -> String {
        format!(
            "/guestAuth/app/nuget/v1/FeedService.svc/Packages(Id='{}',Version='{}')",
            id, version
        )
    }

    pub fn root_doc() -> &'static str {
        r#"<server version="9.1"><projects href="/app/rest/projects"/></server>"#
    }

    pub fn project_list() -> &'static str {
        r#"<projects count="3">
             <project id="P1" name="Libraries" href="/app/rest/projects/id:P1"/>
             <project id="P2" name="Apps" href="/app/rest/projects/id:P2"/>
             <project id="P3" name="Legacy" href="/app/rest/projects/id:P3"/>
           </projects>"#
    }

    pub fn project_doc(build_type_id: &str, build_type_name: &str) -> String {
        format!(
            r#"<project>
                 <buildTypes count="1">
                   <buildType id="{id}" name="{name}" href="/app/rest/buildTypes/id:{id}"/>
                 </buildTypes>
               </project>"#,
            id = build_type_id,
            name = build_type_name
        )
    }

    pub fn build_type_doc(id: &str) -> String {
        format!(
            r#"<buildType id="{id}"><builds href="/app/rest/buildTypes/id:{id}/builds/"/></buildType>"#,
            id = id
        )
    }

    pub fn builds_doc(build_type_id: &str, build_id: &str, number: &str) -> String {
        format!(
            r#"<builds count="1">
                 <build id="{build_id}" number="{number}" buildTypeId="{bt}" href="/app/rest/builds/id:{build_id}"/>
               </builds>"#,
            build_id = build_id,
            number = number,
            bt = build_type_id
        )
    }

    pub fn libraries_manifest() -> &'static str {
        r#"<nuget-dependencies>
             <packages/>
             <created>
               <package id="Acme.Abstractions" version="1.0.0"/>
               <package id="Acme.Core" version="1.2.0"/>
             </created>
             <published/>
           </nuget-dependencies>"#
    }

    pub fn apps_manifest() -> &'static str {
        r#"<nuget-dependencies>
             <packages>
               <package id="Acme.Abstractions" version="1.0.0"/>
               <package id="Acme.Core" version="1.2.0"/>
             </packages>
             <created/>
             <published/>
           </nuget-dependencies>"#
    }

    pub fn feed_entry(dependencies: &str) -> String {
        format!(
            r#"<entry xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata"
                      xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices">
                 <m:properties><d:Dependencies>{}</d:Dependencies></m:properties>
               </entry>"#,
            dependencies
        )
    }

    /// Mount the whole fixture server. `P3`'s manifest is deliberately not
    /// mounted: the crawler's manifest request answers 501, which the
    /// empty-tolerant fetch treats as "no package activity".
    pub async fn mount(server: &mut mockito::ServerGuard) {
        let documents: Vec<(String, String)> = vec![
            (Self::ROOT_PATH.to_string(), Self::root_doc().to_string()),
            (
                Self::PROJECTS_PATH.to_string(),
                Self::project_list().to_string(),
            ),
            (
                Self::project_path("P1"),
                Self::project_doc("Bt1", "Core Build"),
            ),
            (Self::project_path("P2"), Self::project_doc("Bt2", "Web App")),
            (
                Self::project_path("P3"),
                Self::project_doc("Bt3", "Legacy Build"),
            ),
            (Self::build_type_path("Bt1"), Self::build_type_doc("Bt1")),
            (Self::build_type_path("Bt2"), Self::build_type_doc("Bt2")),
            (Self::build_type_path("Bt3"), Self::build_type_doc("Bt3")),
            (
                Self::manifest_path("Bt1", "42"),
                Self::libraries_manifest().to_string(),
            ),
            (
                Self::manifest_path("Bt2", "57"),
                Self::apps_manifest().to_string(),
            ),
            (
                Self::feed_path("Acme.Abstractions", "1.0.0"),
                Self::feed_entry(""),
            ),
            (
                Self::feed_path("Acme.Core", "1.2.0"),
                Self::feed_entry("Acme.Abstractions:1.0.0|"),
            ),
        ];

        for (path, body) in documents {
            server
                .mock("GET", path.as_str())
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;
        }

        let builds = [
            ("Bt1", "42", "1.0.42"),
            ("Bt2", "57", "2.3.57"),
            ("Bt3", "73", "0.9.73"),
        ];
        for (build_type_id, build_id, number) in builds {
            server
                .mock("GET", Self::builds_path(build_type_id).as_str())
                .match_query(mockito::Matcher::UrlEncoded(
                    "status".into(),
                    "SUCCESS".into(),
                ))
                .with_status(200)
                .with_body(Self::builds_doc(build_type_id, build_id, number))
                .create_async()
                .await;
        }
    }
}
