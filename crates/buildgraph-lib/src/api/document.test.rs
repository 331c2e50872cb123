use super::*;

fn base() -> Url {
    Url::parse("http://teamcity.example.com/app/rest/server").unwrap()
}

#[test]
fn test_parse_attributes_and_children() {
    let doc = Document::parse(
        r#"<server version="9.1">
             <projects href="/app/rest/projects"/>
           </server>"#,
    )
    .unwrap();

    assert_eq!(doc.root().name(), "server");
    assert_eq!(doc.root().attr("version"), Some("9.1"));
    assert_eq!(
        doc.root().child("projects").unwrap().attr("href"),
        Some("/app/rest/projects")
    );
}

#[test]
fn test_parse_strips_namespace_prefixes() {
    let doc = Document::parse(
        r#"<entry xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata"
                  xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices">
             <m:properties>
               <d:Dependencies>Acme.Core:1.0.0</d:Dependencies>
             </m:properties>
           </entry>"#,
    )
    .unwrap();

    let deps = doc.navigate(&["properties", "Dependencies"]).unwrap();
    assert_eq!(deps.text(), "Acme.Core:1.0.0");
}

#[test]
fn test_parse_unescapes_entities() {
    let doc = Document::parse(r#"<project name="Tools &amp; Services"/>"#).unwrap();
    assert_eq!(doc.root().attr("name"), Some("Tools & Services"));
}

#[test]
fn test_parse_rejects_empty_input() {
    assert!(matches!(
        Document::parse(""),
        Err(DocumentError::EmptyDocument)
    ));
}

#[test]
fn test_parse_rejects_unclosed_element() {
    assert!(matches!(
        Document::parse("<server><projects>"),
        Err(DocumentError::Parse { .. })
    ));
}

#[test]
fn test_children_filters_by_name_in_document_order() {
    let doc = Document::parse(
        r#"<projects>
             <project id="P1"/>
             <ignored/>
             <project id="P2"/>
           </projects>"#,
    )
    .unwrap();

    let ids: Vec<_> = doc
        .root()
        .children("project")
        .map(|p| p.attr("id").unwrap())
        .collect();
    assert_eq!(ids, ["P1", "P2"]);
}

#[test]
fn test_navigate_takes_first_match_only() {
    let doc = Document::parse(
        r#"<buildType>
             <builds href="/first"/>
             <builds href="/second"/>
           </buildType>"#,
    )
    .unwrap();

    assert_eq!(
        doc.navigate(&["builds"]).unwrap().attr("href"),
        Some("/first")
    );
}

#[test]
fn test_resolve_link_joins_relative_href_against_base() {
    let doc = Document::parse(r#"<server><projects href="/app/rest/projects"/></server>"#).unwrap();
    let url = resolve_link(&doc, &base(), &["projects"]).unwrap();
    assert_eq!(
        url.as_str(),
        "http://teamcity.example.com/app/rest/projects"
    );
}

#[test]
fn test_resolve_link_missing_element_is_link_not_found() {
    let doc = Document::parse("<server/>").unwrap();
    assert!(matches!(
        resolve_link(&doc, &base(), &["projects"]),
        Err(DocumentError::LinkNotFound { .. })
    ));
}

#[test]
fn test_resolve_link_missing_href_is_link_not_found() {
    let doc = Document::parse("<server><projects/></server>").unwrap();
    assert!(matches!(
        resolve_link(&doc, &base(), &["projects"]),
        Err(DocumentError::LinkNotFound { .. })
    ));
}

#[test]
fn test_require_attr_reports_element_name() {
    let doc = Document::parse(r#"<build number="17"/>"#).unwrap();
    let err = doc.root().require_attr("id").unwrap_err();
    assert!(matches!(
        err,
        DocumentError::MissingAttribute { ref name, ref element }
            if name == "id" && element == "build"
    ));
}

#[test]
fn test_empty_manifest_has_all_three_groups() {
    let doc = Document::empty_manifest();
    assert_eq!(doc.root().name(), "nuget-dependencies");
    for group in ["packages", "created", "published"] {
        let element = doc.root().child(group).unwrap();
        assert_eq!(element.children("package").count(), 0);
    }
}

#[test]
fn test_text_concatenates_and_trims() {
    let doc = Document::parse("<d>  one\n  two  </d>").unwrap();
    assert_eq!(doc.root().text(), "one\n  two");
}
