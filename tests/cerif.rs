//! CERIF client tests.
//!
//! Covers project relations and the per-client class cache.

use gtrclient::{Body, CerifClient, CerifEndpoint, ClientOptions, GtrError, Serialisation};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CERIF_PROJECT: &str = include_str!("fixtures/cerif_project.json");
const CERIF_CLASSES: &str = include_str!("fixtures/cerif_classes.json");

const ORG_UNIT_RELATION: &str = "{urn:xmlns:org:eurocris:cerif-1.5-1}cfProj_OrgUnit";

fn client(server: &MockServer) -> CerifClient {
    CerifClient::new(
        &server.uri(),
        ClientOptions::default().with_serialisation(Serialisation::Json),
    )
    .unwrap()
}

async fn mount_project(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cerif/cfproj/CP-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CERIF_PROJECT))
        .mount(server)
        .await;
}

async fn mount_classes(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/cerif/cfclass"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CERIF_CLASSES))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_project_org_relations() {
    let mock_server = MockServer::start().await;
    mount_project(&mock_server).await;

    let project = client(&mock_server).project("CP-1").await.unwrap();
    assert_eq!(project.id().as_deref(), Some("CP-1"));

    let relations = project.org_relations().unwrap();
    assert_eq!(relations.len(), 2);

    let first = &relations[0];
    assert_eq!(first.name().as_deref(), Some(ORG_UNIT_RELATION));
    assert_eq!(first.class_scheme_id().as_deref(), Some("SCHEME-ORG-ROLES"));
    assert_eq!(first.class_id().as_deref(), Some("CLASS-LEAD"));
    assert_eq!(first.value().as_deref(), Some("OU-ED"));

    assert_eq!(relations[1].class_id().as_deref(), Some("CLASS-COLLAB"));
}

#[tokio::test]
async fn test_class_list_is_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_project(&mock_server).await;
    mount_classes(&mock_server, 1).await;

    let cerif = client(&mock_server);

    let lead = cerif.cerif_class("CLASS-LEAD").await.unwrap().unwrap();
    assert_eq!(lead.id().as_deref(), Some("CLASS-LEAD"));
    assert_eq!(lead.class_scheme_id().as_deref(), Some("SCHEME-ORG-ROLES"));

    let terms = lead.term_relations().unwrap();
    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].value().as_deref(), Some("Lead Organisation"));

    // unknown ids are absent, not errors
    assert!(cerif.cerif_class("CLASS-NONE").await.unwrap().is_none());

    // a clone shares the cache
    let clone = cerif.clone();
    assert!(clone.cerif_class("CLASS-COLLAB").await.unwrap().is_some());

    // relations resolve their class through the same cache
    let project = cerif.project("CP-1").await.unwrap();
    let mut terms = Vec::new();
    for relation in project.org_relations().unwrap() {
        let class = relation.class().await.unwrap().unwrap();
        for term in class.term_relations().unwrap() {
            terms.push(term.value().unwrap());
        }
    }
    assert_eq!(terms, vec!["Lead Organisation", "Collaborator"]);

    // wiremock verifies the single class-list request on drop
}

#[tokio::test]
async fn test_separate_clients_have_separate_caches() {
    let mock_server = MockServer::start().await;
    mount_classes(&mock_server, 2).await;

    for _ in 0..2 {
        let cerif = client(&mock_server);
        assert!(cerif.cerif_class("CLASS-LEAD").await.unwrap().is_some());
        assert!(cerif.cerif_class("CLASS-LEAD").await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_failed_class_load_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cerif/cfclass"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_classes(&mock_server, 1).await;

    let cerif = client(&mock_server);
    let err = cerif.cerif_class("CLASS-LEAD").await.unwrap_err();
    assert!(matches!(err, GtrError::FetchFailed { status: 503, .. }));

    assert!(cerif.cerif_class("CLASS-LEAD").await.unwrap().is_some());
}

#[tokio::test]
async fn test_classes_are_unsupported_in_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cerif/cfclass"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<cerif:CERIF xmlns:cerif="urn:xmlns:org:eurocris:cerif-1.5-1"/>"#,
        ))
        .mount(&mock_server)
        .await;

    let cerif = CerifClient::new(&mock_server.uri(), ClientOptions::default()).unwrap();
    let err = cerif.cerif_class("CLASS-LEAD").await.unwrap_err();
    assert!(matches!(err, GtrError::Unsupported { .. }));
}

#[tokio::test]
async fn test_raw_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cerif/cforgunit/OU-ED"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"cfOrgUnit": {"cfOrgUnitId": "OU-ED"}}"#),
        )
        .mount(&mock_server)
        .await;

    let body = client(&mock_server)
        .raw(CerifEndpoint::OrgUnit, Some("OU-ED"))
        .await
        .unwrap();

    let Body::Json(value) = body else {
        panic!("Expected a JSON body");
    };
    assert_eq!(value["cfOrgUnit"]["cfOrgUnitId"], "OU-ED");
}
