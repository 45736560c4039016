//! Pretty-print output tests.

use gtrclient::output::PrettyPrint;
use gtrclient::{CerifClient, ClientOptions, GtrClient, Serialisation};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT_ID: &str = "0D2C6B1C-6D1A-4A0B-9C3E-1F2A3B4C5D6E";

async fn serve(server: &MockServer, resource: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(resource))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_project_pretty_print_format() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        &format!("/project/{PROJECT_ID}"),
        include_str!("fixtures/project.xml"),
    )
    .await;

    let client = GtrClient::new(&mock_server.uri(), ClientOptions::default()).unwrap();
    let output = client.project(PROJECT_ID).await.unwrap().pretty_print();

    assert!(output.starts_with(&format!("Project: {PROJECT_ID}")));
    assert!(output.contains("Title:          Seabed carbon storage"));
    assert!(output.contains("Value:          £304356"));
    assert!(output.contains("Start:          2010-10-01"));
    assert!(output.contains("Lead:           University of Edinburgh"));
    assert!(output.contains("People:         Jane Smith, Ravi Patel"));
    // no end date in the fixture
    assert!(!output.contains("End:"));
}

#[tokio::test]
async fn test_organisation_pretty_print_counts_projects() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/organisation/ORG-ED",
        include_str!("fixtures/organisation.xml"),
    )
    .await;

    let client = GtrClient::new(&mock_server.uri(), ClientOptions::default()).unwrap();
    let output = client.organisation("ORG-ED").await.unwrap().pretty_print();

    assert!(output.starts_with("Organisation: ORG-ED"));
    assert!(output.contains("Name:           University of Edinburgh"));
    assert!(output.contains("Projects:       2"));
}

#[tokio::test]
async fn test_cerif_project_pretty_print() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/cerif/cfproj/CP-1",
        include_str!("fixtures/cerif_project.json"),
    )
    .await;

    let cerif = CerifClient::new(
        &mock_server.uri(),
        ClientOptions::default().with_serialisation(Serialisation::Json),
    )
    .unwrap();
    let output = cerif.project("CP-1").await.unwrap().pretty_print();

    assert!(output.starts_with("CERIF project: CP-1"));
    assert!(output.contains("OrgUnit:        OU-ED (class CLASS-LEAD)"));
    assert!(output.contains("OrgUnit:        OU-MS (class CLASS-COLLAB)"));
}
