//! Resource facade tests against a mocked GtR API.
//!
//! Uses wiremock to serve fixture documents in both serialisations.

use chrono::NaiveDate;
use gtrclient::{ClientOptions, Credentials, Get, GtrClient, GtrError, Project, Serialisation};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT_ID: &str = "0D2C6B1C-6D1A-4A0B-9C3E-1F2A3B4C5D6E";
const PROJECT_XML: &str = include_str!("fixtures/project.xml");
const PROJECT_JSON: &str = include_str!("fixtures/project.json");
const ORGANISATION_XML: &str = include_str!("fixtures/organisation.xml");
const PERSON_JSON: &str = include_str!("fixtures/person.json");
const PUBLICATION_XML: &str = include_str!("fixtures/publication.xml");

fn client(server: &MockServer, serialisation: Serialisation) -> GtrClient {
    GtrClient::new(
        &server.uri(),
        ClientOptions::default().with_serialisation(serialisation),
    )
    .unwrap()
}

async fn mount(server: &MockServer, resource: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(resource))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_project_accessors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/project/{PROJECT_ID}")))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROJECT_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, Serialisation::Xml);
    let project = Project::get(&client, PROJECT_ID.to_string()).await.unwrap();

    assert_eq!(project.id().as_deref(), Some(PROJECT_ID));
    assert_eq!(
        project.title().as_deref(),
        Some("Seabed carbon storage in Scottish sea lochs")
    );
    assert_eq!(project.status().as_deref(), Some("Closed"));
    assert_eq!(project.funder().as_deref(), Some("NERC"));
    assert_eq!(project.category().as_deref(), Some("Research Grant"));
    assert_eq!(project.reference().as_deref(), Some("NE/H012345/1"));
    assert_eq!(project.start().as_deref(), Some("2010-10-01Z"));
    assert_eq!(project.start_date(), NaiveDate::from_ymd_opt(2010, 10, 1));
    assert_eq!(project.end(), None);
    assert_eq!(project.end_date(), None);
    assert_eq!(project.value_pounds(), Some(304356.0));
    assert!(project.abstract_text().unwrap().contains("fjordic sediments"));
    assert_eq!(
        project.url(),
        Some(format!("{}/project/{PROJECT_ID}", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_project_relations() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, &format!("/project/{PROJECT_ID}"), PROJECT_XML).await;

    let client = client(&mock_server, Serialisation::Xml);
    let project = client.project(PROJECT_ID).await.unwrap();

    let lead = project.lead_organisation().unwrap().unwrap();
    assert_eq!(lead.id().as_deref(), Some("ORG-ED"));
    assert_eq!(lead.name().as_deref(), Some("University of Edinburgh"));
    // embedded, not fetched on its own
    assert_eq!(lead.url(), None);

    let organisations: Vec<_> = project
        .organisations()
        .unwrap()
        .iter()
        .filter_map(|o| o.name())
        .collect();
    assert_eq!(
        organisations,
        vec!["University of Edinburgh", "University of Aberdeen"]
    );

    let people: Vec<_> = project
        .people()
        .unwrap()
        .iter()
        .filter_map(|p| p.name())
        .collect();
    assert_eq!(people, vec!["Jane Smith", "Ravi Patel"]);

    let collaborators = project.collaborators().unwrap();
    assert_eq!(collaborators.len(), 1);
    assert_eq!(collaborators[0].id().as_deref(), Some("ORG-MS"));
}

#[tokio::test]
async fn test_json_and_xml_projects_agree() {
    let xml_server = MockServer::start().await;
    let json_server = MockServer::start().await;
    mount(&xml_server, &format!("/project/{PROJECT_ID}"), PROJECT_XML).await;

    Mock::given(method("GET"))
        .and(path(format!("/project/{PROJECT_ID}")))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROJECT_JSON))
        .mount(&json_server)
        .await;

    let from_xml = client(&xml_server, Serialisation::Xml)
        .project(PROJECT_ID)
        .await
        .unwrap();
    let from_json = client(&json_server, Serialisation::Json)
        .project(PROJECT_ID)
        .await
        .unwrap();

    assert_eq!(from_xml.id(), from_json.id());
    assert_eq!(from_xml.title(), from_json.title());
    assert_eq!(from_xml.start(), from_json.start());
    assert_eq!(from_xml.end(), from_json.end());
    assert_eq!(from_xml.value(), from_json.value());
    assert_eq!(from_xml.funder(), from_json.funder());

    let lead_xml = from_xml.lead_organisation().unwrap().unwrap();
    let lead_json = from_json.lead_organisation().unwrap().unwrap();
    assert_eq!(lead_xml.name(), lead_json.name());

    let people_xml: Vec<_> = from_xml.people().unwrap().iter().map(|p| p.id()).collect();
    let people_json: Vec<_> = from_json.people().unwrap().iter().map(|p| p.id()).collect();
    assert_eq!(people_xml, people_json);
}

#[tokio::test]
async fn test_fetch_embedded_organisation() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, &format!("/project/{PROJECT_ID}"), PROJECT_XML).await;

    Mock::given(method("GET"))
        .and(path("/organisation/ORG-ED"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ORGANISATION_XML))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, Serialisation::Xml);
    let project = client.project(PROJECT_ID).await.unwrap();
    let mut lead = project.lead_organisation().unwrap().unwrap();

    // embedded organisations carry no projects
    assert!(lead.projects().unwrap().is_empty());

    lead.fetch().await.unwrap();
    assert_eq!(lead.name().as_deref(), Some("University of Edinburgh"));
    assert_eq!(
        lead.url(),
        Some(format!("{}/organisation/ORG-ED", mock_server.uri()).as_str())
    );

    let projects: Vec<_> = lead.projects().unwrap().iter().filter_map(|p| p.id()).collect();
    assert_eq!(projects, vec!["P-1", PROJECT_ID]);

    // refetching is idempotent
    lead.fetch().await.unwrap();
    assert_eq!(lead.id().as_deref(), Some("ORG-ED"));
    assert_eq!(lead.projects().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_person_json() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/person/PER-1", PERSON_JSON).await;

    let client = client(&mock_server, Serialisation::Json);
    let person = client.person("PER-1").await.unwrap();

    assert_eq!(person.name().as_deref(), Some("Jane Smith"));
    let projects = person.projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id().as_deref(), Some(PROJECT_ID));
}

#[tokio::test]
async fn test_get_publication() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/publication/PUB-7", PUBLICATION_XML).await;

    let client = client(&mock_server, Serialisation::Xml);
    let publication = client.publication("PUB-7").await.unwrap();

    assert_eq!(publication.id().as_deref(), Some("PUB-7"));
    assert_eq!(
        publication.title().as_deref(),
        Some("Carbon burial rates in Scottish fjords")
    );
    assert!(publication.render().unwrap().contains("gtr:publicationOverview"));
}

#[tokio::test]
async fn test_fetch_without_id_fails() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/publication/PUB-0",
        r#"<gtr:publicationOverview xmlns:gtr="http://gtr.rcuk.ac.uk/api"><gtr:publication/></gtr:publicationOverview>"#,
    )
    .await;

    let client = client(&mock_server, Serialisation::Xml);
    let mut publication = client.publication("PUB-0").await.unwrap();

    let err = publication.fetch().await.unwrap_err();
    assert!(matches!(err, GtrError::MissingId { .. }));
}

#[tokio::test]
async fn test_not_found_is_fetch_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, Serialisation::Xml);
    let err = client.project("missing").await.unwrap_err();

    match err {
        GtrError::FetchFailed { url, status } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/project/missing"));
        }
        other => panic!("Expected FetchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_basic_auth_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication/PUB-7"))
        .and(header("authorization", "Basic bWU6czNjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PUBLICATION_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GtrClient::new(
        &mock_server.uri(),
        ClientOptions::default().with_credentials(Credentials::new("me", "s3cret")),
    )
    .unwrap();

    let publication = client.publication("PUB-7").await.unwrap();
    assert_eq!(publication.id().as_deref(), Some("PUB-7"));
}
