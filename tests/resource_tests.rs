//! Integration tests for resource handles and the registry.

mod common;

use common::{client, params, FakeTransport};
use redmine_api::clients::HttpMethod;
use redmine_api::rest::resources::{IssueStatusApi, TrackerApi};
use redmine_api::rest::{Api, ApiError, ApiKind, ResourceApi};
use redmine_api::wire::WireValue;
use serde_json::json;

fn kind_of<'a, R: ResourceApi<'a, FakeTransport>>(_: &R) -> ApiKind {
    R::KIND
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_every_kind_has_a_handle() {
    let client = client(FakeTransport::new());

    for kind in ApiKind::ALL {
        assert_eq!(client.api(kind).kind(), kind);
        assert_eq!(kind.as_str().parse::<ApiKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn test_unknown_kind_is_rejected() {
    let error = "timelog".parse::<ApiKind>().unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid value 'timelog' for parameter 'api': expected a known resource name"
    );
}

#[test]
fn test_generic_handle_lookup() {
    let client = client(FakeTransport::new());

    let trackers: TrackerApi<'_, FakeTransport> = client.resource();
    let statuses = client.resource::<IssueStatusApi<'_, FakeTransport>>();

    assert_eq!(kind_of(&trackers), ApiKind::Tracker);
    assert_eq!(kind_of(&statuses), ApiKind::IssueStatus);
    assert!(std::ptr::eq(trackers.client(), &client));
    assert!(std::ptr::eq(statuses.client(), &client));
}

#[tokio::test]
async fn test_handle_selected_by_name_is_usable() {
    let client = client(
        FakeTransport::new().json(200, r#"{"trackers":[{"id":1,"name":"Bug"},{"id":2,"name":"Feature"}]}"#),
    );

    let kind: ApiKind = "tracker".parse().unwrap();
    let Api::Tracker(mut trackers) = client.api(kind) else {
        panic!("expected a tracker handle");
    };
    let names = trackers.list_names(false).await.unwrap();

    assert_eq!(names.get(&2).map(String::as_str), Some("Feature"));
    assert_eq!(client.transport().paths(), vec!["/trackers.json?limit=100&offset=0"]);
}

// ============================================================================
// Error statuses
// ============================================================================

#[tokio::test]
async fn test_validation_errors_keep_response() {
    let client = client(FakeTransport::new().json(
        422,
        r#"{"errors":["Name cannot be blank","Identifier is too short"]}"#,
    ));

    let error = client
        .project()
        .create(&params(json!({"name": "x", "identifier": "x"})))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(422));
    let ApiError::UnexpectedResponse(unexpected) = &error else {
        panic!("expected an unexpected response, got {error:?}");
    };
    assert_eq!(
        unexpected.messages(),
        vec!["Name cannot be blank", "Identifier is too short"]
    );
    assert_eq!(
        error.to_string(),
        "Unexpected response status 422 (expected a status below 400)"
    );
}

#[tokio::test]
async fn test_not_found_is_an_error() {
    let client = client(FakeTransport::new().respond(404, "text/html", ""));

    let error = client.issue().show(99, &params(json!({}))).await.unwrap_err();

    assert_eq!(error.status(), Some(404));
    assert_eq!(error.response().map(|r| r.code), Some(404));
}

#[tokio::test]
async fn test_state_change_requires_no_content() {
    let client = client(FakeTransport::new().json(200, "{}"));

    let error = client.project().archive("web").await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Unexpected response status 200 (expected 204)"
    );
    let request = &client.transport().requests()[0];
    assert_eq!(request.http_method, HttpMethod::Put);
    assert_eq!(request.path, "/projects/web/archive.xml");
}

#[tokio::test]
async fn test_missing_parameters_are_reported_before_sending() {
    let client = client(FakeTransport::new());

    let error = client
        .user()
        .create(&params(json!({"login": "jsmith", "mail": ""})))
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::MissingParameter(_)));
    assert!(error.to_string().contains("`lastname`"));
    assert!(error.to_string().contains("`mail`"));
    assert!(client.transport().requests().is_empty());
}

// ============================================================================
// Workflows
// ============================================================================

#[tokio::test]
async fn test_issue_created_from_names_then_closed() {
    let client = client(
        FakeTransport::new()
            .json(200, r#"{"projects":[{"id":1,"name":"Website"}]}"#)
            .json(200, r#"{"trackers":[{"id":1,"name":"Bug"},{"id":2,"name":"Feature"}]}"#)
            .json(201, r#"{"issue":{"id":42,"subject":"Login fails"}}"#)
            .json(200, r#"{"issue_statuses":[{"id":1,"name":"New"},{"id":5,"name":"Closed"}]}"#)
            .respond(204, "application/json", ""),
    );
    let mut issues = client.issue();

    let created = issues
        .create(&params(json!({
            "project": "Website",
            "tracker": "Feature",
            "subject": "Login fails",
            "priority_id": redmine_api::rest::resources::PRIORITY_HIGH,
        })))
        .await
        .unwrap();
    let id = created
        .get("issue")
        .and_then(|issue| issue.get("id"))
        .and_then(WireValue::as_i64)
        .unwrap();
    issues.set_issue_status(id, "Closed").await.unwrap();

    let requests = client.transport().requests();
    assert_eq!(
        client.transport().paths(),
        vec![
            "/projects.json?limit=100&offset=0",
            "/trackers.json?limit=100&offset=0",
            "/issues.xml",
            "/issue_statuses.json?limit=100&offset=0",
            "/issues/42.xml",
        ]
    );

    let created_body = requests[2].body_text().unwrap();
    assert!(created_body.contains("<project_id>1</project_id>"));
    assert!(created_body.contains("<tracker_id>2</tracker_id>"));
    assert!(created_body.contains("<priority_id>3</priority_id>"));
    assert!(!created_body.contains("<project>"));

    assert_eq!(requests[4].http_method, HttpMethod::Put);
    assert!(requests[4]
        .body_text()
        .unwrap()
        .contains("<status_id>5</status_id>"));
}

#[tokio::test]
async fn test_unknown_name_stops_the_operation() {
    let client = client(FakeTransport::new().json(200, r#"{"projects":[{"id":1,"name":"Website"}]}"#));

    let error = client
        .issue()
        .create(&params(json!({"project": "Intranet", "subject": "x"})))
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::InvalidParameter(_)));
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn test_upload_then_attach() {
    let client = client(
        FakeTransport::new()
            .json(201, r#"{"upload":{"id":7,"token":"7.ed32257a"}}"#)
            .respond(204, "application/json", ""),
    );

    let upload = client
        .attachment()
        .upload(b"stack trace".to_vec(), &params(json!({"filename": "trace.txt"})))
        .await
        .unwrap();
    let token = upload
        .get("upload")
        .and_then(|u| u.get("token"))
        .and_then(WireValue::as_str)
        .unwrap()
        .to_string();

    client
        .issue()
        .attach(
            12,
            &params(json!({"token": token, "filename": "trace.txt", "content_type": "text/plain"})),
        )
        .await
        .unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests[0].http_method, HttpMethod::Post);
    assert_eq!(requests[0].path, "/uploads.json?filename=trace.txt");
    assert_eq!(requests[0].body.as_deref(), Some(&b"stack trace"[..]));
    assert_eq!(requests[1].path, "/issues/12.json");
    assert_eq!(
        requests[1].body_text().unwrap(),
        r#"{"issue":{"uploads":[{"token":"7.ed32257a","filename":"trace.txt","content_type":"text/plain"}]}}"#
    );
}

#[tokio::test]
async fn test_project_version_lifecycle() {
    let client = client(
        FakeTransport::new()
            .json(201, r#"{"project":{"id":3,"identifier":"intranet"}}"#)
            .json(201, r#"{"version":{"id":11,"name":"1.0"}}"#)
            .json(200, r#"{"versions":[{"id":11,"name":"1.0"}],"total_count":1}"#)
            .respond(204, "application/json", ""),
    );

    client
        .project()
        .create(&params(json!({"name": "Intranet", "identifier": "intranet"})))
        .await
        .unwrap();
    client
        .version()
        .create("intranet", &params(json!({"name": "1.0", "status": "open"})))
        .await
        .unwrap();
    let mut versions = client.version();
    let id = versions.get_id_by_name("intranet", "1.0").await.unwrap();
    assert_eq!(id, Some(11));
    versions
        .update(11, &params(json!({"status": "closed"})))
        .await
        .unwrap();

    assert_eq!(
        client.transport().calls_summary(),
        vec![
            "POST /projects.xml",
            "POST /projects/intranet/versions.xml",
            "GET /projects/intranet/versions.json?limit=100&offset=0",
            "PUT /versions/11.xml",
        ]
    );
}
