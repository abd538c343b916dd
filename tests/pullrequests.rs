//
//  bitbucket-pullrequests
//  tests/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end tests of the pull request bindings against a mock HTTP server.

use bitbucket_pullrequests::api::cloud::{PullRequestState, PullRequestsOptions};
use bitbucket_pullrequests::api::{ApiError, BitbucketClient};
use bitbucket_pullrequests::auth::AuthCredential;
use mockito::{Matcher, Server};
use serde_json::json;

const COLLECTION: &str = "/repositories/team/app/pullrequests/";

fn options() -> PullRequestsOptions {
    PullRequestsOptions::new("team", "app")
}

fn client(server: &Server) -> BitbucketClient {
    BitbucketClient::with_base_url(&server.url()).unwrap()
}

fn pull_request_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "type": "pullrequest",
        "id": id,
        "title": title,
        "state": "OPEN",
        "author": {"display_name": "Jane Doe", "nickname": "jane"},
        "source": {"branch": {"name": "feature-x"}},
        "destination": {"branch": {"name": "main"}},
        "links": {"html": {"href": format!("https://bitbucket.org/team/app/pull-requests/{id}")}}
    })
}

#[tokio::test]
async fn test_list_decodes_first_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", COLLECTION)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "pagelen": 2,
                "size": 3,
                "values": [pull_request_json(1, "First"), pull_request_json(2, "Second")],
                "next": format!("{}{}?page=2", server.url(), COLLECTION)
            })
            .to_string(),
        )
        .create_async()
        .await;

    let prs = client(&server).pull_requests().list(&options()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(prs.len(), 2);
    assert_eq!(prs[0].id, 1);
    assert_eq!(prs[1].title, "Second");
    assert_eq!(prs[0].state, PullRequestState::Open);
    assert_eq!(prs[0].author.display_name, "Jane Doe");
}

#[tokio::test]
async fn test_list_with_query_encodes_q() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", COLLECTION)
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "state=\"OPEN\" AND title~\"fix\"".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"values": [pull_request_json(4, "Fix login")]}).to_string())
        .create_async()
        .await;

    let prs = client(&server)
        .pull_requests()
        .list_with_query(&options(), "state=\"OPEN\" AND title~\"fix\"")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].title, "Fix login");
}

#[tokio::test]
async fn test_create_sends_body_and_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", COLLECTION)
        .match_header("authorization", "Bearer secret-token")
        .match_body(Matcher::Json(json!({
            "title": "Add feature",
            "description": "",
            "message": "",
            "close_source_branch": true,
            "source": {
                "branch": {"name": "feature-x"},
                "repository": {"full_name": "team/app"}
            },
            "destination": {"branch": {"name": "main"}},
            "reviewers": [{"username": "alice"}]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(pull_request_json(12, "Add feature").to_string())
        .create_async()
        .await;

    let options = PullRequestsOptions {
        title: "Add feature".into(),
        source_branch: "feature-x".into(),
        source_repository: "team/app".into(),
        destination_branch: "main".into(),
        close_source_branch: true,
        reviewers: vec!["alice".into()],
        ..options()
    };

    let client = client(&server).with_auth(AuthCredential::bearer("secret-token"));
    assert!(client.is_authenticated());
    let pr = client.pull_requests().create(&options).await.unwrap();

    mock.assert_async().await;
    assert_eq!(pr.id, 12);
    assert_eq!(
        pr.html_url(),
        Some("https://bitbucket.org/team/app/pull-requests/12")
    );
}

#[tokio::test]
async fn test_error_payload_on_success_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"type": "error", "error": {"message": "boom"}}"#)
        .expect_at_least(3)
        .create_async()
        .await;

    let client = client(&server);
    let prs = client.pull_requests();

    let err = prs.list(&options()).await.unwrap_err();
    assert!(err.to_string().contains("boom"));

    let err = prs.get(&options().with_id(1)).await.unwrap_err();
    assert!(err.to_string().contains("boom"));

    let err = prs
        .list_with_query_raw(&options(), "state=\"OPEN\"")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { .. }));
}

#[tokio::test]
async fn test_not_found_maps_to_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/repositories/team/app/pullrequests/99")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"type": "error", "error": {"message": "Not found", "detail": "There is no pull request with ID 99"}}"#,
        )
        .create_async()
        .await;

    let err = client(&server)
        .pull_requests()
        .get_pull_request(&options().with_id(99))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        ApiError::Api {
            status,
            message,
            detail,
        } => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "Not found");
            assert_eq!(detail.as_deref(), Some("There is no pull request with ID 99"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_without_json_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", COLLECTION)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = client(&server)
        .pull_requests()
        .list(&options())
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
}

#[tokio::test]
async fn test_diff_returns_plain_text() {
    let diff = "diff --git a/README.md b/README.md\n+hello\n";
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/repositories/team/app/pullrequests/3/diff")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body(diff)
        .create_async()
        .await;

    let prs = client(&server);
    let text = prs
        .pull_requests()
        .diff_text(&options().with_id(3))
        .await
        .unwrap();

    assert_eq!(text, diff);
}

#[tokio::test]
async fn test_merge_posts_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repositories/team/app/pullrequests/8/merge")
        .match_body(Matcher::PartialJson(json!({
            "message": "Ship it",
            "close_source_branch": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 8, "state": "MERGED"}).to_string())
        .create_async()
        .await;

    let options = PullRequestsOptions {
        message: "Ship it".into(),
        close_source_branch: true,
        ..options().with_id(8)
    };
    let response = client(&server)
        .pull_requests()
        .merge(&options)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response["state"], "MERGED");
}

#[tokio::test]
async fn test_single_comment() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/repositories/team/app/pullrequests/5/comments/42")
        .match_header("authorization", "Basic amFuZTpwdw==")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 42, "content": {"raw": "LGTM"}}).to_string())
        .create_async()
        .await;

    let comment = client(&server)
        .with_auth(AuthCredential::app_password("jane", "pw"))
        .pull_requests()
        .comment(&options().with_id(5).with_comment_id(42))
        .await
        .unwrap();

    assert_eq!(comment["content"]["raw"], "LGTM");
}
