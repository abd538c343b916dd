//
//  bitbucket-pullrequests
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tests of the `bbpr` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// `bbpr` isolated from the user's configuration and environment.
fn bbpr(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bbpr").unwrap();
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env_remove("BBPR_OWNER")
        .env_remove("BBPR_REPO")
        .env_remove("BBPR_DEBUG")
        .env_remove("BITBUCKET_API_URL")
        .env_remove("BITBUCKET_USERNAME")
        .env_remove("BITBUCKET_APP_PASSWORD")
        .env_remove("BITBUCKET_TOKEN");
    cmd
}

#[test]
fn test_version() {
    Command::cargo_bin("bbpr")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_requires_owner() {
    let dir = TempDir::new().unwrap();
    bbpr(&dir)
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--owner"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let dir = TempDir::new().unwrap();
    bbpr(&dir).args(["list", "--bogus"]).assert().code(2);
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    bbpr(&dir)
        .args(["config", "set", "defaults.owner", "team"])
        .assert()
        .success();

    bbpr(&dir)
        .args(["config", "get", "defaults.owner"])
        .assert()
        .success()
        .stdout("team\n");

    bbpr(&dir)
        .args(["config", "set", "auth.token", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_list_against_server() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/repositories/team/app/pullrequests/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"values": [{
                "id": 7,
                "title": "Fix flaky test",
                "state": "OPEN",
                "author": {"display_name": "Jane Doe"},
                "source": {"branch": {"name": "fix"}},
                "destination": {"branch": {"name": "main"}}
            }]})
            .to_string(),
        )
        .create();

    let dir = TempDir::new().unwrap();
    bbpr(&dir)
        .args(["--owner", "team", "--repo", "app", "list"])
        .env("BITBUCKET_API_URL", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix flaky test"));
}

#[test]
fn test_view_not_found_exit_code() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/repositories/team/app/pullrequests/404")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"type": "error", "error": {"message": "Pull request not found"}}"#)
        .create();

    let dir = TempDir::new().unwrap();
    bbpr(&dir)
        .args(["--owner", "team", "--repo", "app", "view", "404"])
        .env("BITBUCKET_API_URL", server.url())
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Pull request not found"));
}
