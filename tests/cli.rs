// ABOUTME: Integration tests for the harmonia CLI commands.
// ABOUTME: Validates --help output, init, argument rules, and commands against a fake portal.

mod support;

use assert_cmd::Command;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use support::fixtures::{self, AppShape};

fn harmonia_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("harmonia"))
}

#[test]
fn help_shows_commands() {
    harmonia_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("harmonia.yml");

    harmonia_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--app", "billing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created harmonia.yml"));

    assert!(config_path.exists(), "harmonia.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("name: billing"), "Config should name the app");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("harmonia.yml");

    fs::write(&config_path, "existing: config").unwrap();

    harmonia_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn delete_requires_env_or_all() {
    harmonia_cmd()
        .arg("delete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--env").or(predicate::str::contains("--all")));
}

#[test]
fn status_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    harmonia_cmd()
        .current_dir(temp_dir.path())
        .args(["status", "--env", "dev"])
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

/// Serve a portal that knows one stack and can delete it, and write a config
/// pointing at it. Returns the config path.
async fn portal_with_config(dir: &std::path::Path, delete_status: StatusCode) -> PathBuf {
    let router = Router::new()
        .route(
            "/api/aws-apps-backend/cloudformation/describeStackEvents",
            post(|| async {
                axum::Json(json!({ "StackEvents": [{
                    "ResourceType": "AWS::CloudFormation::Stack",
                    "ResourceStatus": "UPDATE_COMPLETE",
                    "LogicalResourceId": "orders-dev"
                }]}))
            }),
        )
        .route(
            "/api/aws-apps-backend/cloudformation/deleteStack",
            post(move || async move { (delete_status, axum::Json(json!({}))) }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let path = dir.join("harmonia.yml");
    fs::write(
        &path,
        fixtures::config_yaml(AppShape::ecs_cdk(), &format!("http://{addr}")),
    )
    .unwrap();
    path
}

#[tokio::test(flavor = "multi_thread")]
async fn status_prints_normalised_stack_status() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = portal_with_config(temp_dir.path(), StatusCode::OK).await;

    tokio::task::spawn_blocking(move || {
        harmonia_cmd()
            .arg("--config")
            .arg(&config)
            .args(["status", "--env", "dev"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "orders in dev: LIVE (latest: orders-dev UPDATE_COMPLETE)",
            ));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_env_reports_each_step() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = portal_with_config(temp_dir.path(), StatusCode::OK).await;

    tokio::task::spawn_blocking(move || {
        harmonia_cmd()
            .arg("--config")
            .arg(&config)
            .args(["delete", "--env", "dev"])
            .assert()
            .success()
            .stdout(predicate::str::contains("✓ infrastructure:dev"))
            .stdout(predicate::str::contains("harmonia watch --env dev"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_delete_exits_non_zero_with_json_report() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = portal_with_config(temp_dir.path(), StatusCode::INTERNAL_SERVER_ERROR).await;

    tokio::task::spawn_blocking(move || {
        harmonia_cmd()
            .arg("--config")
            .arg(&config)
            .args(["--json", "delete", "--env", "dev"])
            .assert()
            .failure()
            .stdout(predicate::str::contains(r#""event":"report""#))
            .stdout(predicate::str::contains(r#""overall_succeeded":false"#))
            .stderr(predicate::str::contains(r#""event":"error""#));
    })
    .await
    .unwrap();
}
