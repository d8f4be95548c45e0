//! Integration tests for `indexes list` and `indexes sync`.
//!
//! Invariants:
//! - Sync creates only missing indexes and reports failures per index.
//! - `--dry-run` issues no POST requests.

mod common;

use common::{API_KEY_HEADER, cms_cmd_with_base_url, write};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAN: &str = "collections:\n  posts:\n    - name: slug_1\n      unique: true\n      keys:\n        - field: slug\n    - name: published_desc\n      keys:\n        - field: publishedAt\n          direction: -1\n";

fn plan_file() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "indexes.yaml", PLAN);
    let path = dir.path().join("indexes.yaml");
    (dir, path)
}

async fn mount_existing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/posts/indexes"))
        .and(header("Authorization", API_KEY_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "indexes": [
                {"name": "_id_", "key": {"_id": 1}},
                {"name": "slug_1", "key": {"slug": 1}, "unique": true}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_indexes_list_table() {
    let server = MockServer::start().await;
    mount_existing(&server).await;

    cms_cmd_with_base_url(&server.uri())
        .args(["indexes", "list", "posts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name\tKey\tUnique"))
        .stdout(predicate::str::contains("slug_1\t{\"slug\":1}\tyes"));
}

#[tokio::test]
async fn test_indexes_sync_creates_missing() {
    let server = MockServer::start().await;
    mount_existing(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/posts/indexes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, plan) = plan_file();
    cms_cmd_with_base_url(&server.uri())
        .args(["indexes", "sync", "--quiet", "--plan"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Index sync: 1 created, 1 existing, 0 planned, 0 failed",
        ))
        .stdout(predicate::str::contains("posts/published_desc"));
}

#[tokio::test]
async fn test_indexes_sync_dry_run() {
    let server = MockServer::start().await;
    mount_existing(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/posts/indexes"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, plan) = plan_file();
    cms_cmd_with_base_url(&server.uri())
        .args(["indexes", "sync", "--dry-run", "--quiet", "--plan"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would create (1):"));
}

#[tokio::test]
async fn test_indexes_sync_failure_exits_5() {
    let server = MockServer::start().await;
    mount_existing(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/posts/indexes"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"message": "bad key pattern"}]
        })))
        .mount(&server)
        .await;

    let (_dir, plan) = plan_file();
    cms_cmd_with_base_url(&server.uri())
        .args(["indexes", "sync", "--quiet", "--plan"])
        .arg(&plan)
        .assert()
        .code(5)
        .stdout(predicate::str::contains("posts/published_desc"))
        .stdout(predicate::str::contains("bad key pattern"))
        .stderr(predicate::str::contains("Index sync: 1 failed"));
}
