//! Integration tests for `content migrate`.
//!
//! Invariants:
//! - Files are upserted by slug among active documents.
//! - A file without a slug fails on its own; the rest of the run continues.

mod common;

use common::{API_KEY_HEADER, cms_cmd_with_base_url, write};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn empty_page() -> serde_json::Value {
    json!({
        "docs": [],
        "totalDocs": 0,
        "limit": 1,
        "page": 1,
        "totalPages": 0,
        "hasNextPage": false,
        "hasPrevPage": false
    })
}

fn content_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "posts/new-post.mdx",
        "---\ntitle: New Post\nslug: new-post\nseo_title: New | Site\n---\n",
    );
    write(
        dir.path(),
        "posts/old-post.mdx",
        "---\ntitle: Old Post\nslug: old-post\n---\n",
    );
    // Parse errors in other collections do not affect this run.
    write(dir.path(), "pages/broken.md", "no frontmatter\n");
    dir
}

#[tokio::test]
async fn test_content_migrate_upserts_by_slug() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(header("Authorization", API_KEY_HEADER))
        .and(query_param("where[slug][equals]", "old-post"))
        .and(query_param("where[deletedAt][equals]", "null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"id": "d1", "slug": "old-post"}],
            "totalDocs": 1,
            "limit": 1,
            "page": 1,
            "totalPages": 1,
            "hasNextPage": false,
            "hasPrevPage": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("where[slug][equals]", "new-post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .and(body_partial_json(json!({"slug": "new-post", "seo": {"title": "New | Site"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "doc": {"id": "d2", "slug": "new-post"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/posts/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "doc": {"id": "d1", "slug": "old-post"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = content_root();
    cms_cmd_with_base_url(&server.uri())
        .args(["content", "migrate", "--quiet", "--collection", "posts", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Migration to posts: 1 created, 1 updated, 0 planned, 0 failed",
        ));
}

#[tokio::test]
async fn test_content_migrate_dry_run_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = content_root();
    cms_cmd_with_base_url(&server.uri())
        .args([
            "content",
            "migrate",
            "--dry-run",
            "--quiet",
            "--collection",
            "posts",
            "--root",
        ])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 planned, 0 failed"))
        .stdout(predicate::str::contains("Would write (2):"));
}

#[tokio::test]
async fn test_content_migrate_missing_slug_exits_5() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write(dir.path(), "posts/untitled.mdx", "---\ntitle: Untitled\n---\n");

    cms_cmd_with_base_url(&server.uri())
        .args(["content", "migrate", "--quiet", "--collection", "posts", "--root"])
        .arg(dir.path())
        .assert()
        .code(5)
        .stdout(predicate::str::contains("untitled.mdx\tno slug to upsert by"))
        .stderr(predicate::str::contains("Content migration: 1 failed"));
}

#[tokio::test]
async fn test_content_migrate_source_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "doc": {"id": "a1"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = content_root();
    cms_cmd_with_base_url(&server.uri())
        .args([
            "content",
            "migrate",
            "--quiet",
            "--collection",
            "articles",
            "--source",
            "posts",
            "--root",
        ])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Migration to articles: 2 created"));
}
