use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bin() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("vet-cli").expect("binary")
}

#[test]
fn basic_prints_each_failure() {
    bin()
        .arg("basic")
        .assert()
        .success()
        .stdout(predicate::eq(
            "books.0.title: is required\nbooks.0.author: is required\n",
        ));
}

#[test]
fn failures_are_not_echoed_to_the_console_log() {
    bin()
        .arg("basic")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("books.0.title").not())
        .stderr(predicate::str::contains("validation failure").not());
}

#[test]
fn basic_with_complete_book_prints_nothing() {
    bin()
        .args(["basic", "--title", "The Firm", "--author", "John Grisham"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn sample_manifest_fails() {
    bin()
        .arg("manifest")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "spec.containers.1.imageRef: image with name 'myServer' not found",
        ))
        .stdout(predicate::str::contains("spec.images.0.tag: is required"))
        .stderr(predicate::str::contains("4 validation failure(s)"));
}

#[test]
fn manifest_from_file() {
    let tmp = tempdir().expect("tmpdir");
    let good = tmp.path().join("good.json");
    fs::write(
        &good,
        r#"{"spec": {"containers": [{"name": "web", "imageRef": "nginx"}],
            "images": [{"name": "nginx", "uri": "docker.io/nginx", "tag": "1.27"}]}}"#,
    )
    .expect("write manifest");
    bin()
        .arg("manifest")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest is valid"));

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, r#"{"spec": {"containers": []}}"#).expect("write manifest");
    bin()
        .arg("manifest")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "spec.containers: must contain at least one item",
        ));
}

#[test]
fn unreadable_manifest_reports_context() {
    bin()
        .args(["manifest", "/nonexistent/manifest.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading manifest"));
}

#[test]
fn config_changes_separator() {
    let tmp = tempdir().expect("tmpdir");
    let cfg = tmp.path().join("vet.toml");
    fs::write(&cfg, "[path]\nseparator = \"/\"\n").expect("write config");
    bin()
        .arg("--config")
        .arg(&cfg)
        .arg("basic")
        .assert()
        .success()
        .stdout(predicate::str::contains("books/0/title: is required"));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = tempdir().expect("tmpdir");
    let cfg = tmp.path().join("vet.toml");
    fs::write(&cfg, "[path]\nseparator = \"\"\n").expect("write config");
    bin()
        .args(["basic", "--config"])
        .arg(&cfg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("path.separator: must not be empty"));
}

#[test]
fn config_schema_lists_settings() {
    bin()
        .arg("config-schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("separator"))
        .stdout(predicate::str::contains("conventions"));
}
