//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the caller's `.env` files and database settings
fn labsite(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("labsite").unwrap();
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env_remove("DATABASE_URL")
        .env_remove("LABSITE_BIND")
        .env_remove("LABSITE_UPLOAD_DIR");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    labsite(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("schema"));
}

#[test]
fn test_serve_help() {
    let temp = TempDir::new().unwrap();
    labsite(&temp)
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--upload-dir"))
        .stdout(predicate::str::contains("--in-memory"));
}

#[test]
fn test_schema_prints_tables() {
    let temp = TempDir::new().unwrap();
    labsite(&temp)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS news"))
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS members"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let temp = TempDir::new().unwrap();
    labsite(&temp)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_serve_with_missing_config_fails() {
    let temp = TempDir::new().unwrap();
    labsite(&temp)
        .arg("serve")
        .arg("--in-memory")
        .arg("--config")
        .arg("nowhere.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_serve_with_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("labsite.toml"), "[server]\nbind_addr = 5\n").unwrap();

    labsite(&temp)
        .arg("serve")
        .arg("--in-memory")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}
