use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pocketbook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pocketbook").unwrap();
    cmd.env("POCKETBOOK_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

fn write_csv(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("statement.csv");
    fs::write(&path, format!("title,type,value,category\n{}", body)).unwrap();
    path
}

fn stored_transactions(data_dir: &Path) -> Vec<serde_json::Value> {
    let raw = fs::read_to_string(data_dir.join("data").join("transactions.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json["transactions"].as_array().unwrap().clone()
}

#[test]
fn init_creates_layout() {
    let data = TempDir::new().unwrap();

    pocketbook(data.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data.path().join("config.json").exists());
    assert!(data.path().join("data").join("categories.json").exists());
    assert!(data.path().join("data").join("transactions.json").exists());
}

#[test]
fn import_then_list() {
    let data = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let csv = write_csv(
        input.path(),
        "Salary,income,5000,Job\nCoffee,outcome,4.5,Food\nRent,outcome,1200,\n",
    );

    pocketbook(data.path())
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 transaction(s)."))
        .stdout(predicate::str::contains("New categories: Job, Food"));

    assert!(!csv.exists());

    pocketbook(data.path())
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("$4.50"));

    pocketbook(data.path())
        .args(["transaction", "list", "--category", "Food"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("Salary").not());

    pocketbook(data.path())
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Job"))
        .stdout(predicate::str::contains("(uncategorized)"));

    pocketbook(data.path())
        .args(["transaction", "balance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$3795.50"));
}

#[test]
fn import_twice_reuses_categories() {
    let data = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();

    let csv = write_csv(input.path(), "Coffee,outcome,4.5,Food\n");
    pocketbook(data.path()).arg("import").arg(&csv).assert().success();

    let csv = write_csv(input.path(), "Lunch,outcome,12,Food\n");
    pocketbook(data.path())
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("New categories").not())
        .stdout(predicate::str::contains("Existing categories used: 1"));

    let raw = fs::read_to_string(data.path().join("data").join("categories.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["categories"].as_array().unwrap().len(), 1);
}

#[test]
fn import_fail_fast_keeps_file() {
    let data = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let csv = write_csv(input.path(), "Salary,income,5000,Job\nBroken,income\n");

    pocketbook(data.path())
        .arg("import")
        .arg(&csv)
        .arg("--fail-fast")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed row at line 3"));

    assert!(csv.exists());
}

#[test]
fn import_skips_malformed_rows_by_default() {
    let data = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let csv = write_csv(input.path(), "Salary,income,5000,Job\nBroken,sideways,1,Job\n");

    pocketbook(data.path())
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 1 malformed row(s)"))
        .stdout(predicate::str::contains("line 3"));
}

#[test]
fn import_missing_file_fails() {
    let data = TempDir::new().unwrap();

    pocketbook(data.path())
        .args(["import", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open import file"));
}

#[test]
fn delete_transaction() {
    let data = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let csv = write_csv(input.path(), "Coffee,outcome,4.5,Food\n");
    pocketbook(data.path()).arg("import").arg(&csv).assert().success();

    let stored = stored_transactions(data.path());
    let id = stored[0]["id"].as_str().unwrap().to_string();

    pocketbook(data.path())
        .args(["transaction", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted transaction"))
        .stdout(predicate::str::contains("Coffee"));

    assert!(stored_transactions(data.path()).is_empty());

    pocketbook(data.path())
        .args(["audit", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DELETE"));
}

#[test]
fn delete_unknown_transaction_fails() {
    let data = TempDir::new().unwrap();

    pocketbook(data.path())
        .args(["transaction", "delete", "txn-00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transaction not found"));
}

#[test]
fn config_shows_paths() {
    let data = TempDir::new().unwrap();

    pocketbook(data.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency symbol:    $"))
        .stdout(predicate::str::contains("transactions.json"));
}
