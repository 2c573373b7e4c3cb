use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn contacts_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("contacts");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/contacts.sqlite"

[server]
host = "127.0.0.1"
port = 5000
"#,
        root.display()
    );

    let config_path = config_dir.join("contacts.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_contacts(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = contacts_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("PORT")
        .env_remove("CONTACTS_DB_PATH")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run contacts binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn list_json(config_path: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["list"];
    full.extend_from_slice(args);
    let (stdout, stderr, success) = run_contacts(config_path, &full);
    assert!(success, "list failed: stdout={}, stderr={}", stdout, stderr);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_contacts(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data").join("contacts.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_contacts(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_contacts(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_add_and_list() {
    let (_tmp, config_path) = setup_test_env();
    run_contacts(&config_path, &["init"]);

    let (stdout, stderr, success) =
        run_contacts(&config_path, &["add", "Ana", "ana@x.com", "1234567890"]);
    assert!(success, "add failed: stdout={}, stderr={}", stdout, stderr);
    let created: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(created["id"], 1);
    assert_eq!(created["email"], "ana@x.com");

    let page = list_json(&config_path, &[]);
    assert_eq!(page["total"], 1);
    assert_eq!(page["contacts"][0]["name"], "Ana");
}

#[test]
fn test_add_duplicate_email_fails() {
    let (_tmp, config_path) = setup_test_env();

    run_contacts(&config_path, &["add", "Ana", "ana@x.com", "1234567890"]);
    let (_, stderr, success) =
        run_contacts(&config_path, &["add", "Bo", "ana@x.com", "2222222222"]);
    assert!(!success, "duplicate email should fail");
    assert!(
        stderr.contains("Email already registered."),
        "unexpected stderr: {}",
        stderr
    );

    let page = list_json(&config_path, &[]);
    assert_eq!(page["total"], 1);
}

#[test]
fn test_add_invalid_phone_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_contacts(&config_path, &["add", "Ana", "ana@x.com", "12345"]);
    assert!(!success);
    assert!(stderr.contains("Phone must be 10 digits."));
}

#[test]
fn test_list_pages() {
    let (_tmp, config_path) = setup_test_env();

    for n in 1..=12 {
        let email = format!("p{}@x.com", n);
        let phone = format!("{:010}", n);
        let (_, stderr, success) =
            run_contacts(&config_path, &["add", "Person", &email, &phone]);
        assert!(success, "add {} failed: {}", n, stderr);
    }

    let page = list_json(&config_path, &["--page", "2", "--limit", "5"]);
    assert_eq!(page["total"], 12);
    let ids: Vec<i64> = page["contacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);

    let page = list_json(&config_path, &["--page", "0"]);
    assert_eq!(page["contacts"].as_array().unwrap().len(), 10);
}

#[test]
fn test_update_and_delete() {
    let (_tmp, config_path) = setup_test_env();
    run_contacts(&config_path, &["add", "Ana", "ana@x.com", "1234567890"]);

    let (stdout, stderr, success) = run_contacts(
        &config_path,
        &["update", "1", "Ana K", "ana@x.com", "1234567890"],
    );
    assert!(success, "update failed: stdout={}, stderr={}", stdout, stderr);
    let updated: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(updated["name"], "Ana K");

    let (_, _, success) = run_contacts(&config_path, &["delete", "1"]);
    assert!(success, "first delete should succeed");

    let (_, stderr, success) = run_contacts(&config_path, &["delete", "1"]);
    assert!(!success, "second delete should fail");
    assert!(stderr.contains("Contact not found"));
}

#[test]
fn test_missing_config_uses_defaults_with_env_db() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("env.sqlite");

    let output = Command::new(contacts_binary())
        .current_dir(tmp.path())
        .arg("--config")
        .arg(tmp.path().join("absent.toml"))
        .arg("init")
        .env("CONTACTS_DB_PATH", &db_path)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(db_path.exists());
}
