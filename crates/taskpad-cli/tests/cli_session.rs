//! End-to-end tests for the `taskpad` binary against a mock task service.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn taskpad(home: &TempDir, server: &MockServer) -> Command {
    let mut cmd = cargo_bin_cmd!("taskpad");
    cmd.env("TASKPAD_HOME", home.path())
        .env("TASKPAD_API_URL", server.uri())
        .env("TASKPAD_PASSWORD", "pw")
        .env_remove("RUST_LOG");
    cmd
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_session_and_authorizes_list() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/task"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "1", "title": "Buy milk", "isCompleted": true},
            {"_id": "2", "title": "Walk dog", "isCompleted": false}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["login", "-u", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice"));

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(home.path().join("auth.json")).unwrap())
            .unwrap();
    assert_eq!(record["token"], "abc123");
    assert_eq!(record["username"], "alice");

    taskpad(&home, &server)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 1  Buy milk"))
        .stdout(predicate::str::contains("[ ] 2  Walk dog"))
        .stdout(predicate::str::contains("1 of 2 done"));
}

#[tokio::test]
async fn test_login_remembers_username() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    mount_login(&server).await;

    taskpad(&home, &server)
        .args(["login", "-u", "alice"])
        .assert()
        .success();
    taskpad(&home, &server).arg("logout").assert().success();

    // No -u: falls back to the remembered name instead of prompting
    taskpad(&home, &server)
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice"));

    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(home.path().join("config.json")).unwrap())
            .unwrap();
    assert_eq!(config["last_username"], "alice");
    // Environment overrides are not written back
    assert_eq!(config["api_url"], "http://localhost:3000");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/task"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["login", "-u", "alice"])
        .assert()
        .success();
    taskpad(&home, &server)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    taskpad(&home, &server)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));

    taskpad(&home, &server)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("taskpad login"));

    let requests = server.received_requests().await.unwrap();
    let list = requests.iter().find(|r| r.url.path() == "/task").unwrap();
    assert!(list.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_failed_login_reports_error() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["login", "-u", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));

    assert!(!home.path().join("auth.json").exists());
}

#[tokio::test]
async fn test_add_and_toggle() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .and(body_json(json!({"title": "Buy oat milk", "isCompleted": false})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(
            {"_id": "9", "title": "Buy oat milk", "isCompleted": false}
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "9", "title": "Buy oat milk", "isCompleted": false}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/task/9"))
        .and(body_json(json!({"isCompleted": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"_id": "9", "title": "Buy oat milk", "isCompleted": true}
        )))
        .expect(1)
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["login", "-u", "alice"])
        .assert()
        .success();
    taskpad(&home, &server)
        .args(["add", "Buy", "oat", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added [ ] 9  Buy oat milk"));
    taskpad(&home, &server)
        .args(["toggle", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 9  Buy oat milk"));
}

#[tokio::test]
async fn test_blank_title_is_rejected_locally() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    taskpad(&home, &server)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task title must not be empty"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

async fn log_in(home: &TempDir, server: &MockServer) {
    mount_login(server).await;
    taskpad(home, server)
        .args(["login", "-u", "alice"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_signup_prompts_for_new_name_and_logs_in() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.json"),
        r#"{"last_username":"alice"}"#,
    )
    .unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({"username": "carol", "password": "pw"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    // The remembered "alice" is not reused; the name comes from the prompt
    taskpad(&home, &server)
        .arg("signup")
        .write_stdin("carol\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Account created. Logged in as carol"));

    taskpad(&home, &server)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as carol (just now)"));

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(home.path().join("auth.json")).unwrap())
            .unwrap();
    assert_eq!(record["token"], "fresh");
}

#[tokio::test]
async fn test_edit_renames_task() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    log_in(&home, &server).await;
    Mock::given(method("PATCH"))
        .and(path("/task/9"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({"title": "Buy oat milk"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"_id": "9", "title": "Buy oat milk", "isCompleted": false}
        )))
        .expect(1)
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["edit", "9", "Buy", "oat", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated [ ] 9  Buy oat milk"));
}

#[tokio::test]
async fn test_rm_and_delete_alias() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    log_in(&home, &server).await;
    Mock::given(method("DELETE"))
        .and(path("/task/9"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["rm", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 9"));
    taskpad(&home, &server)
        .args(["delete", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 9"));
}

#[tokio::test]
async fn test_done_and_undone_send_target_state() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    log_in(&home, &server).await;
    Mock::given(method("PATCH"))
        .and(path("/task/9"))
        .and(body_json(json!({"isCompleted": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"_id": "9", "title": "Buy milk", "isCompleted": true}
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/task/9"))
        .and(body_json(json!({"isCompleted": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"_id": "9", "title": "Buy milk", "isCompleted": false}
        )))
        .expect(1)
        .mount(&server)
        .await;

    taskpad(&home, &server)
        .args(["done", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 9  Buy milk"));
    taskpad(&home, &server)
        .args(["undone", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] 9  Buy milk"));
}

#[tokio::test]
async fn test_list_json_prints_records() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    log_in(&home, &server).await;
    Mock::given(method("GET"))
        .and(path("/task"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "1", "id": "1", "title": "Buy milk", "isCompleted": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = taskpad(&home, &server)
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let tasks: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        tasks,
        json!([{"id": "1", "title": "Buy milk", "isCompleted": true}])
    );
}

#[tokio::test]
async fn test_config_shows_effective_settings() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    let output = taskpad(&home, &server)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(server.uri()))
        .stdout(predicate::str::contains("config file:"))
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let config_line = text
        .lines()
        .find(|l| l.starts_with("config file:"))
        .unwrap();
    assert!(config_line.ends_with("config.json"));
    assert!(config_line.contains(&home.path().display().to_string()));
}
