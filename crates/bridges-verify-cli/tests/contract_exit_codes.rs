#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("bridges-verify").unwrap();
    cmd.env("BRIDGES_VERIFY_API_URL", format!("{}/verify", server.uri()))
        .env("BRIDGES_VERIFY_TIMEOUT", "5")
        .env_remove("RUST_LOG");
    cmd
}

async fn mount_details(server: &MockServer, token: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/verify/{token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn participant_details() -> serde_json::Value {
    json!({
        "success": true,
        "requestType": "Participant",
        "verificationLevel": "30 Day",
        "jobPlacement": {"employerName": "Acme", "jobTitle": "Clerk"}
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_show_missing_token_exits_link_error() {
    let server = MockServer::start().await;

    cli(&server)
        .args(["show", "https://verify.example.org/"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid Link"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_show_renders_participant_form() {
    let server = MockServer::start().await;
    mount_details(&server, "TOK1", participant_details()).await;

    cli(&server)
        .args(["show", "/p/TOK1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Employer:   Acme"))
        .stdout(predicate::str::contains("Milestone:  30 Day"))
        .stdout(predicate::str::contains("(none selected)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_employer_command_on_participant_link() {
    let server = MockServer::start().await;
    mount_details(&server, "TOK1", participant_details()).await;

    cli(&server)
        .args(["employer", "/p/TOK1", "--employed", "true"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("bridges-verify participant"));
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_participant_without_file_is_validation_error() {
    let server = MockServer::start().await;
    mount_details(&server, "TOK1", participant_details()).await;

    cli(&server)
        .args(["participant", "/p/TOK1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please upload a document."));

    let posts = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_participant_submits_document() {
    let server = MockServer::start().await;
    mount_details(&server, "TOK1", participant_details()).await;
    Mock::given(method("POST"))
        .and(path("/verify/TOK1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let file = dir.path().join("paystub.pdf");
    fs::write(&file, b"%PDF-1.4 stub").unwrap();

    cli(&server)
        .args(["participant", "/p/TOK1", "--last-work-date", "2026-01-15", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification submitted"));

    let post = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["fileName"], "paystub.pdf");
    assert_eq!(body["fileType"], "application/pdf");
    assert_eq!(body["lastWorkDate"], "2026-01-15");
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_employer_rejection_exits_service_code() {
    let server = MockServer::start().await;
    mount_details(
        &server,
        "EMP9",
        json!({"success": true, "requestType": "Employer"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/verify/EMP9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Link expired"})),
        )
        .mount(&server)
        .await;

    cli(&server)
        .args(["employer", "/e/EMP9", "--employed", "false"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Link expired"));
}

#[tokio::test(flavor = "multi_thread")]
async fn contract_service_unavailable_exits_transport_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify/TOK1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    cli(&server)
        .args(["show", "/p/TOK1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Connection Error"));
}
