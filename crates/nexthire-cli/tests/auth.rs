
use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{
    can_bind_localhost, profile_body, read_credential, seed_credential, temp_home,
};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_stores_credential_with_selected_role() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "role": "job_seeker"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-123"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .args([
            "login",
            "--email",
            "ada@example.com",
            "--role",
            "job_seeker",
            "--password",
            "password1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful!"))
        .stdout(predicate::str::contains("Location: /job-seeker/dashboard"));

    let stored = read_credential(home.path()).unwrap();
    assert_eq!(stored["token"]["value"], "t-123");
    assert_eq!(stored["role"]["value"], "job_seeker");
}

#[tokio::test]
async fn test_login_reads_password_from_stdin() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_partial_json(json!({"password": "from-stdin-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-1"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .env_remove("NEXTHIRE_PASSWORD")
        .args(["login", "--email", "ada@example.com", "--role", "recruiter"])
        .write_stdin("from-stdin-1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Location: /recruiter/dashboard"));
}

#[tokio::test]
async fn test_login_failure_shows_backend_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .args([
            "login",
            "--email",
            "ada@example.com",
            "--role",
            "recruiter",
            "--password",
            "password1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    assert!(read_credential(home.path()).is_none());
}

#[tokio::test]
async fn test_login_fails_when_credential_cannot_be_saved() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    std::fs::create_dir(home.path().join("credentials.json")).unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .args([
            "login",
            "--email",
            "ada@example.com",
            "--role",
            "recruiter",
            "--password",
            "password1",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Login successful!").not())
        .stderr(predicate::str::contains("Could not save login"));
}

#[test]
fn test_login_validates_before_sending() {
    let home = temp_home();

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", "http://127.0.0.1:9")
        .args([
            "login",
            "--email",
            "ada",
            "--role",
            "recruiter",
            "--password",
            "password1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email address"));
}

#[tokio::test]
async fn test_register_points_to_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/register"))
        .and(body_partial_json(json!({"name": "Ada", "role": "recruiter"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .args([
            "register",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--role",
            "recruiter",
            "--password",
            "password1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Registration successful! Please login.",
        ))
        .stdout(predicate::str::contains("Location: /login"));

    assert!(read_credential(home.path()).is_none());
}

#[test]
fn test_logout_clears_credential_and_is_idempotent() {
    let home = temp_home();
    seed_credential(home.path(), "abc", "recruiter");

    for _ in 0..2 {
        cargo_bin_cmd!("nexthire")
            .env("NEXTHIRE_HOME", home.path())
            .env("NEXTHIRE_BACKEND_URL", "http://127.0.0.1:9")
            .arg("logout")
            .assert()
            .success()
            .stdout(predicate::str::contains("Logged out."))
            .stdout(predicate::str::contains("Location: /login"));
    }

    assert!(!home.path().join("credentials.json").exists());
}

#[test]
fn test_whoami_without_credential() {
    let home = temp_home();

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[tokio::test]
async fn test_whoami_shows_profile() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_credential(home.path(), "abc", "recruiter");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("recruiter")))
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Ada Lovelace"))
        .stdout(predicate::str::contains("Member since: 2024-03-01"));
}

#[tokio::test]
async fn test_whoami_reports_unavailable_identity() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_credential(home.path(), "abc", "job_seeker");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&server)
        .await;

    cargo_bin_cmd!("nexthire")
        .env("NEXTHIRE_HOME", home.path())
        .env("NEXTHIRE_BACKEND_URL", server.uri())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Role: Job Seeker"))
        .stdout(predicate::str::contains("Identity unavailable"));

    assert!(home.path().join("credentials.json").exists());
}
