mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Five failed logins lock the account; a later correct password still
/// answers 429 until the lockout expires. Skipped without a database.
#[tokio::test]
async fn repeated_failures_lock_the_account() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    if health.status() != StatusCode::OK {
        eprintln!("skipping lockout test: database unavailable");
        return Ok(());
    }

    let email = format!("lockout-{}@example.com", std::process::id());
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": email,
            "password": "Sufficient1"
        }))
        .send()
        .await?;
    if res.status() != StatusCode::CREATED {
        eprintln!("skipping lockout test: could not register user");
        return Ok(());
    }

    // Four wrong passwords: rejected but not locked
    for _ in 0..4 {
        let res = client
            .post(format!("{}/auth/login", server.base_url))
            .json(&json!({"email": email, "password": "Wrong-pass1"}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    // Fifth failure reaches the threshold
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"email": email, "password": "Wrong-pass1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Now even the correct password is locked out
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"email": email, "password": "Sufficient1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "ACCOUNT_LOCKED");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap_or_default()
            .contains("seconds"),
        "message should mention remaining seconds: {}",
        body
    );

    Ok(())
}

/// Failures below the threshold clear on a successful login
#[tokio::test]
async fn successful_login_clears_failure_count() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    if health.status() != StatusCode::OK {
        eprintln!("skipping lockout test: database unavailable");
        return Ok(());
    }

    let email = format!("clear-{}@example.com", std::process::id());
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": email,
            "password": "Sufficient1"
        }))
        .send()
        .await?;
    if res.status() != StatusCode::CREATED {
        eprintln!("skipping lockout test: could not register user");
        return Ok(());
    }

    for _ in 0..4 {
        let res = client
            .post(format!("{}/auth/login", server.base_url))
            .json(&json!({"email": email, "password": "Wrong-pass1"}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    // Success on the fifth try: counter never reached the threshold
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"email": email, "password": "Sufficient1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // And the slate is clean: one more wrong attempt is just attempt #1
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"email": email, "password": "Wrong-pass1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
