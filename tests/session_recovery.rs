mod common;

use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use shortify::api::{ApiClient, RegisterRequest};
use shortify::error::ApiError;
use shortify::store::SessionStore;

fn open_client(server: &common::ServerGuard, home: &Path) -> Result<ApiClient> {
    let store = SessionStore::open(home.to_path_buf()).context("open store")?;
    ApiClient::open(server.base_url.as_str(), store).context("open client")
}

fn registered_client(server: &common::ServerGuard) -> Result<(tempfile::TempDir, ApiClient)> {
    let home = tempfile::tempdir().context("create client home")?;
    let client = open_client(server, home.path())?;
    client
        .register(&RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            country: "UK".to_string(),
            password: "hunter22".to_string(),
        })
        .context("register")?;
    Ok((home, client))
}

/// Rewrites session.json fields in place, leaving the rest of the record
/// alone. A client opened afterwards starts from the tampered session.
fn tamper_session(home: &Path, fields: &[(&str, &str)]) -> Result<()> {
    let path = home.join("session.json");
    let bytes = std::fs::read(&path).context("read session.json")?;
    let mut record: serde_json::Value =
        serde_json::from_slice(&bytes).context("parse session.json")?;
    for (key, value) in fields {
        record[*key] = serde_json::Value::String(value.to_string());
    }
    std::fs::write(&path, serde_json::to_vec_pretty(&record).context("serialize")?)
        .context("rewrite session.json")?;
    Ok(())
}

#[test]
fn expired_access_token_recovers_with_a_single_refresh() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, _seed) = registered_client(&server)?;

    tamper_session(home.path(), &[("access_token", "stale-access")])?;
    let client = open_client(&server, home.path())?;

    // The 401 is absorbed: refresh, replay, plain success for the caller.
    let profile = client.profile().context("profile after tampering")?;
    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(common::refresh_count(&server.base_url)?, 1);

    // The replacement token is durable: a fresh client uses it directly.
    let client = open_client(&server, home.path())?;
    client.profile().context("profile with refreshed token")?;
    assert_eq!(common::refresh_count(&server.base_url)?, 1);
    Ok(())
}

#[test]
fn concurrent_requests_share_one_refresh() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, _seed) = registered_client(&server)?;

    tamper_session(home.path(), &[("access_token", "stale-access")])?;
    let client = Arc::new(open_client(&server, home.path())?);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = Arc::clone(&client);
        handles.push(thread::spawn(move || client.profile()));
    }
    for handle in handles {
        let profile = handle.join().expect("worker panicked").expect("profile");
        assert_eq!(profile.email, "ada@example.com");
    }

    // Every thread hit the 401, but only the leader exchanged.
    assert_eq!(common::refresh_count(&server.base_url)?, 1);
    Ok(())
}

#[test]
fn rejected_refresh_destroys_the_session() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, _seed) = registered_client(&server)?;

    tamper_session(
        home.path(),
        &[("access_token", "stale-access"), ("refresh_token", "stale-refresh")],
    )?;
    let client = open_client(&server, home.path())?;

    let err = client.profile().unwrap_err();
    assert!(matches!(err, ApiError::AuthorizationRejected), "got {err:?}");

    // Gone in memory and on disk.
    assert!(client.current_session().is_none());
    let store = SessionStore::open(home.path().to_path_buf())?;
    assert!(store.load_session()?.is_none());

    // Follow-up calls fail fast without another exchange.
    let err = client.profile().unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated), "got {err:?}");
    assert_eq!(common::refresh_count(&server.base_url)?, 1);
    Ok(())
}

#[test]
fn concurrent_recovery_failure_rejects_every_caller() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, _seed) = registered_client(&server)?;

    tamper_session(
        home.path(),
        &[("access_token", "stale-access"), ("refresh_token", "stale-refresh")],
    )?;
    let client = Arc::new(open_client(&server, home.path())?);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = Arc::clone(&client);
        handles.push(thread::spawn(move || client.profile()));
    }
    for handle in handles {
        let err = handle.join().expect("worker panicked").unwrap_err();
        // Leader and queued waiters see the rejection; anyone arriving
        // after the teardown sees the signed-out state.
        assert!(
            matches!(err, ApiError::AuthorizationRejected | ApiError::Unauthenticated),
            "got {err:?}"
        );
    }
    assert_eq!(common::refresh_count(&server.base_url)?, 1);
    Ok(())
}

#[test]
fn replay_that_fails_again_surfaces_unauthenticated() -> Result<()> {
    // Zero-second tokens: every access token is dead on arrival, so the
    // refreshed replay 401s as well. That must end the attempt, not loop.
    let server = common::spawn_server_with_ttl(0)?;
    let (_home, client) = registered_client(&server)?;

    let err = client.profile().unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated), "got {err:?}");
    assert_eq!(common::refresh_count(&server.base_url)?, 1);
    Ok(())
}

#[test]
fn requests_without_a_session_fail_fast() -> Result<()> {
    let server = common::spawn_server()?;
    let home = tempfile::tempdir()?;
    let client = open_client(&server, home.path())?;

    let err = client.profile().unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated), "got {err:?}");
    assert_eq!(common::refresh_count(&server.base_url)?, 0);
    Ok(())
}

#[test]
fn sessions_survive_process_restarts() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, client) = registered_client(&server)?;
    drop(client);

    let client = open_client(&server, home.path())?;
    let profile = client.profile().context("profile after reopen")?;
    assert_eq!(profile.name, "Ada");
    assert_eq!(common::refresh_count(&server.base_url)?, 0);
    Ok(())
}

#[test]
fn logout_clears_locally_even_when_already_revoked() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, client) = registered_client(&server)?;

    // A second client sharing the session revokes the refresh token first.
    let other = open_client(&server, home.path())?;
    other.logout();
    assert!(other.current_session().is_none());

    // Server-side the token is already dead; logout still signs out.
    client.logout();
    assert!(client.current_session().is_none());

    let store = SessionStore::open(home.path().to_path_buf())?;
    assert!(store.load_session()?.is_none());
    Ok(())
}

#[test]
fn logout_clears_locally_when_the_server_is_gone() -> Result<()> {
    let server = common::spawn_server()?;
    let (home, client) = registered_client(&server)?;
    drop(server);

    client.logout();
    assert!(client.current_session().is_none());

    let store = SessionStore::open(home.path().to_path_buf())?;
    assert!(store.load_session()?.is_none());
    Ok(())
}
