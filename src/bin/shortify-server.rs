use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;

#[path = "shortify_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "shortify_server/util.rs"]
mod util;
use self::util::*;
#[path = "shortify_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "shortify_server/disk.rs"]
mod disk;
use self::disk::*;
#[path = "shortify_server/auth_handlers.rs"]
mod auth_handlers;
use self::auth_handlers::*;
#[path = "shortify_server/link_handlers.rs"]
mod link_handlers;
use self::link_handlers::*;
#[path = "shortify_server/analytics.rs"]
mod analytics;
use self::analytics::*;

#[derive(Clone, Debug)]
struct Subject {
    user_id: String,
}

#[derive(Clone)]
struct AppState {
    data_dir: PathBuf,
    access_ttl_secs: u64,

    users: Arc<RwLock<HashMap<String, ServerUser>>>,
    email_index: Arc<RwLock<HashMap<String, String>>>,

    links: Arc<RwLock<HashMap<String, StoredLink>>>,

    // Token secrets never touch disk; only their hashes are held, in
    // memory, so a restart signs everyone out.
    access_tokens: Arc<RwLock<HashMap<String, IssuedAccess>>>,
    refresh_tokens: Arc<RwLock<HashMap<String, String>>>,

    refresh_count: Arc<AtomicU64>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct ServerUser {
    id: String,
    name: String,
    email: String,
    country: String,
    password_hash: String,
    created_at: String,
}

#[derive(Clone, Debug)]
struct IssuedAccess {
    user_id: String,
    expires_at_unix: i64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct StoredLink {
    id: String,
    owner_id: String,
    url: String,
    code: String,
    created_at_unix: i64,

    #[serde(default)]
    clicks: Vec<Click>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct Click {
    at_unix: i64,
    country: String,

    // "mobile" or "desktop"
    device: String,

    referrer: String,
}

#[derive(Parser)]
#[command(name = "shortify-server")]
#[command(about = "Shortify backend (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory
    #[arg(long, default_value = "./shortify-data")]
    data_dir: PathBuf,

    /// Access token lifetime in seconds
    #[arg(long, default_value_t = 900)]
    access_ttl_secs: u64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let users = load_users_from_disk(&args.data_dir).context("load users")?;
    let links = load_links_from_disk(&args.data_dir).context("load links")?;

    let email_index: HashMap<String, String> = users
        .values()
        .map(|u| (u.email.clone(), u.id.clone()))
        .collect();

    let state = Arc::new(AppState {
        data_dir: args.data_dir,
        access_ttl_secs: args.access_ttl_secs,
        users: Arc::new(RwLock::new(users)),
        email_index: Arc::new(RwLock::new(email_index)),
        links: Arc::new(RwLock::new(links)),
        access_tokens: Arc::new(RwLock::new(HashMap::new())),
        refresh_tokens: Arc::new(RwLock::new(HashMap::new())),
        refresh_count: Arc::new(AtomicU64::new(0)),
    });

    let authed = authed_router(state.clone());

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/debug/refresh-count", get(refresh_count))
        .route("/:code", get(follow_link))
        .merge(authed)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("shortify-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/url-shortner/", post(create_link).get(list_links))
        .route("/url-shortner/delete", post(delete_links))
        .route("/url-shortner/analytics", get(analytics_report))
        .layer(middleware::from_fn_with_state(state, require_bearer))
}

async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };

    let Ok(value) = value.to_str() else {
        return unauthorized();
    };

    let Some(token) = value.strip_prefix("Bearer ") else {
        return unauthorized();
    };

    let token_hash = hash_token(token);

    let issued = {
        let access = state.access_tokens.read().await;
        access.get(&token_hash).cloned()
    };
    let Some(issued) = issued else {
        return unauthorized();
    };

    if now_unix() >= issued.expires_at_unix {
        let mut access = state.access_tokens.write().await;
        access.remove(&token_hash);
        return unauthorized();
    }

    let mut req = req;
    req.extensions_mut().insert(Subject {
        user_id: issued.user_id,
    });
    next.run(req).await
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn refresh_count(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.refresh_count.load(Ordering::SeqCst),
    }))
}
