use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    _data_dir: Option<tempfile::TempDir>,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server() -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let mut guard = spawn_server_in(data_dir.path(), 900)?;
    guard._data_dir = Some(data_dir);
    Ok(guard)
}

#[allow(dead_code)]
pub fn spawn_server_with_ttl(access_ttl_secs: u64) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let mut guard = spawn_server_in(data_dir.path(), access_ttl_secs)?;
    guard._data_dir = Some(data_dir);
    Ok(guard)
}

/// Spawns against an existing data directory, which stays on disk after the
/// guard drops. Restart tests reuse the directory across two guards.
pub fn spawn_server_in(data_dir: &Path, access_ttl_secs: u64) -> Result<ServerGuard> {
    let addr_file = data_dir.join("addr.txt");
    // A leftover addr file from an earlier run would be read before the
    // new server binds.
    let _ = std::fs::remove_file(&addr_file);
    let ttl = access_ttl_secs.to_string();

    let child = Command::new(env!("CARGO_BIN_EXE_shortify-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--access-ttl-secs",
            &ttl,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn shortify-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        _data_dir: None,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// How many refresh exchanges the server has seen, failed ones included.
#[allow(dead_code)]
pub fn refresh_count(base_url: &str) -> Result<u64> {
    let value: serde_json::Value = reqwest::blocking::get(format!("{}/debug/refresh-count", base_url))
        .context("fetch refresh count")?
        .json()
        .context("parse refresh count")?;
    value
        .get("count")
        .and_then(|v| v.as_u64())
        .context("count field missing")
}
