use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{ClientConfig, Session, SessionRecord};

const HOME_ENV: &str = "SHORTIFY_HOME";
const STORE_DIR: &str = ".shortify";

/// Durable client-side state: `config.json` plus the single `session.json`
/// record. All session writes go through here; session.json is only ever
/// touched by this type.
#[derive(Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn default_root() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(HOME_ENV)
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }
        let home = std::env::var("HOME").context("HOME not set (set SHORTIFY_HOME instead)")?;
        Ok(Path::new(&home).join(STORE_DIR))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_root()?)
    }

    pub fn open(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("create state dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn read_config(&self) -> Result<ClientConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(ClientConfig::default());
        }
        let bytes = fs::read(&path).context("read config.json")?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            return Err(anyhow!("unsupported config version {}", cfg.version));
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }

    /// Loads the persisted session, if any. A missing file or a record that
    /// no longer parses counts as signed out; the next login rewrites it.
    pub fn load_session(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).context("read session.json")?;
        let Ok(record) = serde_json::from_slice::<SessionRecord>(&bytes) else {
            return Ok(None);
        };
        if record.version != 1 {
            return Err(anyhow!("unsupported session file version {}", record.version));
        }
        Ok(record.into_session())
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let record = SessionRecord::from_session(session);
        let bytes = serde_json::to_vec_pretty(&record).context("serialize session")?;
        write_atomic(&self.session_path(), &bytes).context("write session.json")?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("remove session file {}", path.display()))?;
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
