use super::*;

fn users_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("users.json")
}

fn links_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("links.json")
}

pub(super) fn load_users_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<String, ServerUser>> {
    if !users_path(data_dir).exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(users_path(data_dir)).context("read users.json")?;
    let list: Vec<ServerUser> = serde_json::from_slice(&bytes).context("parse users.json")?;
    Ok(list.into_iter().map(|u| (u.id.clone(), u)).collect())
}

pub(super) fn persist_users_to_disk(
    data_dir: &std::path::Path,
    users: &HashMap<String, ServerUser>,
) -> Result<()> {
    let mut list: Vec<ServerUser> = users.values().cloned().collect();
    list.sort_by(|a, b| a.email.cmp(&b.email));
    let bytes = serde_json::to_vec_pretty(&list).context("serialize users")?;
    write_atomic_overwrite(&users_path(data_dir), &bytes).context("write users.json")
}

pub(super) fn load_links_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<String, StoredLink>> {
    if !links_path(data_dir).exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(links_path(data_dir)).context("read links.json")?;
    let list: Vec<StoredLink> = serde_json::from_slice(&bytes).context("parse links.json")?;
    Ok(list.into_iter().map(|l| (l.code.clone(), l)).collect())
}

pub(super) fn persist_links_to_disk(
    data_dir: &std::path::Path,
    links: &HashMap<String, StoredLink>,
) -> Result<()> {
    let mut list: Vec<StoredLink> = links.values().cloned().collect();
    list.sort_by(|a, b| a.code.cmp(&b.code));
    let bytes = serde_json::to_vec_pretty(&list).context("serialize links")?;
    write_atomic_overwrite(&links_path(data_dir), &bytes).context("write links.json")
}

pub(super) fn write_atomic_overwrite(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
