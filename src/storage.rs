//! Disk staging for uploaded content.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const UNNAMED_FILE: &str = "unnamed-file";

/// Stage uploaded bytes under `upload_dir` and hand back the stored path.
/// The client-supplied name is reduced to its base name, and a UUID
/// prefix keeps simultaneous uploads of the same name apart.
pub async fn stage(upload_dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("failed to create upload directory {}", upload_dir.display()))?;

    let base = sanitize_file_name(file_name);
    let path = upload_dir.join(format!("{}_{base}", Uuid::new_v4()));
    tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("failed to stage upload at {}", path.display()))?;

    Ok(path)
}

/// Inverse of `stage`'s naming scheme: drop the UUID prefix to recover
/// the name the uploader supplied. Paths that don't carry the prefix
/// fall through to their plain base name.
pub fn display_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNNAMED_FILE.to_string());

    match base.split_once('_') {
        Some((prefix, rest)) if !rest.is_empty() && Uuid::parse_str(prefix).is_ok() => {
            rest.to_string()
        }
        _ => base,
    }
}

/// Base name only, never a path. Blank names get a stand-in so the
/// stored file and the transfer header stay presentable.
fn sanitize_file_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNNAMED_FILE.to_string();
    }
    Path::new(trimmed)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNNAMED_FILE.to_string())
}
