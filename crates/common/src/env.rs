//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Warn when the static assets directory is missing and create the parent
/// directory of the users file.
pub async fn ensure_env(assets_dir: &str, users_file: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(assets_dir).await.is_err() {
        warn!(%assets_dir, "static assets directory not found; assets will 404 and only the shell is served");
    }
    if let Some(data_dir) = Path::new(users_file).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_parent_of_users_file() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_env_{}", std::process::id()));
        let users = root.join("nested").join("users.json");
        ensure_env("/nonexistent-assets", users.to_str().unwrap_or_default()).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
