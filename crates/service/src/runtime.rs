//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Warn on a missing assets dir; create the users file's directory.
pub async fn ensure_env(assets_dir: &str, users_file: &str) -> anyhow::Result<()> {
    common::env::ensure_env(assets_dir, users_file).await
}
