use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// A single JSON document persisted as one UTF-8 file.
///
/// Reads distinguish "could not read" from "could not parse" so callers can
/// decide how to recover. Writes replace the whole file at once: the payload
/// goes to a sibling temp file which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and deserialize the whole file.
    pub async fn read<T: DeserializeOwned>(&self) -> Result<T, ServiceError> {
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|source| ServiceError::StoreRead { path: self.path.clone(), source })?;
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::StoreParse { path: self.path.clone(), reason: e.to_string() })
    }

    /// Serialize `value` and atomically replace the file with it.
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(value).map_err(|e| ServiceError::Encode(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::Io(e.to_string()))?;
        }
        let tmp = self.path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp, data).await.map_err(|e| ServiceError::Io(e.to_string()))?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Io(e.to_string()));
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Remove the file; returns whether it existed.
    pub async fn remove(&self) -> Result<bool, ServiceError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tmp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("json_file_{}", uuid::Uuid::new_v4()))
            .join("doc.json")
    }

    #[tokio::test]
    async fn write_read_remove_cycle() -> Result<(), anyhow::Error> {
        let file = JsonFile::new(tmp_path());
        assert!(!file.exists().await);

        file.write(&json!([{"id": 1}])).await?;
        assert!(file.exists().await);
        let value: Value = file.read().await?;
        assert_eq!(value, json!([{"id": 1}]));

        assert!(file.remove().await?);
        assert!(!file.remove().await?);

        if let Some(dir) = file.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }

    #[tokio::test]
    async fn read_separates_missing_from_malformed() -> Result<(), anyhow::Error> {
        let file = JsonFile::new(tmp_path());
        let err = file.read::<Value>().await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreRead { .. }));

        if let Some(dir) = file.path().parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(file.path(), "{ not json").await?;
        let err = file.read::<Value>().await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreParse { .. }));

        if let Some(dir) = file.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }
}
