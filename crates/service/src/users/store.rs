use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::storage::json_file::JsonFile;
use crate::users::record::{next_id, UserCollection, UserRecord};
use crate::users::seed::SeedSource;
use crate::users::{DeleteAllOutcome, UserAck, UserRepository};

/// Users collection persisted as one JSON array file.
///
/// Every operation reads the whole file, mutates it in memory and writes the
/// whole file back. A missing or unparsable file is replaced by data from the
/// seed source on the next read. All operations share one async mutex, so
/// concurrent requests never interleave their read-modify-write cycles.
pub struct FileUserStore {
    file: JsonFile,
    seed: Arc<dyn SeedSource>,
    lock: Mutex<()>,
}

impl FileUserStore {
    pub fn new<P: Into<PathBuf>>(path: P, seed: Arc<dyn SeedSource>) -> Arc<Self> {
        Arc::new(Self { file: JsonFile::new(path), seed, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    /// Read the collection, seeding the file first when it is missing or corrupt.
    pub async fn load(&self) -> Result<UserCollection, ServiceError> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    async fn load_locked(&self) -> Result<UserCollection, ServiceError> {
        match self.file.read::<UserCollection>().await {
            Ok(users) => Ok(users),
            Err(e) if e.is_recoverable_read() => {
                warn!(path = %self.file.path().display(), reason = %e, "users file unusable, seeding from remote");
                let users = self.seed.fetch().await?;
                self.file.write(&users).await?;
                info!(path = %self.file.path().display(), count = users.len(), "users file seeded");
                Ok(users)
            }
            Err(e) => Err(e),
        }
    }

    async fn persist(&self, users: &UserCollection) -> Result<(), ServiceError> {
        self.file.write(users).await?;
        debug!(path = %self.file.path().display(), count = users.len(), "users file written");
        Ok(())
    }

    pub async fn create(&self, fields: Map<String, Value>) -> Result<UserRecord, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load_locked().await?;
        let mut user = UserRecord::new(fields);
        user.set_id(next_id(&users)?);
        users.push(user.clone());
        self.persist(&users).await?;
        Ok(user)
    }

    /// Merge `fields` into the user with `id`. The id itself never changes.
    /// An unknown id leaves the collection as it was.
    pub async fn update(&self, id: i64, fields: Map<String, Value>) -> Result<UserCollection, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load_locked().await?;
        if let Some(user) = users.iter_mut().find(|u| u.id() == Some(id)) {
            user.merge(fields);
            user.set_id(id);
        } else {
            debug!(id, "update for unknown user id is a no-op");
        }
        self.persist(&users).await?;
        Ok(users)
    }

    /// Remove the user with `id`. Unknown ids succeed with `removed == false`.
    pub async fn delete_by_id(&self, id: i64) -> Result<UserAck, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load_locked().await?;
        let before = users.len();
        users.retain(|u| u.id() != Some(id));
        let removed = users.len() != before;
        self.persist(&users).await?;
        Ok(UserAck { id, removed })
    }

    /// Remove the backing file. The next read seeds it again.
    pub async fn delete_all(&self) -> Result<DeleteAllOutcome, ServiceError> {
        let _guard = self.lock.lock().await;
        if self.file.remove().await? {
            info!(path = %self.file.path().display(), "users file removed");
            Ok(DeleteAllOutcome::Deleted)
        } else {
            Ok(DeleteAllOutcome::NoSuchStore)
        }
    }
}

#[async_trait]
impl UserRepository for FileUserStore {
    async fn list(&self) -> Result<UserCollection, ServiceError> { self.load().await }
    async fn create(&self, fields: Map<String, Value>) -> Result<UserRecord, ServiceError> { self.create(fields).await }
    async fn update(&self, id: i64, fields: Map<String, Value>) -> Result<UserCollection, ServiceError> { self.update(id, fields).await }
    async fn delete_by_id(&self, id: i64) -> Result<UserAck, ServiceError> { self.delete_by_id(id).await }
    async fn delete_all(&self) -> Result<DeleteAllOutcome, ServiceError> { self.delete_all().await }
}
