//! File-backed users collection with lazy remote seeding.

pub mod record;
pub mod seed;
pub mod store;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub use record::{UserCollection, UserRecord};
pub use seed::{HttpSeedSource, SeedSource};
pub use store::FileUserStore;

/// Acknowledgment for a delete-by-id. `removed` is false for unknown ids,
/// which are not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAck {
    pub id: i64,
    pub removed: bool,
}

/// Result of removing the whole backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAllOutcome {
    Deleted,
    NoSuchStore,
}

impl DeleteAllOutcome {
    /// Wire status string.
    pub fn status(self) -> &'static str {
        match self {
            Self::Deleted => "success",
            Self::NoSuchStore => "No such file",
        }
    }
}

/// Trait abstraction for users storage, used by the HTTP layer.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<UserCollection, ServiceError>;
    async fn create(&self, fields: Map<String, Value>) -> Result<UserRecord, ServiceError>;
    async fn update(&self, id: i64, fields: Map<String, Value>) -> Result<UserCollection, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<UserAck, ServiceError>;
    async fn delete_all(&self) -> Result<DeleteAllOutcome, ServiceError>;
}
