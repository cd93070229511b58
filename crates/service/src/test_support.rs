#![cfg(test)]
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::users::seed::{parse_collection, SeedSource};
use crate::users::UserCollection;

/// Fresh users file path inside its own temp directory.
pub fn tmp_users_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("svc_users_{}", uuid::Uuid::new_v4()))
        .join("users.json")
}

pub fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("json object")
}

/// In-memory seed that counts how often it was asked.
pub struct StaticSeed {
    payload: Value,
    fetches: AtomicUsize,
}

impl StaticSeed {
    pub fn new(payload: Value) -> Arc<Self> {
        Arc::new(Self { payload, fetches: AtomicUsize::new(0) })
    }

    pub fn payload(&self) -> Value {
        self.payload.clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeedSource for StaticSeed {
    async fn fetch(&self) -> Result<UserCollection, ServiceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        parse_collection(self.payload.clone())
    }
}

pub struct FailingSeed;

#[async_trait]
impl SeedSource for FailingSeed {
    async fn fetch(&self) -> Result<UserCollection, ServiceError> {
        Err(ServiceError::Fetch("seed unreachable".into()))
    }
}
