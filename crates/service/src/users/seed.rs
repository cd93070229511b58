use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::errors::ServiceError;
use crate::users::record::UserCollection;

/// Where an empty or corrupt users file gets its initial data from.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch(&self) -> Result<UserCollection, ServiceError>;
}

/// Seed source backed by an HTTP endpoint returning a JSON array of objects.
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<UserCollection, ServiceError> {
        let users = match common::seed::fetch_json(self.url()).await {
            Ok(json) => parse_collection(json),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &users {
            warn!(seed_url = self.url(), error = %e, "seed fetch failed");
        }
        users
    }
}

/// Accept only an array of JSON objects.
pub fn parse_collection(value: Value) -> Result<UserCollection, ServiceError> {
    serde_json::from_value(value)
        .map_err(|e| ServiceError::Fetch(format!("seed payload is not an array of objects: {e}")))
}
