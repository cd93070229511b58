use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// `{status}` body returned by the bulk delete endpoint.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub status: &'static str,
}

/// `{status, id}` body returned by create and delete-by-id.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IdReply {
    pub status: &'static str,
    pub id: i64,
}

impl IdReply {
    pub fn success(id: i64) -> Self {
        Self { status: "success", id }
    }
}
