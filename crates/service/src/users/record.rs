use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub const ID_FIELD: &str = "id";

/// One user: an open JSON object whose only known field is the integer `id`.
/// Every other field passes through untouched, in its original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

/// The whole users file, in order.
pub type UserCollection = Vec<UserRecord>;

impl UserRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Integer id, if the record carries one.
    pub fn id(&self) -> Option<i64> {
        self.0.get(ID_FIELD).and_then(Value::as_i64)
    }

    pub fn set_id(&mut self, id: i64) {
        self.0.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// Shallow merge: fields in `patch` overwrite or extend this record.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.0.insert(key, value);
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for UserRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// `1 + max(id)`, or `1` for a collection without integer ids.
/// Freed ids are only reused when they were the maximum.
pub fn next_id(users: &[UserRecord]) -> Result<i64, ServiceError> {
    let max = users.iter().filter_map(UserRecord::id).max().unwrap_or(0);
    max.checked_add(1).ok_or(ServiceError::IdExhausted(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> UserRecord {
        serde_json::from_value(value).expect("object")
    }

    #[test]
    fn next_id_uses_max_not_len() {
        let users = vec![record(json!({"id": 7})), record(json!({"id": 3}))];
        assert_eq!(next_id(&users).ok(), Some(8));
        assert_eq!(next_id(&[]).ok(), Some(1));
        assert_eq!(next_id(&[record(json!({"name": "no id"}))]).ok(), Some(1));
    }

    #[test]
    fn next_id_refuses_to_wrap_past_max() {
        let users = vec![record(json!({"id": 1})), record(json!({"id": i64::MAX}))];
        let err = next_id(&users).unwrap_err();
        assert!(matches!(err, ServiceError::IdExhausted(max) if max == i64::MAX));
        assert_eq!(next_id(&[record(json!({"id": i64::MAX - 1}))]).ok(), Some(i64::MAX));
    }

    #[test]
    fn merge_keeps_field_order_and_overwrites() {
        let mut user = record(json!({"id": 1, "name": "A", "email": "a@x"}));
        let patch = json!({"name": "Z", "phone": "1"});
        user.merge(patch.as_object().cloned().unwrap_or_default());
        let keys: Vec<_> = user.fields().keys().cloned().collect();
        assert_eq!(keys, ["id", "name", "email", "phone"]);
        assert_eq!(user.get("name"), Some(&json!("Z")));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(serde_json::from_value::<UserRecord>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<UserCollection>(json!({"id": 1})).is_err());
    }
}
