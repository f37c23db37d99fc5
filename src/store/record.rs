//! Record types held by stores.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A server record of one model. Implement for a struct to get a typed store,
/// or use [`DynamicRecord`] when the schema is only known at runtime.
pub trait Record: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    fn id(&self) -> u64;

    /// Id of the user that created the record, when the model tracks it.
    fn created_by(&self) -> Option<u64> {
        None
    }
}

/// Compile-time binding of a record type to its `(app_label, model_name)`.
pub trait ModelSchema: Send + Sync + 'static {
    const APP_LABEL: &'static str;
    const MODEL_NAME: &'static str;
    type Record: Record;
}

/// Untyped record: the JSON object exactly as served.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord(pub Map<String, Value>);

impl DynamicRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl Record for DynamicRecord {
    fn id(&self) -> u64 {
        self.0.get("id").and_then(as_id).unwrap_or_default()
    }

    fn created_by(&self) -> Option<u64> {
        self.0.get("created_by").and_then(as_id)
    }
}

/// Numeric id from a number, a numeric string, or an object carrying `id`.
fn as_id(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        Value::Object(obj) => obj.get("id").and_then(as_id),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A record as kept in a store's list, with client-side annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity<R> {
    pub record: R,
    /// Front-end route, `/{app_label}/{model_name}/{id}`.
    pub path: String,
    /// Resolved `created_by` user.
    pub user: Option<User>,
}
