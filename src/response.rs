//! Response envelopes returned by the backend.

use serde::{Deserialize, Serialize};

/// Paginated list envelope: `{count, next, previous, results}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

