//! User cache: memoized lookups of users referenced by other records.

use crate::client::ApiClient;
use crate::error::Result;
use crate::lock;
use crate::store::record::User;
use crate::transport::QueryParams;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::RwLock;
use tokio::sync::Mutex;

pub const USER_ENDPOINT: &str = "/api/common/user/";
pub const LOGGED_USER_ENDPOINT: &str = "/api/common/user/logged/";

#[derive(Default)]
struct UserCacheState {
    items: Vec<User>,
    last_synced: Option<DateTime<Utc>>,
}

/// Append-only cache. Never issues a request for an id it already holds.
pub struct UserCache {
    client: ApiClient,
    state: RwLock<UserCacheState>,
    /// Serializes fetches so two callers cannot both miss on the same id.
    fetch_lock: Mutex<()>,
}

impl UserCache {
    pub fn new(client: ApiClient) -> Self {
        UserCache {
            client,
            state: RwLock::new(UserCacheState::default()),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Make sure every id in `user_ids` is cached, fetching only the missing ones in one request.
    pub async fn get_items(&self, user_ids: &[u64]) -> Result<()> {
        let wanted = dedup(user_ids);
        if wanted.is_empty() {
            return Ok(());
        }
        let _guard = self.fetch_lock.lock().await;
        let missing = self.missing(&wanted);
        if missing.is_empty() {
            return Ok(());
        }

        let mut query = QueryParams::new();
        query.push_all("user_id", &missing);
        let fetched: Vec<User> = self
            .client
            .get_json(USER_ENDPOINT, query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, ids = ?missing, "user fetch failed"))?;

        let mut state = lock::write(&self.state);
        let held: HashSet<u64> = state.items.iter().map(|u| u.id).collect();
        state.items.extend(fetched.into_iter().filter(|u| !held.contains(&u.id)));
        state.last_synced = Some(Utc::now());
        tracing::debug!(requested = missing.len(), cached = state.items.len(), "users cached");
        Ok(())
    }

    /// Ids from `wanted` not yet in the cache, order preserved.
    fn missing(&self, wanted: &[u64]) -> Vec<u64> {
        let state = lock::read(&self.state);
        let held: HashSet<u64> = state.items.iter().map(|u| u.id).collect();
        wanted.iter().copied().filter(|id| !held.contains(id)).collect()
    }

    pub fn find_by_id(&self, id: u64) -> Option<User> {
        lock::read(&self.state).items.iter().find(|u| u.id == id).cloned()
    }

    pub fn items(&self) -> Vec<User> {
        lock::read(&self.state).items.clone()
    }

    pub fn item_count(&self) -> usize {
        lock::read(&self.state).items.len()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        lock::read(&self.state).last_synced
    }
}

fn dedup(ids: &[u64]) -> Vec<u64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// `GET /api/common/user/logged/`.
pub async fn fetch_logged_user(client: &ApiClient) -> Result<User> {
    client.get_json(LOGGED_USER_ENDPOINT, QueryParams::new()).await
}

#[cfg(test)]
mod tests {
    use super::dedup;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedup(&[]).is_empty());
    }
}
