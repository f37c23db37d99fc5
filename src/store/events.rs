//! Recent admin events of the logged user, annotated with model and user.

use crate::client::ApiClient;
use crate::error::Result;
use crate::lock;
use crate::navigation::{ModelDescriptor, NavigationRegistry};
use crate::store::record::User;
use crate::store::users::UserCache;
use crate::transport::QueryParams;
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};

pub const RECENT_EVENTS_ENDPOINT: &str = "/api/common/user/logged/recent_events/";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentEvent {
    /// Primary key of the edited object. The admin log stores it as text.
    #[serde(default, deserialize_with = "object_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub representation: Option<String>,
    /// 1 = added, 2 = changed, 3 = deleted.
    #[serde(default)]
    pub action_flag: Option<u8>,
    #[serde(default)]
    pub action_time: Option<String>,
    #[serde(default)]
    pub user: Option<u64>,
    #[serde(default)]
    pub content_type: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept the object id as a string or a bare number.
fn object_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("invalid object id: {}", other))),
    }
}

#[derive(Clone, Debug)]
pub struct AnnotatedEvent {
    pub event: RecentEvent,
    pub model: Option<Arc<ModelDescriptor>>,
    pub user: Option<User>,
}

#[derive(Default)]
struct EventState {
    items: Vec<AnnotatedEvent>,
    last_synced: Option<DateTime<Utc>>,
}

pub struct RecentEventStore {
    client: ApiClient,
    navigation: Arc<NavigationRegistry>,
    users: Arc<UserCache>,
    state: RwLock<EventState>,
}

impl RecentEventStore {
    pub fn new(client: ApiClient, navigation: Arc<NavigationRegistry>, users: Arc<UserCache>) -> Self {
        RecentEventStore {
            client,
            navigation,
            users,
            state: RwLock::new(EventState::default()),
        }
    }

    /// Fetch recent events across every navigable model, optionally limited to `user`'s own.
    pub async fn get_items(&self, user: Option<&User>) -> Result<usize> {
        let mut query = QueryParams::new();
        query
            .push_opt("user_id", user.map(|u| u.id))
            .push_all("content_type_id", self.navigation.content_type_ids());
        let events: Vec<RecentEvent> = self
            .client
            .get_json(RECENT_EVENTS_ENDPOINT, query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "recent events fetch failed"))?;

        let user_ids: Vec<u64> = events.iter().filter_map(|e| e.user).collect();
        self.users.get_items(&user_ids).await?;

        let items: Vec<AnnotatedEvent> = events
            .into_iter()
            .map(|event| AnnotatedEvent {
                model: event.content_type.and_then(|id| self.navigation.by_content_type(id)),
                user: event.user.and_then(|id| self.users.find_by_id(id)),
                event,
            })
            .collect();
        let count = items.len();
        let mut state = lock::write(&self.state);
        state.items = items;
        state.last_synced = Some(Utc::now());
        Ok(count)
    }

    pub fn items(&self) -> Vec<AnnotatedEvent> {
        lock::read(&self.state).items.clone()
    }

    pub fn item_count(&self) -> usize {
        lock::read(&self.state).items.len()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        lock::read(&self.state).last_synced
    }
}
