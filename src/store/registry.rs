//! Store registry: at most one store per model for the lifetime of a context.

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::lock;
use crate::navigation::{store_name, NavigationRegistry};
use crate::store::entity::EntityStore;
use crate::store::record::{DynamicRecord, ModelSchema, Record};
use crate::store::users::UserCache;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type AnyStore = Arc<dyn Any + Send + Sync>;

pub struct StoreRegistry {
    client: ApiClient,
    navigation: Arc<NavigationRegistry>,
    users: Arc<UserCache>,
    page_size: u32,
    /// Keyed by `"{app_label}-{model_name}"`.
    stores: RwLock<HashMap<String, AnyStore>>,
}

impl StoreRegistry {
    pub fn new(
        client: ApiClient,
        navigation: Arc<NavigationRegistry>,
        users: Arc<UserCache>,
        page_size: u32,
    ) -> Self {
        StoreRegistry {
            client,
            navigation,
            users,
            page_size,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Return the store for `(app_label, model_name)`, building and registering it on first use.
    ///
    /// Models missing from the navigation tree still get a store, bound to an empty descriptor.
    /// Fails only if the key is already registered with another record type.
    pub fn get_or_create<R: Record>(&self, app_label: &str, model_name: &str) -> Result<Arc<EntityStore<R>>> {
        let name = store_name(app_label, model_name);
        if let Some(existing) = lock::read(&self.stores).get(&name) {
            return downcast(&name, existing.clone());
        }

        let mut stores = lock::write(&self.stores);
        let entry = stores
            .entry(name.clone())
            .or_insert_with(|| {
                let model = self.navigation.lookup(app_label, model_name);
                tracing::debug!(store = %name, known = model.is_known(), "creating store");
                Arc::new(EntityStore::<R>::new(
                    model,
                    self.client.clone(),
                    self.users.clone(),
                    self.page_size,
                )) as AnyStore
            })
            .clone();
        downcast(&name, entry)
    }

    /// Typed store for a statically declared model.
    pub fn typed<S: ModelSchema>(&self) -> Result<Arc<EntityStore<S::Record>>> {
        self.get_or_create::<S::Record>(S::APP_LABEL, S::MODEL_NAME)
    }

    /// Store over raw JSON records, for models without a compile-time schema.
    pub fn dynamic(&self, app_label: &str, model_name: &str) -> Result<Arc<EntityStore<DynamicRecord>>> {
        self.get_or_create::<DynamicRecord>(app_label, model_name)
    }

    /// Existing store only; `None` if absent or registered with another record type.
    pub fn get<R: Record>(&self, app_label: &str, model_name: &str) -> Option<Arc<EntityStore<R>>> {
        let name = store_name(app_label, model_name);
        let existing = lock::read(&self.stores).get(&name)?.clone();
        downcast(&name, existing).ok()
    }

    pub fn contains(&self, app_label: &str, model_name: &str) -> bool {
        lock::read(&self.stores).contains_key(&store_name(app_label, model_name))
    }

    pub fn len(&self) -> usize {
        lock::read(&self.stores).len()
    }

    pub fn is_empty(&self) -> bool {
        lock::read(&self.stores).is_empty()
    }
}

fn downcast<R: Record>(name: &str, store: AnyStore) -> Result<Arc<EntityStore<R>>> {
    store
        .downcast::<EntityStore<R>>()
        .map_err(|_| ClientError::StoreTypeMismatch(name.to_string()))
}
