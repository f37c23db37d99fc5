//! Session context: everything a front end needs, built in a fixed order and passed explicitly.

use crate::client::ApiClient;
use crate::config::{validate, ClientConfig};
use crate::error::{ClientError, Result};
use crate::layout::{AppSettings, LayoutService};
use crate::navigation::NavigationRegistry;
use crate::store::users::fetch_logged_user;
use crate::store::{EntityStore, ModelSchema, RecentEventStore, Record, StoreRegistry, User, UserCache};
use crate::transport::{ApiTransport, ReqwestTransport};
use std::sync::Arc;

#[derive(Clone)]
pub struct LabContext {
    pub config: Arc<ClientConfig>,
    pub client: ApiClient,
    /// The logged user.
    pub user: Arc<User>,
    pub navigation: Arc<NavigationRegistry>,
    pub users: Arc<UserCache>,
    pub stores: Arc<StoreRegistry>,
    pub recent_events: Arc<RecentEventStore>,
    pub layout: Arc<LayoutService>,
}

impl LabContext {
    /// Connect over HTTP with `config`.
    pub async fn bootstrap(config: ClientConfig) -> Result<Self> {
        validate(&config)?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport)).await
    }

    /// Bootstrap order: logged user, navigation tree, layout, then the stores that depend on them.
    /// A 403 from the first two steps becomes [`ClientError::Unauthenticated`].
    pub async fn with_transport(config: ClientConfig, transport: Arc<dyn ApiTransport>) -> Result<Self> {
        validate(&config)?;
        let client = ApiClient::new(transport);

        let user = fetch_logged_user(&client)
            .await
            .map_err(|e| require_login(e, &config))?;
        let navigation = NavigationRegistry::load(&client)
            .await
            .map_err(|e| require_login(e, &config))?;

        let layout = LayoutService::new(client.clone());
        if let Err(e) = layout.load().await {
            tracing::warn!(error = %e, "layout not loaded, using defaults");
        }

        let navigation = Arc::new(navigation);
        let users = Arc::new(UserCache::new(client.clone()));
        let stores = Arc::new(StoreRegistry::new(
            client.clone(),
            navigation.clone(),
            users.clone(),
            config.page_size,
        ));
        let recent_events = Arc::new(RecentEventStore::new(client.clone(), navigation.clone(), users.clone()));

        tracing::info!(user = %user.username, models = navigation.len(), "session ready");
        Ok(LabContext {
            config: Arc::new(config),
            client,
            user: Arc::new(user),
            navigation,
            users,
            stores,
            recent_events,
            layout: Arc::new(layout),
        })
    }

    pub fn store<R: Record>(&self, app_label: &str, model_name: &str) -> Result<Arc<EntityStore<R>>> {
        self.stores.get_or_create(app_label, model_name)
    }

    pub fn typed_store<S: ModelSchema>(&self) -> Result<Arc<EntityStore<S::Record>>> {
        self.stores.typed::<S>()
    }

    pub async fn settings(&self) -> Result<AppSettings> {
        AppSettings::fetch(&self.client).await
    }
}

fn require_login(e: ClientError, config: &ClientConfig) -> ClientError {
    if e.is_forbidden() {
        tracing::info!("session not authenticated");
        ClientError::Unauthenticated {
            login_url: config.login_url(),
        }
    } else {
        e
    }
}
