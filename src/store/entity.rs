//! Per-model store: list, detail, history, metadata and actions against one REST collection.

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::lock;
use crate::navigation::{ActionDescriptor, FieldDetail, Fieldset, ModelDescriptor};
use crate::response::Paginated;
use crate::store::action::ActionFile;
use crate::store::history::{group_history, HistoryRecord, HistoryRow};
use crate::store::record::{Entity, Record};
use crate::store::state::{ListOutcome, ListRequest, Pagination, SearchOptions};
use crate::store::users::UserCache;
use crate::transport::QueryParams;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

struct StoreState<R> {
    pagination: Pagination,
    items: Vec<Entity<R>>,
    last_fetched_item: Option<R>,
    item_history: Vec<HistoryRecord>,
    search: SearchOptions,
    last_synced: Option<DateTime<Utc>>,
    virgin: bool,
}

pub struct EntityStore<R: Record> {
    model: Arc<ModelDescriptor>,
    client: ApiClient,
    users: Arc<UserCache>,
    state: RwLock<StoreState<R>>,
    /// Sequence number of the latest `list_items` call.
    list_seq: AtomicU64,
}

impl<R: Record> EntityStore<R> {
    pub fn new(model: Arc<ModelDescriptor>, client: ApiClient, users: Arc<UserCache>, page_size: u32) -> Self {
        EntityStore {
            model,
            client,
            users,
            state: RwLock::new(StoreState {
                pagination: Pagination::new(page_size),
                items: Vec::new(),
                last_fetched_item: None,
                item_history: Vec::new(),
                search: SearchOptions::default(),
                last_synced: None,
                virgin: true,
            }),
            list_seq: AtomicU64::new(0),
        }
    }

    pub fn model(&self) -> &Arc<ModelDescriptor> {
        &self.model
    }

    pub fn store_name(&self) -> String {
        self.model.store_name()
    }

    pub fn pagination(&self) -> Pagination {
        lock::read(&self.state).pagination
    }

    pub fn items(&self) -> Vec<Entity<R>> {
        lock::read(&self.state).items.clone()
    }

    pub fn last_fetched_item(&self) -> Option<R> {
        lock::read(&self.state).last_fetched_item.clone()
    }

    pub fn item_history(&self) -> Vec<HistoryRecord> {
        lock::read(&self.state).item_history.clone()
    }

    pub fn search(&self) -> SearchOptions {
        lock::read(&self.state).search.clone()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        lock::read(&self.state).last_synced
    }

    /// True until the first successful `list_items`.
    pub fn is_virgin(&self) -> bool {
        lock::read(&self.state).virgin
    }

    pub fn set_ordering(&self, ordering: Option<String>) {
        lock::write(&self.state).search.ordering = ordering.filter(|o| !o.is_empty());
    }

    pub fn set_advanced_search(&self, enabled: bool) {
        lock::write(&self.state).search.advanced_enabled = enabled;
    }

    pub fn set_own_records(&self, enabled: bool) {
        lock::write(&self.state).search.own_records = enabled;
    }

    fn report(&self, op: &'static str, e: &ClientError) {
        tracing::error!(store = %self.model.store_name(), op, error = %e, "store operation failed");
    }

    fn detail_path(&self, id: u64) -> String {
        format!("{}/{}/", self.model.api_endpoint(), id)
    }

    fn navigation_path(&self, suffix: &str) -> Result<String> {
        let id = self
            .model
            .id
            .ok_or_else(|| ClientError::UnknownModel(self.model.store_name()))?;
        Ok(format!("/api/navigation/{}/{}/", id, suffix))
    }

    fn last_fetched_id(&self) -> Result<u64> {
        lock::read(&self.state)
            .last_fetched_item
            .as_ref()
            .map(R::id)
            .ok_or(ClientError::NoItemLoaded)
    }

    /// Fetch one page of the collection and replace `items` with it.
    ///
    /// A response that settles after a newer call was issued is dropped and reported
    /// as [`ListOutcome::Superseded`]; on error the previous state is left as it was.
    pub async fn list_items(&self, request: ListRequest) -> Result<ListOutcome> {
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let (page, page_size, search) = {
            let state = lock::read(&self.state);
            let mut search = state.search.clone();
            if let Some(query) = request.query {
                search.query = query;
            }
            (
                request.page.unwrap_or(state.pagination.current_page).max(1),
                request.page_size.unwrap_or(state.pagination.items_per_page).max(1),
                search,
            )
        };

        let mut query = QueryParams::new();
        query
            .push("page", page)
            .push("limit", page_size)
            .push("search", &search.query)
            .push_opt("ordering", search.ordering.as_deref());
        if search.advanced_enabled {
            query.push("q", 1);
        }
        if search.own_records {
            query.push("own_records", 1);
        }
        query.extend(request.extra_params);

        let endpoint = format!("{}/", self.model.api_endpoint());
        let data: Paginated<R> = self
            .client
            .get_json(&endpoint, query)
            .await
            .inspect_err(|e| self.report("list_items", e))?;

        let creator_ids: Vec<u64> = data.results.iter().filter_map(R::created_by).collect();
        if !creator_ids.is_empty() {
            self.users
                .get_items(&creator_ids)
                .await
                .inspect_err(|e| self.report("list_items", e))?;
        }
        let items: Vec<Entity<R>> = data
            .results
            .into_iter()
            .map(|record| Entity {
                path: self.model.item_path(record.id()),
                user: record.created_by().and_then(|id| self.users.find_by_id(id)),
                record,
            })
            .collect();

        let mut state = lock::write(&self.state);
        if self.list_seq.load(Ordering::SeqCst) != seq {
            tracing::warn!(store = %self.model.store_name(), seq, "discarding stale list response");
            return Ok(ListOutcome::Superseded);
        }
        state.items = items;
        state.pagination.apply(page, page_size, data.count);
        state.search = search;
        state.last_synced = Some(Utc::now());
        state.virgin = false;
        Ok(ListOutcome::Applied(state.pagination))
    }

    /// Fetch one record, keep it as `last_fetched_item`, then load its read-only fields.
    pub async fn get_item(&self, id: u64) -> Result<R> {
        let item: R = self
            .client
            .get_json(&self.detail_path(id), QueryParams::new())
            .await
            .inspect_err(|e| self.report("get_item", e))?;
        lock::write(&self.state).last_fetched_item = Some(item.clone());
        self.get_item_readonly_fields().await?;
        Ok(item)
    }

    pub async fn get_item_readonly_fields(&self) -> Result<Vec<String>> {
        let path = format!("{}readonly_fields/", self.detail_path(self.last_fetched_id()?));
        let fields: Vec<String> = self
            .client
            .get_json(&path, QueryParams::new())
            .await
            .inspect_err(|e| self.report("get_item_readonly_fields", e))?;
        self.model.update_fields(|f| f.readonly_fields = fields.clone());
        Ok(fields)
    }

    pub async fn get_item_history(&self) -> Result<Vec<HistoryRecord>> {
        let path = format!("{}history/", self.detail_path(self.last_fetched_id()?));
        let history: Vec<HistoryRecord> = self
            .client
            .get_json(&path, QueryParams::new())
            .await
            .inspect_err(|e| self.report("get_item_history", e))?;
        lock::write(&self.state).item_history = history.clone();
        Ok(history)
    }

    /// History of `last_fetched_item` with each change event expanded to one row per field.
    pub async fn get_item_history_grouped(&self) -> Result<Vec<HistoryRow>> {
        let history = self.get_item_history().await?;
        Ok(group_history(&history))
    }

    /// Frozen and regular list-view columns.
    pub async fn list_view_fields(&self) -> Result<(Vec<FieldDetail>, Vec<FieldDetail>)> {
        let path = self.navigation_path("listview_fields")?;
        let (frozen, fields): (Vec<FieldDetail>, Vec<FieldDetail>) = self
            .client
            .get_json(&path, QueryParams::new())
            .await
            .inspect_err(|e| self.report("list_view_fields", e))?;
        self.model.update_fields(|f| {
            f.listview_fields_frozen = frozen.clone();
            f.listview_fields = fields.clone();
        });
        Ok((frozen, fields))
    }

    pub async fn change_view_fields(&self) -> Result<Vec<Fieldset>> {
        let path = self.navigation_path("changeview_fields")?;
        let fieldsets: Vec<Fieldset> = self
            .client
            .get_json(&path, QueryParams::new())
            .await
            .inspect_err(|e| self.report("change_view_fields", e))?;
        self.model.update_fields(|f| f.changeview_fields = fieldsets.clone());
        Ok(fieldsets)
    }

    pub async fn search_introspection(&self) -> Result<serde_json::Value> {
        let path = self.navigation_path("advanced_search_introspection")?;
        let spec: serde_json::Value = self
            .client
            .get_json(&path, QueryParams::new())
            .await
            .inspect_err(|e| self.report("search_introspection", e))?;
        self.model.update_fields(|f| f.search_introspection = Some(spec.clone()));
        Ok(spec)
    }

    pub async fn actions(&self) -> Result<Vec<ActionDescriptor>> {
        let path = self.navigation_path("action_list")?;
        let actions: Vec<ActionDescriptor> = self
            .client
            .get_json(&path, QueryParams::new())
            .await
            .inspect_err(|e| self.report("actions", e))?;
        self.model.update_fields(|f| f.actions = actions.clone());
        Ok(actions)
    }

    /// PUT `payload` to `last_fetched_item`. Local state is not touched; re-fetch to observe the result.
    pub async fn save_item<P: Serialize + ?Sized>(&self, payload: &P) -> Result<()> {
        let path = self.detail_path(self.last_fetched_id()?);
        self.client
            .put_json(&path, payload)
            .await
            .inspect_err(|e| self.report("save_item", e))?;
        Ok(())
    }

    /// Run a model action over `selected_ids` and return the file it produces.
    pub async fn submit_action(
        &self,
        action_name: &str,
        selected_ids: &[u64],
        search_query: Option<&str>,
    ) -> Result<ActionFile> {
        let path = self.navigation_path("action")?;
        let mut query = QueryParams::new();
        query
            .push("action_name", action_name)
            .push_all("id", selected_ids)
            .push_opt("search", search_query.filter(|s| !s.is_empty()));
        let response = self
            .client
            .get_raw(&path, query)
            .await
            .inspect_err(|e| self.report("submit_action", e))?;
        ActionFile::from_response(response).inspect_err(|e| self.report("submit_action", e))
    }
}
