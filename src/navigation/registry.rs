//! Navigation registry: the model tree fetched once at bootstrap.

use crate::client::ApiClient;
use crate::error::Result;
use crate::navigation::types::{store_name, ModelDescriptor, NavigationEntry};
use crate::transport::QueryParams;
use std::collections::HashMap;
use std::sync::Arc;

pub const NAVIGATION_ENDPOINT: &str = "/api/navigation/";

#[derive(Debug, Default)]
pub struct NavigationRegistry {
    models: Vec<Arc<ModelDescriptor>>,
    by_key: HashMap<String, Arc<ModelDescriptor>>,
}

impl NavigationRegistry {
    pub fn from_entries(entries: Vec<NavigationEntry>) -> Self {
        let mut models = Vec::with_capacity(entries.len());
        let mut by_key = HashMap::with_capacity(entries.len());
        for entry in entries {
            let model = Arc::new(ModelDescriptor::from_entry(entry));
            by_key.insert(model.store_name(), model.clone());
            models.push(model);
        }
        NavigationRegistry { models, by_key }
    }

    /// Fetch `/api/navigation/`.
    pub async fn load(client: &ApiClient) -> Result<Self> {
        let entries: Vec<NavigationEntry> = client.get_json(NAVIGATION_ENDPOINT, QueryParams::new()).await?;
        tracing::debug!(models = entries.len(), "navigation loaded");
        Ok(Self::from_entries(entries))
    }

    pub fn models(&self) -> &[Arc<ModelDescriptor>] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Exact lookup; `model_name` is compared case-insensitively.
    pub fn find(&self, app_label: &str, model_name: &str) -> Option<Arc<ModelDescriptor>> {
        self.by_key.get(&store_name(app_label, model_name)).cloned()
    }

    /// Like [`find`](Self::find) but never fails: unknown models get an empty descriptor.
    pub fn lookup(&self, app_label: &str, model_name: &str) -> Arc<ModelDescriptor> {
        self.find(app_label, model_name).unwrap_or_else(|| {
            tracing::debug!(app_label, model_name, "model not in navigation tree");
            Arc::new(ModelDescriptor::unknown(app_label, model_name))
        })
    }

    pub fn by_content_type(&self, id: u64) -> Option<Arc<ModelDescriptor>> {
        self.models.iter().find(|m| m.id == Some(id)).cloned()
    }

    pub fn content_type_ids(&self) -> Vec<u64> {
        self.models.iter().filter_map(|m| m.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Permissions;

    fn entry(id: u64, app: &str, model: &str) -> NavigationEntry {
        NavigationEntry {
            id,
            app_label: app.into(),
            app_verbose_name: None,
            model_class_name: model.into(),
            model_verbose_name: None,
            model_verbose_plural: None,
            permissions: Permissions { add: true, change: true, view: true },
        }
    }

    #[test]
    fn lookup_matches_model_name_case_insensitively() {
        let reg = NavigationRegistry::from_entries(vec![entry(12, "lab", "Plasmid")]);
        let m = reg.lookup("lab", "plasmid");
        assert_eq!(m.id, Some(12));
        assert!(m.permissions.view);
        assert!(Arc::ptr_eq(&m, &reg.lookup("lab", "PLASMID")));
    }

    #[test]
    fn lookup_of_unknown_model_is_empty_not_error() {
        let reg = NavigationRegistry::from_entries(vec![entry(12, "lab", "Plasmid")]);
        let m = reg.lookup("lab", "antibody");
        assert!(!m.is_known());
        assert!(!m.permissions.add && !m.permissions.change && !m.permissions.view);
        assert!(m.fields().is_empty());
    }
}
