//! Model descriptors as served by `/api/navigation/` and its per-model metadata endpoints.

use crate::lock;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub add: bool,
    #[serde(default)]
    pub change: bool,
    #[serde(default)]
    pub view: bool,
}

/// Raw navigation tree entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub id: u64,
    pub app_label: String,
    #[serde(default)]
    pub app_verbose_name: Option<String>,
    pub model_class_name: String,
    #[serde(default)]
    pub model_verbose_name: Option<String>,
    #[serde(default)]
    pub model_verbose_plural: Option<String>,
    #[serde(default)]
    pub permissions: Permissions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub name: String,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
}

/// One change-view fieldset. Wire form is `[title, {"fields": [...]}]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFieldset", into = "RawFieldset")]
pub struct Fieldset {
    pub title: Option<String>,
    pub fields: Vec<FieldDetail>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FieldsetBody {
    #[serde(default)]
    fields: Vec<FieldDetail>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawFieldset(Option<String>, FieldsetBody);

impl From<RawFieldset> for Fieldset {
    fn from(raw: RawFieldset) -> Self {
        Fieldset {
            title: raw.0,
            fields: raw.1.fields,
        }
    }
}

impl From<Fieldset> for RawFieldset {
    fn from(f: Fieldset) -> Self {
        RawFieldset(f.title, FieldsetBody { fields: f.fields })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Lazily fetched field metadata. Every fetcher overwrites its own slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelFields {
    pub listview_fields_frozen: Vec<FieldDetail>,
    pub listview_fields: Vec<FieldDetail>,
    pub changeview_fields: Vec<Fieldset>,
    pub readonly_fields: Vec<String>,
    pub actions: Vec<ActionDescriptor>,
    pub search_introspection: Option<serde_json::Value>,
}

impl ModelFields {
    pub fn is_empty(&self) -> bool {
        self.listview_fields_frozen.is_empty()
            && self.listview_fields.is_empty()
            && self.changeview_fields.is_empty()
            && self.readonly_fields.is_empty()
            && self.actions.is_empty()
            && self.search_introspection.is_none()
    }
}

/// Metadata for one backend entity type. Identity is fixed at construction;
/// `fields` is filled in place by the store's metadata fetchers.
#[derive(Debug)]
pub struct ModelDescriptor {
    /// Content type id. `None` for the fallback descriptor of an unknown model.
    pub id: Option<u64>,
    pub app_label: String,
    pub model_class_name: String,
    pub app_verbose_name: Option<String>,
    pub model_verbose_name: Option<String>,
    pub model_verbose_plural: Option<String>,
    pub permissions: Permissions,
    fields: RwLock<ModelFields>,
}

impl ModelDescriptor {
    pub fn from_entry(entry: NavigationEntry) -> Self {
        ModelDescriptor {
            id: Some(entry.id),
            app_label: entry.app_label,
            model_class_name: entry.model_class_name,
            app_verbose_name: entry.app_verbose_name,
            model_verbose_name: entry.model_verbose_name,
            model_verbose_plural: entry.model_verbose_plural,
            permissions: entry.permissions,
            fields: RwLock::new(ModelFields::default()),
        }
    }

    /// Descriptor for a model the navigation tree does not list: no permissions, no fields.
    pub fn unknown(app_label: &str, model_name: &str) -> Self {
        ModelDescriptor {
            id: None,
            app_label: app_label.to_string(),
            model_class_name: model_name.to_string(),
            app_verbose_name: None,
            model_verbose_name: None,
            model_verbose_plural: None,
            permissions: Permissions::default(),
            fields: RwLock::new(ModelFields::default()),
        }
    }

    pub fn is_known(&self) -> bool {
        self.id.is_some()
    }

    pub fn model_name(&self) -> String {
        self.model_class_name.to_lowercase()
    }

    /// Registry key, `"{app_label}-{model_name}"`.
    pub fn store_name(&self) -> String {
        store_name(&self.app_label, &self.model_class_name)
    }

    /// Collection endpoint without trailing slash, e.g. `/api/lab/plasmid`.
    pub fn api_endpoint(&self) -> String {
        format!("/api/{}/{}", self.app_label, self.model_name())
    }

    /// Front-end route of one record, e.g. `/lab/plasmid/7`.
    pub fn item_path(&self, id: u64) -> String {
        format!("/{}/{}/{}", self.app_label, self.model_name(), id)
    }

    /// Snapshot of the current field metadata.
    pub fn fields(&self) -> ModelFields {
        lock::read(&self.fields).clone()
    }

    pub(crate) fn update_fields<F: FnOnce(&mut ModelFields)>(&self, f: F) {
        f(&mut lock::write(&self.fields));
    }
}

pub fn store_name(app_label: &str, model_name: &str) -> String {
    format!("{}-{}", app_label, model_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fieldset_decodes_from_tuple_form() {
        let raw = serde_json::json!([
            "Sequence",
            {"fields": [{"name": "sequence", "verbose_name": "Sequence", "field_type": "TextField"}]}
        ]);
        let fs: Fieldset = serde_json::from_value(raw).unwrap();
        assert_eq!(fs.title.as_deref(), Some("Sequence"));
        assert_eq!(fs.fields[0].name, "sequence");
    }

    #[test]
    fn unknown_descriptor_has_nothing() {
        let d = ModelDescriptor::unknown("lab", "Ghost");
        assert!(!d.is_known());
        assert_eq!(d.permissions, Permissions::default());
        assert!(d.fields().is_empty());
        assert_eq!(d.store_name(), "lab-ghost");
    }
}
