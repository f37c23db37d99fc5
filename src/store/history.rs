//! Record history and its grouped, one-row-per-field form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field_name: String,
    #[serde(default)]
    pub field_name_verbose: Option<String>,
    #[serde(default)]
    pub new_value: Value,
    #[serde(default)]
    pub old_value: Value,
}

/// One history entry. The first entry of a record is `Created`; the rest are `Changed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity_type", rename_all = "lowercase")]
pub enum HistoryRecord {
    Created {
        timestamp: String,
        #[serde(default)]
        activity_user: Option<u64>,
        #[serde(default)]
        activity_user_pretty: String,
    },
    Changed {
        timestamp: String,
        #[serde(default)]
        activity_user: Option<u64>,
        #[serde(default)]
        activity_user_pretty: String,
        #[serde(default)]
        changes: Vec<FieldChange>,
    },
}

impl HistoryRecord {
    pub fn timestamp(&self) -> &str {
        match self {
            HistoryRecord::Created { timestamp, .. } | HistoryRecord::Changed { timestamp, .. } => timestamp,
        }
    }
}

/// A single changed field, tagged with the save event it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldChangeRow {
    pub timestamp: String,
    pub activity_user: Option<u64>,
    pub activity_user_pretty: String,
    /// 0-based index of the source change event, counted after the creation entry.
    pub group: usize,
    pub field_name: String,
    pub field_name_verbose: Option<String>,
    pub new_value: Value,
    pub old_value: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HistoryRow {
    Record(HistoryRecord),
    FieldChange(FieldChangeRow),
}

impl HistoryRow {
    pub fn group(&self) -> Option<usize> {
        match self {
            HistoryRow::Record(_) => None,
            HistoryRow::FieldChange(row) => Some(row.group),
        }
    }
}

/// Flatten history: the first entry passes through, each later `Changed` entry becomes one row per field.
pub fn group_history(history: &[HistoryRecord]) -> Vec<HistoryRow> {
    let Some((first, rest)) = history.split_first() else {
        return Vec::new();
    };
    let mut rows = vec![HistoryRow::Record(first.clone())];
    for (group, record) in rest.iter().enumerate() {
        match record {
            HistoryRecord::Changed {
                timestamp,
                activity_user,
                activity_user_pretty,
                changes,
            } => rows.extend(changes.iter().map(|change| {
                HistoryRow::FieldChange(FieldChangeRow {
                    timestamp: timestamp.clone(),
                    activity_user: *activity_user,
                    activity_user_pretty: activity_user_pretty.clone(),
                    group,
                    field_name: change.field_name.clone(),
                    field_name_verbose: change.field_name_verbose.clone(),
                    new_value: change.new_value.clone(),
                    old_value: change.old_value.clone(),
                })
            })),
            HistoryRecord::Created { .. } => rows.push(HistoryRow::Record(record.clone())),
        }
    }
    rows
}
