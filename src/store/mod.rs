//! Per-model client stores and the registry that hands them out.

pub mod action;
pub mod entity;
pub mod events;
pub mod history;
pub mod record;
pub mod registry;
pub mod state;
pub mod users;

pub use action::{filename_from_disposition, ActionFile};
pub use entity::EntityStore;
pub use events::{AnnotatedEvent, RecentEvent, RecentEventStore};
pub use history::{group_history, FieldChange, FieldChangeRow, HistoryRecord, HistoryRow};
pub use record::{DynamicRecord, Entity, ModelSchema, Record, User};
pub use registry::StoreRegistry;
pub use state::{ListOutcome, ListRequest, Pagination, SearchOptions};
pub use users::UserCache;
