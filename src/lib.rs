//! Lab inventory SDK: typed async stores over the inventory REST API.

pub mod client;
pub mod config;
pub mod error;
pub mod layout;
mod lock;
pub mod navigation;
pub mod response;
pub mod state;
pub mod store;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use layout::{AppSettings, LayoutPreferences, LayoutService, Theme};
pub use navigation::{ModelDescriptor, NavigationRegistry, Permissions};
pub use response::Paginated;
pub use state::LabContext;
pub use store::{
    DynamicRecord, Entity, EntityStore, HistoryRecord, HistoryRow, ListOutcome, ListRequest, ModelSchema, Pagination,
    Record, StoreRegistry, User, UserCache,
};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, Method, QueryParams, ReqwestTransport};
