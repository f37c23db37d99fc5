//! The transport trait every HTTP backend implements.

use async_trait::async_trait;

use super::{ApiRequest, ApiResponse};
use crate::error::ClientError;

/// Executes a single request. Non-2xx answers are returned as responses, not errors;
/// status mapping happens in [`crate::client::ApiClient`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}
