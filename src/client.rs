//! Thin API client over a transport: JSON decoding and status mapping.

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, QueryParams};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Cheap to clone; every store shares one transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        ApiClient { transport }
    }

    /// Execute and map any non-2xx status to [`ClientError::Status`].
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            query = %request.query.to_query_string(),
            "request"
        );
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                path,
                body: truncate(response.text(), 512),
            });
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: QueryParams) -> Result<T> {
        let response = self.send(ApiRequest::get(path).with_query(query)).await?;
        decode(&response)
    }

    /// PUT a JSON body. The response body is returned undecoded as a JSON value (or null when empty).
    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<serde_json::Value> {
        let body = serde_json::to_value(body)?;
        let response = self.send(ApiRequest::put(path, body)).await?;
        if response.body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        decode(&response)
    }

    /// GET a binary payload; headers are kept for the caller.
    pub async fn get_raw(&self, path: &str, query: QueryParams) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path).with_query(query)).await
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    Ok(serde_json::from_slice(&response.body)?)
}

fn truncate(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}
