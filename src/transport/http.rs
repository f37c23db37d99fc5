//! `reqwest`-backed transport with session cookie and CSRF header.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::time::Duration;

use super::{ApiRequest, ApiResponse, ApiTransport, Method};
use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError};

pub const CSRF_HEADER: &str = "X-CSRFToken";

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.csrf_token {
            headers.insert(CSRF_HEADER, header_value("csrf_token", token)?);
        }
        if let Some(session) = &config.session_id {
            let mut cookie = format!("sessionid={}", session);
            if let Some(token) = &config.csrf_token {
                cookie.push_str(&format!("; csrftoken={}", token));
            }
            headers.insert(COOKIE, header_value("session_id", &cookie)?);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(ReqwestTransport {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn header_value(field: &'static str, raw: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(raw).map_err(|_| {
        ClientError::Config(ConfigError::Invalid {
            var: field,
            value: raw.to_string(),
        })
    })
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.into(), &url);
        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect::<Vec<_>>();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, headers, body })
    }
}
