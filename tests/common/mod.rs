//! In-memory transport and fixtures shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use labinv_sdk::{
    ApiRequest, ApiResponse, ApiTransport, ClientConfig, ClientError, LabContext, Method, Record,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = Box<dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Routes by exact `(method, path)`; the most recently registered route wins.
/// Unmatched requests get a 404. Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
    delays: Mutex<Vec<(String, Duration)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
    }

    pub fn json(&self, method: Method, path: &str, body: Value) {
        self.on(method, path, move |_| json_response(200, &body));
    }

    pub fn status(&self, method: Method, path: &str, status: u16) {
        self.on(method, path, move |_| json_response(status, &json!({"detail": "nope"})));
    }

    /// Delay any request whose query string contains `fragment`.
    pub fn delay_matching(&self, fragment: &str, delay: Duration) {
        self.delays.lock().unwrap().push((fragment.to_string(), delay));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        let qs = request.query.to_query_string();
        let delay = self
            .delays
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| qs.contains(fragment.as_str()))
            .map(|(_, d)| *d);
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        let routes = self.routes.lock().unwrap();
        let response = routes
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.path == request.path)
            .map(|r| (r.handler)(&request))
            .unwrap_or_else(|| json_response(404, &json!({"detail": "Not found."})));
        Ok(response)
    }
}

pub fn json_response(status: u16, body: &Value) -> ApiResponse {
    ApiResponse {
        status,
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: serde_json::to_vec(body).unwrap(),
    }
}

pub fn paginated(count: u64, results: Value) -> Value {
    json!({"count": count, "next": null, "previous": null, "results": results})
}

pub fn navigation_tree() -> Value {
    json!([
        {"id": 12, "app_label": "lab", "app_verbose_name": "Lab", "model_class_name": "Plasmid",
         "model_verbose_name": "Plasmid", "model_verbose_plural": "Plasmids",
         "permissions": {"add": true, "change": true, "view": true}},
        {"id": 15, "app_label": "lab", "app_verbose_name": "Lab", "model_class_name": "Antibody",
         "model_verbose_name": "Antibody", "model_verbose_plural": "Antibodies",
         "permissions": {"add": false, "change": false, "view": true}}
    ])
}

pub fn logged_user() -> Value {
    json!({"id": 1, "username": "ann", "first_name": "Ann"})
}

/// Serve users for whatever `user_id` values are requested.
pub fn serve_users(mock: &MockTransport) {
    mock.on(Method::Get, "/api/common/user/", |req| {
        let users: Vec<Value> = req
            .query
            .get_all("user_id")
            .into_iter()
            .map(|id| json!({"id": id.parse::<u64>().unwrap(), "username": format!("user{}", id)}))
            .collect();
        json_response(200, &Value::Array(users))
    });
}

pub fn config() -> ClientConfig {
    ClientConfig::new("http://lab.test")
}

/// Mock with the bootstrap endpoints already answered.
pub fn backend() -> Arc<MockTransport> {
    let mock = MockTransport::new();
    mock.json(Method::Get, "/api/common/user/logged/", logged_user());
    mock.json(Method::Get, "/api/navigation/", navigation_tree());
    mock.json(
        Method::Get,
        "/api/layout/1/",
        json!({"primary_colour": "indigo", "surface_colour": "slate", "theme": "light"}),
    );
    serve_users(&mock);
    mock
}

pub async fn context(mock: &Arc<MockTransport>) -> LabContext {
    LabContext::with_transport(config(), mock.clone()).await.unwrap()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plasmid {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub created_by: Option<u64>,
}

impl Record for Plasmid {
    fn id(&self) -> u64 {
        self.id
    }

    fn created_by(&self) -> Option<u64> {
        self.created_by
    }
}

pub struct Plasmids;

impl labinv_sdk::ModelSchema for Plasmids {
    const APP_LABEL: &'static str = "lab";
    const MODEL_NAME: &'static str = "plasmid";
    type Record = Plasmid;
}
