//! In-process stand-in for the computation service.

use std::{collections::{HashMap, VecDeque}, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    panel::{Panel, PanelOptions},
    session::SessionInputs,
    ServiceClient,
};

pub(crate) struct ServiceState {
    /// `None` answers the listing with 404.
    pub(crate) expressions: Option<Vec<Value>>,
    /// Consumed one per listing request before falling back to `expressions`.
    pub(crate) expression_script: VecDeque<(Duration, Vec<Value>)>,
    pub(crate) expression_by_id: HashMap<String, Value>,
    pub(crate) tasks: Vec<Value>,
    pub(crate) tasks_raw_body: Option<String>,
    pub(crate) next_task: Option<Value>,
    pub(crate) calculate_status: StatusCode,
    pub(crate) calculate_id: Value,
    pub(crate) task_result_status: StatusCode,
    pub(crate) calculations: Vec<Value>,
    pub(crate) task_results: Vec<Value>,
    pub(crate) listing_hits: usize,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self {
            expressions: None,
            expression_script: VecDeque::new(),
            expression_by_id: HashMap::new(),
            tasks: Vec::new(),
            tasks_raw_body: None,
            next_task: None,
            calculate_status: StatusCode::CREATED,
            calculate_id: json!("abc123"),
            task_result_status: StatusCode::OK,
            calculations: Vec::new(),
            task_results: Vec::new(),
            listing_hits: 0,
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeService {
    pub(crate) state: Arc<Mutex<ServiceState>>,
}

impl FakeService {
    pub(crate) async fn spawn(&self) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = Router::new()
            .route("/api/v1/calculate", post(calculate))
            .route("/api/v1/expressions", get(list_expressions))
            .route("/api/v1/expressions/:id", get(get_expression))
            .route("/internal/tasks", get(list_tasks))
            .route("/internal/task", get(next_task).post(submit_result))
            .with_state(self.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }
}

/// A host nothing listens on.
pub(crate) async fn unreachable_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn panel_for(host: &str, options: PanelOptions) -> Arc<Panel> {
    Panel::new(ServiceClient::new(), SessionInputs::new(host, "5"), options)
}

async fn calculate(State(service): State<FakeService>, Json(body): Json<Value>) -> Response {
    let mut state = service.state.lock().await;
    state.calculations.push(body);
    if !state.calculate_status.is_success() {
        return state.calculate_status.into_response();
    }
    (state.calculate_status, Json(json!({ "id": state.calculate_id.clone() }))).into_response()
}

async fn list_expressions(State(service): State<FakeService>) -> Response {
    let scripted = {
        let mut state = service.state.lock().await;
        state.listing_hits += 1;
        state.expression_script.pop_front()
    };
    if let Some((delay, expressions)) = scripted {
        tokio::time::sleep(delay).await;
        return Json(json!({ "expressions": expressions })).into_response();
    }

    let state = service.state.lock().await;
    match &state.expressions {
        Some(expressions) => Json(json!({ "expressions": expressions })).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn get_expression(State(service): State<FakeService>, Path(id): Path<String>) -> Response {
    let state = service.state.lock().await;
    match state.expression_by_id.get(&id) {
        Some(expression) => Json(json!({ "expression": expression })).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn list_tasks(State(service): State<FakeService>) -> Response {
    let state = service.state.lock().await;
    if let Some(raw) = &state.tasks_raw_body {
        return (StatusCode::OK, raw.clone()).into_response();
    }
    Json(json!({ "tasks": state.tasks })).into_response()
}

async fn next_task(State(service): State<FakeService>) -> Response {
    let state = service.state.lock().await;
    match &state.next_task {
        Some(task) => Json(json!({ "task": task })).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn submit_result(State(service): State<FakeService>, Json(body): Json<Value>) -> StatusCode {
    let mut state = service.state.lock().await;
    state.task_results.push(body);
    state.task_result_status
}
