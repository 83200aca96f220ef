//! HTTP mapping of the computation service endpoints used by the panel.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Expression, ExpressionId, Task, TaskDetail},
    error::PanelError,
    protocol::{
        CalculateRequest, CalculateResponse, ExpressionResponse, ExpressionsResponse,
        TaskResponse, TaskResultRequest, TasksResponse, CALCULATE_PATH, EXPRESSIONS_PATH,
        TASKS_PATH, TASK_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::session::SessionConfig;

/// A collection read that may legitimately report that nothing exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Found(Vec<T>),
    NotFound,
}

/// Result submission outcome, judged only by the HTTP success flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskResultOutcome {
    Accepted,
    Rejected { status: u16 },
}

#[derive(Debug, Clone, Default)]
pub struct ServiceClient {
    http: Client,
}

impl ServiceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http(http: Client) -> Self {
        Self { http }
    }

    pub async fn calculate(
        &self,
        session: &SessionConfig,
        expression: &str,
    ) -> Result<ExpressionId, PanelError> {
        let url = endpoint(&session.host, CALCULATE_PATH)?;
        let request = self.http.post(url.clone()).json(&CalculateRequest {
            expression: expression.to_string(),
        });
        let response = send(request, &url).await?;
        let body: CalculateResponse = decode(response, &url).await?;
        Ok(body.id)
    }

    pub async fn list_expressions(
        &self,
        session: &SessionConfig,
    ) -> Result<Listing<Expression>, PanelError> {
        let url = endpoint(&session.host, EXPRESSIONS_PATH)?;
        let response = send(self.http.get(url.clone()), &url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "service reports no expressions");
            return Ok(Listing::NotFound);
        }
        let body: ExpressionsResponse = decode(response, &url).await?;
        Ok(Listing::Found(body.expressions))
    }

    pub async fn get_expression(
        &self,
        session: &SessionConfig,
        id: &ExpressionId,
    ) -> Result<Expression, PanelError> {
        let mut url = endpoint(&session.host, EXPRESSIONS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| PanelError::InvalidHost {
                host: session.host.clone(),
                reason: "host cannot carry a path".to_string(),
            })?
            .push(id.as_str());
        let response = send(self.http.get(url.clone()), &url).await?;
        let body: ExpressionResponse = decode(response, &url).await?;
        Ok(body.expression)
    }

    pub async fn list_tasks(&self, session: &SessionConfig) -> Result<Vec<Task>, PanelError> {
        let url = endpoint(&session.host, TASKS_PATH)?;
        let response = send(self.http.get(url.clone()), &url).await?;
        let body: TasksResponse = decode(response, &url).await?;
        Ok(body.tasks)
    }

    pub async fn next_task(&self, session: &SessionConfig) -> Result<TaskDetail, PanelError> {
        let url = endpoint(&session.host, TASK_PATH)?;
        let response = send(self.http.get(url.clone()), &url).await?;
        let body: TaskResponse = decode(response, &url).await?;
        Ok(body.task)
    }

    pub async fn submit_task_result(
        &self,
        session: &SessionConfig,
        request: &TaskResultRequest,
    ) -> Result<TaskResultOutcome, PanelError> {
        let url = endpoint(&session.host, TASK_PATH)?;
        let response = send(self.http.post(url.clone()).json(request), &url).await?;
        let status = response.status();
        if status.is_success() {
            Ok(TaskResultOutcome::Accepted)
        } else {
            Ok(TaskResultOutcome::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Joins the operator's host with a fixed service path.
pub fn endpoint(host: &str, path: &str) -> Result<Url, PanelError> {
    let base = host.trim().trim_end_matches('/');
    let invalid = |reason: String| PanelError::InvalidHost {
        host: host.to_string(),
        reason,
    };
    let url = Url::parse(&format!("{base}{path}")).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

async fn send(request: RequestBuilder, url: &Url) -> Result<Response, PanelError> {
    request.send().await.map_err(|e| PanelError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, PanelError> {
    let status = response.status();
    if !status.is_success() {
        return Err(PanelError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.json::<T>().await.map_err(|e| PanelError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
