use serde::{Deserialize, Serialize};

use crate::domain::{Expression, ExpressionId, Task, TaskDetail, TaskId};

pub const CALCULATE_PATH: &str = "/api/v1/calculate";
pub const EXPRESSIONS_PATH: &str = "/api/v1/expressions";
pub const TASKS_PATH: &str = "/internal/tasks";
pub const TASK_PATH: &str = "/internal/task";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub id: ExpressionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionsResponse {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub expression: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: TaskDetail,
}

/// Worker-style result report. A NaN `result` goes out as JSON `null`; the
/// service decides what to do with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResultRequest {
    pub id: TaskId,
    pub result: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{display_optional, Scalar};

    #[test]
    fn nan_result_is_sent_as_null() {
        let body = serde_json::to_value(TaskResultRequest {
            id: TaskId::new("t1"),
            result: f64::NAN,
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({"id": "t1", "result": null}));
    }

    #[test]
    fn task_listing_keeps_column_fields() {
        let body = r#"{"tasks":[{"id":"t1","arg1":1,"arg2":2.5,"operation":"*","operation_time":100,"is_busy":true}]}"#;
        let decoded: TasksResponse = serde_json::from_str(body).expect("decode");
        let task = &decoded.tasks[0];
        assert_eq!(task.arg2.as_ref().and_then(Scalar::as_f64), Some(2.5));
        assert_eq!(task.operation, Some(Scalar::from("*")));
        assert_eq!(display_optional(&task.operation_time), "100");
        assert!(task.is_busy);
    }
}
