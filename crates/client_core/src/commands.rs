//! One-shot operator actions. None of them touch the scheduler.

use shared::{
    domain::{Expression, ExpressionId, TaskDetail, TaskId},
    error::PanelError,
    protocol::TaskResultRequest,
};
use tracing::{error, info};

use crate::{
    client::TaskResultOutcome,
    panel::{Panel, PanelEvent, ViewKind},
};

impl Panel {
    /// Submits an expression for evaluation. Success shows the assigned id;
    /// failure is only logged and leaves the message surface as it was.
    pub async fn submit_expression(&self, expression: &str) -> Result<ExpressionId, PanelError> {
        let session = self.inputs.snapshot().await;
        match self.client.calculate(&session, expression).await {
            Ok(id) => {
                info!(%id, "expression submitted");
                let text = self.renderer.locale().expression_submitted(id.as_str());
                self.show_message(text).await;
                Ok(id)
            }
            Err(error) => {
                error!(host = %session.host, %error, "failed to submit expression");
                Err(error)
            }
        }
    }

    /// Loads one expression into the expression detail panel.
    pub async fn fetch_expression_detail(&self, id: &str) -> Result<Expression, PanelError> {
        let session = self.inputs.snapshot().await;
        let seq = self.issue(ViewKind::ExpressionDetail).await;
        match self
            .client
            .get_expression(&session, &ExpressionId::new(id))
            .await
        {
            Ok(expression) => {
                if self.admit(ViewKind::ExpressionDetail, seq).await {
                    self.views()
                        .await
                        .expression_detail
                        .show_expression(&expression);
                    self.emit(PanelEvent::ExpressionDetailUpdated);
                }
                Ok(expression)
            }
            Err(error) => {
                error!(host = %session.host, id, %error, "failed to fetch expression");
                Err(error)
            }
        }
    }

    /// Loads the next available task into the task detail panel.
    pub async fn fetch_next_task_detail(&self) -> Result<TaskDetail, PanelError> {
        let session = self.inputs.snapshot().await;
        let seq = self.issue(ViewKind::TaskDetail).await;
        match self.client.next_task(&session).await {
            Ok(task) => {
                if self.admit(ViewKind::TaskDetail, seq).await {
                    self.views().await.task_detail.show_task(&task);
                    self.emit(PanelEvent::TaskDetailUpdated);
                }
                Ok(task)
            }
            Err(error) => {
                error!(host = %session.host, %error, "failed to fetch next task");
                Err(error)
            }
        }
    }

    /// Reports a task result. The text is parsed leniently and sent even when
    /// it is not a number; the service is the one to reject it.
    pub async fn submit_task_result(
        &self,
        id: &str,
        result_text: &str,
    ) -> Result<TaskResultOutcome, PanelError> {
        let session = self.inputs.snapshot().await;
        let request = TaskResultRequest {
            id: TaskId::new(id),
            result: parse_float(result_text),
        };
        let locale = self.renderer.locale();
        match self.client.submit_task_result(&session, &request).await {
            Ok(TaskResultOutcome::Accepted) => {
                info!(id, "task result accepted");
                self.show_message(locale.task_result_sent().to_string())
                    .await;
                Ok(TaskResultOutcome::Accepted)
            }
            Ok(TaskResultOutcome::Rejected { status }) => {
                info!(id, status, "task result rejected");
                self.show_message(locale.task_result_failed().to_string())
                    .await;
                Ok(TaskResultOutcome::Rejected { status })
            }
            Err(error) => {
                error!(host = %session.host, id, %error, "failed to submit task result");
                Err(error)
            }
        }
    }
}

/// Parses the longest leading decimal literal of `text` (after whitespace),
/// accepting a sign, fraction, exponent or `Infinity`. Anything else is NaN.
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
