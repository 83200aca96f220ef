//! View state mirrored from the service: the two live tables, the detail
//! panels, and the single-line message surface.

use std::{fmt::Write as _, str::FromStr};

use chrono::{DateTime, Utc};
use shared::domain::{display_optional, Expression, Task, TaskDetail};

use crate::client::Listing;

pub const EXPRESSION_COLUMNS: [&str; 3] = ["Id", "Status", "Result"];
pub const TASK_COLUMNS: [&str; 6] = ["Id", "Arg1", "Arg2", "Operation", "OperationTime", "Busy"];

/// Text catalogue for everything the panel writes on its own behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Russian,
}

impl Locale {
    pub fn yes_no(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::English, true) => "Yes",
            (Self::English, false) => "No",
            (Self::Russian, true) => "Да",
            (Self::Russian, false) => "Нет",
        }
    }

    pub fn no_expressions(self) -> &'static str {
        match self {
            Self::English => "No expressions",
            Self::Russian => "Нет выражений",
        }
    }

    pub fn expression_submitted(self, id: &str) -> String {
        match self {
            Self::English => format!("Request sent. Id: {id}"),
            Self::Russian => format!("Запрос отправлен. Id: {id}"),
        }
    }

    pub fn task_result_sent(self) -> &'static str {
        match self {
            Self::English => "Result sent",
            Self::Russian => "Результат отправлен",
        }
    }

    pub fn task_result_failed(self) -> &'static str {
        match self {
            Self::English => "Failed to send result",
            Self::Russian => "Ошибка отправки результата",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ru" | "russian" => Ok(Self::Russian),
            other => Err(format!("unknown locale '{other}' (expected 'en' or 'ru')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Cells(Vec<String>),
    /// Explanatory text occupying `span` columns.
    Placeholder { text: String, span: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TableView {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn expressions() -> Self {
        Self::new(&EXPRESSION_COLUMNS)
    }

    pub fn tasks() -> Self {
        Self::new(&TASK_COLUMNS)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Drops every existing row and installs `rows` in their place.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows.clear();
        self.rows.extend(rows);
    }

    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            if let Row::Cells(cells) = row {
                for (width, cell) in widths.iter_mut().zip(cells) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        push_line(&mut out, &self.columns, &widths);
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
        out.push_str(&"-".repeat(total));
        out.push('\n');
        for row in &self.rows {
            match row {
                Row::Cells(cells) => push_line(&mut out, cells, &widths),
                Row::Placeholder { text, .. } => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Maps decoded collections onto table rows in column order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionRenderer {
    locale: Locale,
}

impl CollectionRenderer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Absence renders as one spanning placeholder row; an empty `Found`
    /// renders as no rows at all.
    pub fn render_expressions(&self, view: &mut TableView, listing: &Listing<Expression>) {
        let rows = match listing {
            Listing::NotFound => vec![Row::Placeholder {
                text: self.locale.no_expressions().to_string(),
                span: EXPRESSION_COLUMNS.len(),
            }],
            Listing::Found(expressions) => expressions
                .iter()
                .map(|expression| {
                    Row::Cells(vec![
                        expression.id.to_string(),
                        display_optional(&expression.status),
                        display_optional(&expression.result),
                    ])
                })
                .collect(),
        };
        view.replace_rows(rows);
    }

    /// An empty queue renders as zero rows, with no placeholder.
    pub fn render_tasks(&self, view: &mut TableView, tasks: &[Task]) {
        let rows = tasks
            .iter()
            .map(|task| {
                Row::Cells(vec![
                    task.id.to_string(),
                    display_optional(&task.arg1),
                    display_optional(&task.arg2),
                    display_optional(&task.operation),
                    display_optional(&task.operation_time),
                    self.locale.yes_no(task.is_busy).to_string(),
                ])
            })
            .collect();
        view.replace_rows(rows);
    }
}

/// Labelled field list shown for a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPanel {
    fields: Vec<(String, String)>,
}

impl DetailPanel {
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn show_expression(&mut self, expression: &Expression) {
        self.fields = vec![
            ("Id".to_string(), expression.id.to_string()),
            ("Status".to_string(), display_optional(&expression.status)),
            ("Result".to_string(), display_optional(&expression.result)),
        ];
    }

    pub fn show_task(&mut self, task: &TaskDetail) {
        self.fields = vec![
            ("Id".to_string(), task.id.to_string()),
            ("Arg1".to_string(), display_optional(&task.arg1)),
            ("Arg2".to_string(), display_optional(&task.arg2)),
            ("Operation".to_string(), display_optional(&task.operation)),
            ("OperationTime".to_string(), display_optional(&task.operation_time)),
        ];
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (label, value) in &self.fields {
            let _ = writeln!(out, "{label}: {value}");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownMessage {
    pub text: String,
    pub shown_at: DateTime<Utc>,
}

/// One transient status line; every `show` replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct MessageSurface {
    current: Option<ShownMessage>,
}

impl MessageSurface {
    pub fn show(&mut self, text: impl Into<String>) {
        self.current = Some(ShownMessage {
            text: text.into(),
            shown_at: Utc::now(),
        });
    }

    pub fn current(&self) -> Option<&ShownMessage> {
        self.current.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|m| m.text.as_str())
    }
}

/// Everything the operator can see.
#[derive(Debug, Clone)]
pub struct PanelViews {
    pub expressions: TableView,
    pub tasks: TableView,
    pub expression_detail: DetailPanel,
    pub task_detail: DetailPanel,
    pub message: MessageSurface,
}

impl Default for PanelViews {
    fn default() -> Self {
        Self {
            expressions: TableView::expressions(),
            tasks: TableView::tasks(),
            expression_detail: DetailPanel::default(),
            task_detail: DetailPanel::default(),
            message: MessageSurface::default(),
        }
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
