//! Line commands standing in for the panel's fields and buttons.

use std::{future::Future, io, sync::Arc};

use client_core::{Panel, PanelController, PanelEvent};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, info, warn};

pub const USAGE: &str = "\
commands:
  host <url>            set the service base URL
  interval <seconds>    set the polling period for both tables
  calc <expression>     submit an expression for evaluation
  expr <id>             show one expression
  task                  show the next available task
  result <id> <value>   submit a task result
  show                  print every view
  help                  print this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Host(String),
    Interval(String),
    Calculate(String),
    Expression(String),
    NextTask,
    TaskResult { id: String, result: String },
    Show,
    Help,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<OperatorCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("'{verb}' needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "host" => OperatorCommand::Host(required("a URL")?),
        "interval" => OperatorCommand::Interval(required("a number of seconds")?),
        "calc" => OperatorCommand::Calculate(required("an expression")?),
        "expr" => OperatorCommand::Expression(required("an expression id")?),
        "task" => OperatorCommand::NextTask,
        "result" => {
            let rest = required("a task id")?;
            let (id, result) = match rest.split_once(char::is_whitespace) {
                Some((id, result)) => (id.to_string(), result.trim().to_string()),
                None => (rest, String::new()),
            };
            OperatorCommand::TaskResult { id, result }
        }
        "show" => OperatorCommand::Show,
        "help" | "?" => OperatorCommand::Help,
        "quit" | "exit" => OperatorCommand::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

/// Runs one command. Returns `false` once the operator asked to leave.
pub async fn dispatch(controller: &mut PanelController, command: OperatorCommand) -> bool {
    let panel = Arc::clone(controller.panel());
    match command {
        OperatorCommand::Host(host) => {
            panel.inputs().set_host(host).await;
        }
        OperatorCommand::Interval(interval) => {
            if let Err(error) = controller.set_interval(interval).await {
                println!("interval unchanged: {error}");
            }
        }
        OperatorCommand::Calculate(expression) => {
            tokio::spawn(async move {
                let _ = panel.submit_expression(&expression).await;
            });
        }
        OperatorCommand::Expression(id) => {
            tokio::spawn(async move {
                let _ = panel.fetch_expression_detail(&id).await;
            });
        }
        OperatorCommand::NextTask => {
            tokio::spawn(async move {
                let _ = panel.fetch_next_task_detail().await;
            });
        }
        OperatorCommand::TaskResult { id, result } => {
            tokio::spawn(async move {
                let _ = panel.submit_task_result(&id, &result).await;
            });
        }
        OperatorCommand::Show => print_all(&panel).await,
        OperatorCommand::Help => println!("{USAGE}"),
        OperatorCommand::Quit => return false,
    }
    true
}

/// Reads commands until `quit` or `shutdown`. Once the input closes the panel
/// keeps polling until `shutdown` resolves.
pub async fn run_console<R>(
    controller: &mut PanelController,
    input: R,
    shutdown: impl Future<Output = ()>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    tokio::pin!(shutdown);
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => return Ok(()),
        };
        let Some(line) = line else {
            info!("input closed; polling until interrupted");
            shutdown.await;
            return Ok(());
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !dispatch(controller, command).await {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(problem) => {
                warn!(input = %line, "unrecognized command");
                println!("{problem}\n{USAGE}");
            }
        }
    }
}

pub async fn print_all(panel: &Panel) {
    let views = panel.views().await;
    println!("Expressions\n{}", views.expressions.to_text());
    println!("Tasks\n{}", views.tasks.to_text());
    if !views.expression_detail.is_empty() {
        println!("Expression\n{}", views.expression_detail.to_text());
    }
    if !views.task_detail.is_empty() {
        println!("Task\n{}", views.task_detail.to_text());
    }
    if let Some(message) = views.message.text() {
        println!("> {message}");
    }
}

/// Prints views as their change events arrive.
pub async fn follow_events(
    panel: Arc<Panel>,
    mut events: broadcast::Receiver<PanelEvent>,
    watch_tables: bool,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "console fell behind panel events");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        debug!(?event, "panel event");

        let views = panel.views().await;
        match event {
            PanelEvent::ExpressionsUpdated if watch_tables => {
                println!("Expressions\n{}", views.expressions.to_text());
            }
            PanelEvent::TasksUpdated if watch_tables => {
                println!("Tasks\n{}", views.tasks.to_text());
            }
            PanelEvent::ExpressionDetailUpdated => {
                println!("Expression\n{}", views.expression_detail.to_text());
            }
            PanelEvent::TaskDetailUpdated => {
                println!("Task\n{}", views.task_detail.to_text());
            }
            PanelEvent::MessageShown(text) => println!("> {text}"),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
