//! The view-synchronization controller: refreshes, commands and timers wired
//! around one shared set of views.

use std::sync::Arc;

use async_trait::async_trait;
use shared::error::PanelError;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, error, warn};

use crate::{
    client::ServiceClient,
    scheduler::{PollingScheduler, Refresh},
    sequence::ViewGates,
    session::SessionInputs,
    views::{CollectionRenderer, Locale, PanelViews},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelOptions {
    pub locale: Locale,
    /// Discard responses that arrive after a newer response for the same view.
    pub drop_stale_responses: bool,
}

/// Announces which view changed. Receivers read the new state from
/// [`Panel::views`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    ExpressionsUpdated,
    TasksUpdated,
    ExpressionDetailUpdated,
    TaskDetailUpdated,
    MessageShown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewKind {
    Expressions,
    Tasks,
    ExpressionDetail,
    TaskDetail,
}

pub struct Panel {
    pub(crate) client: ServiceClient,
    pub(crate) inputs: SessionInputs,
    pub(crate) renderer: CollectionRenderer,
    pub(crate) options: PanelOptions,
    views: Mutex<PanelViews>,
    gates: Mutex<ViewGates>,
    events: broadcast::Sender<PanelEvent>,
}

impl Panel {
    pub fn new(client: ServiceClient, inputs: SessionInputs, options: PanelOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            client,
            inputs,
            renderer: CollectionRenderer::new(options.locale),
            options,
            views: Mutex::new(PanelViews::default()),
            gates: Mutex::new(ViewGates::default()),
            events,
        })
    }

    pub fn inputs(&self) -> &SessionInputs {
        &self.inputs
    }

    pub fn options(&self) -> PanelOptions {
        self.options
    }

    pub async fn views(&self) -> MutexGuard<'_, PanelViews> {
        self.views.lock().await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: PanelEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) async fn issue(&self, view: ViewKind) -> u64 {
        let mut gates = self.gates.lock().await;
        match view {
            ViewKind::Expressions => gates.expressions.issue(),
            ViewKind::Tasks => gates.tasks.issue(),
            ViewKind::ExpressionDetail => gates.expression_detail.issue(),
            ViewKind::TaskDetail => gates.task_detail.issue(),
        }
    }

    /// With stale dropping off every response is applied, last write wins.
    pub(crate) async fn admit(&self, view: ViewKind, seq: u64) -> bool {
        if !self.options.drop_stale_responses {
            return true;
        }
        let mut gates = self.gates.lock().await;
        let admitted = match view {
            ViewKind::Expressions => gates.expressions.admit(seq),
            ViewKind::Tasks => gates.tasks.admit(seq),
            ViewKind::ExpressionDetail => gates.expression_detail.admit(seq),
            ViewKind::TaskDetail => gates.task_detail.admit(seq),
        };
        if !admitted {
            debug!(?view, seq, "dropping stale response");
        }
        admitted
    }

    /// Pulls the expression listing and replaces the expressions table. On
    /// failure the table keeps its previous rows.
    pub async fn refresh_expressions(&self) {
        let session = self.inputs.snapshot().await;
        let seq = self.issue(ViewKind::Expressions).await;
        match self.client.list_expressions(&session).await {
            Ok(listing) => {
                if !self.admit(ViewKind::Expressions, seq).await {
                    return;
                }
                {
                    let mut views = self.views.lock().await;
                    self.renderer
                        .render_expressions(&mut views.expressions, &listing);
                }
                self.emit(PanelEvent::ExpressionsUpdated);
            }
            Err(error) => {
                error!(host = %session.host, %error, "failed to refresh expressions");
            }
        }
    }

    /// Pulls the task queue snapshot and replaces the tasks table.
    pub async fn refresh_tasks(&self) {
        let session = self.inputs.snapshot().await;
        let seq = self.issue(ViewKind::Tasks).await;
        match self.client.list_tasks(&session).await {
            Ok(tasks) => {
                if !self.admit(ViewKind::Tasks, seq).await {
                    return;
                }
                {
                    let mut views = self.views.lock().await;
                    self.renderer.render_tasks(&mut views.tasks, &tasks);
                }
                self.emit(PanelEvent::TasksUpdated);
            }
            Err(error) => {
                error!(host = %session.host, %error, "failed to refresh tasks");
            }
        }
    }

    pub(crate) async fn show_message(&self, text: String) {
        self.views.lock().await.message.show(text.clone());
        self.emit(PanelEvent::MessageShown(text));
    }
}

struct ExpressionsRefresh(Arc<Panel>);

#[async_trait]
impl Refresh for ExpressionsRefresh {
    async fn refresh(&self) {
        self.0.refresh_expressions().await;
    }
}

struct TasksRefresh(Arc<Panel>);

#[async_trait]
impl Refresh for TasksRefresh {
    async fn refresh(&self) {
        self.0.refresh_tasks().await;
    }
}

/// A [`Panel`] plus the scheduler that keeps its tables current.
pub struct PanelController {
    panel: Arc<Panel>,
    scheduler: PollingScheduler,
}

impl PanelController {
    pub fn new(panel: Arc<Panel>) -> Self {
        let scheduler = PollingScheduler::new(
            Arc::new(ExpressionsRefresh(Arc::clone(&panel))),
            Arc::new(TasksRefresh(Arc::clone(&panel))),
        );
        Self { panel, scheduler }
    }

    pub fn panel(&self) -> &Arc<Panel> {
        &self.panel
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.scheduler
    }

    /// Installs the timers from the current interval input and loads both
    /// tables once without waiting for the first tick.
    pub async fn start(&mut self) -> Result<(), PanelError> {
        let scheduled = self.apply_interval().await;
        if let Err(error) = &scheduled {
            warn!(%error, "polling not started");
        }
        tokio::join!(
            self.panel.refresh_expressions(),
            self.panel.refresh_tasks()
        );
        scheduled
    }

    /// Updates the interval input and reschedules both timers from it.
    pub async fn set_interval(&mut self, interval: impl Into<String>) -> Result<(), PanelError> {
        self.panel.inputs.set_interval(interval).await;
        self.apply_interval().await
    }

    async fn apply_interval(&mut self) -> Result<(), PanelError> {
        let session = self.panel.inputs.snapshot().await;
        let period = session.period()?;
        self.scheduler.reconfigure(period.as_secs_f64())
    }

    pub fn stop(&mut self) {
        self.scheduler.shutdown();
    }
}

#[cfg(test)]
#[path = "tests/panel_tests.rs"]
mod tests;
