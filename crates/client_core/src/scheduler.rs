//! Two recurring refresh timers, one per collection, sharing one period.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::error::PanelError;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::session::period_from_seconds;

/// A collection refresh invoked on every tick.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh(&self);
}

struct ActiveTimers {
    period: Duration,
    expressions: JoinHandle<()>,
    tasks: JoinHandle<()>,
}

impl ActiveTimers {
    fn abort(self) {
        self.expressions.abort();
        self.tasks.abort();
    }
}

pub struct PollingScheduler {
    expressions: Arc<dyn Refresh>,
    tasks: Arc<dyn Refresh>,
    epoch: Arc<AtomicU64>,
    active: Option<ActiveTimers>,
}

impl PollingScheduler {
    pub fn new(expressions: Arc<dyn Refresh>, tasks: Arc<dyn Refresh>) -> Self {
        Self {
            expressions,
            tasks,
            epoch: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    /// Replaces both timers with new ones firing every `period_seconds`.
    ///
    /// An invalid period leaves the current timers running. Requests already
    /// dispatched by the old timers are not cancelled.
    pub fn reconfigure(&mut self, period_seconds: f64) -> Result<(), PanelError> {
        let period = period_from_seconds(period_seconds)?;

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.active.take() {
            previous.abort();
        }

        self.active = Some(ActiveTimers {
            period,
            expressions: spawn_timer(
                "expressions",
                Arc::clone(&self.expressions),
                period,
                epoch,
                Arc::clone(&self.epoch),
            ),
            tasks: spawn_timer(
                "tasks",
                Arc::clone(&self.tasks),
                period,
                epoch,
                Arc::clone(&self.epoch),
            ),
        });
        info!(period_ms = period.as_millis() as u64, "polling timers reconfigured");
        Ok(())
    }

    pub fn period(&self) -> Option<Duration> {
        self.active.as_ref().map(|active| active.period)
    }

    pub fn live_timers(&self) -> usize {
        self.active.as_ref().map_or(0, |active| {
            [&active.expressions, &active.tasks]
                .into_iter()
                .filter(|handle| !handle.is_finished())
                .count()
        })
    }

    pub fn shutdown(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(active) = self.active.take() {
            active.abort();
        }
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_timer(
    collection: &'static str,
    target: Arc<dyn Refresh>,
    period: Duration,
    epoch: u64,
    current_epoch: Arc<AtomicU64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if current_epoch.load(Ordering::SeqCst) != epoch {
                break;
            }
            debug!(collection, "refresh tick");
            let target = Arc::clone(&target);
            // Detached so a later reconfiguration cannot cancel the request.
            tokio::spawn(async move { target.refresh().await });
        }
    })
}

#[cfg(test)]
#[path = "tests/scheduler_tests.rs"]
mod tests;
