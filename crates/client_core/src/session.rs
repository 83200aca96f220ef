//! Operator-editable session inputs and the snapshots taken from them.

use std::{sync::Arc, time::Duration};

use shared::error::PanelError;
use tokio::sync::RwLock;

/// Browsers silently fire intervals longer than a signed 32-bit millisecond
/// count immediately; such periods are rejected instead.
const MAX_PERIOD_MS: u64 = i32::MAX as u64;

/// Values captured at the moment a tick or command begins. Later edits to the
/// inputs never reach a request that has already started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub host: String,
    pub interval: String,
}

impl SessionConfig {
    pub fn period(&self) -> Result<Duration, PanelError> {
        let seconds = self
            .interval
            .trim()
            .parse::<f64>()
            .map_err(|_| PanelError::InvalidInterval {
                value: self.interval.clone(),
            })?;
        period_from_seconds(seconds)
    }
}

/// Converts an operator-supplied period to a whole number of milliseconds.
pub fn period_from_seconds(seconds: f64) -> Result<Duration, PanelError> {
    let invalid = || PanelError::InvalidInterval {
        value: seconds.to_string(),
    };
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(invalid());
    }

    let millis = (seconds * 1000.0).round();
    if millis < 1.0 || millis > MAX_PERIOD_MS as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_millis(millis as u64))
}

/// The live host and interval fields. Cloning shares the same fields.
#[derive(Debug, Clone)]
pub struct SessionInputs {
    fields: Arc<RwLock<SessionConfig>>,
}

impl SessionInputs {
    pub fn new(host: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            fields: Arc::new(RwLock::new(SessionConfig {
                host: host.into(),
                interval: interval.into(),
            })),
        }
    }

    pub async fn set_host(&self, host: impl Into<String>) {
        self.fields.write().await.host = host.into();
    }

    pub async fn set_interval(&self, interval: impl Into<String>) {
        self.fields.write().await.interval = interval.into();
    }

    pub async fn snapshot(&self) -> SessionConfig {
        self.fields.read().await.clone()
    }
}
