//! Controller core for the calculator service panel: keeps the expressions
//! and tasks views mirrored from the service on a configurable cadence and runs
//! the operator's one-shot actions against the same views.

pub mod client;
pub mod commands;
pub mod panel;
pub mod scheduler;
pub mod sequence;
pub mod session;
pub mod views;

pub use client::{Listing, ServiceClient, TaskResultOutcome};
pub use commands::parse_float;
pub use panel::{Panel, PanelController, PanelEvent, PanelOptions};
pub use scheduler::{PollingScheduler, Refresh};
pub use session::{SessionConfig, SessionInputs};
pub use views::{CollectionRenderer, DetailPanel, Locale, MessageSurface, PanelViews, Row, TableView};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
