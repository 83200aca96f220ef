mod config;
mod console;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{Locale, Panel, PanelController, PanelOptions, ServiceClient, SessionInputs};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::load_settings,
    console::{follow_events, run_console, USAGE},
};

#[derive(Parser, Debug)]
#[command(name = "calc-panel", about = "Operator panel for the distributed calculator service")]
struct Args {
    /// Service base URL, e.g. http://localhost:8080
    #[arg(long)]
    host: Option<String>,
    /// Polling period for both tables, in seconds
    #[arg(long)]
    interval: Option<String>,
    /// Panel language: en or ru
    #[arg(long)]
    locale: Option<Locale>,
    #[arg(long)]
    drop_stale_responses: bool,
    /// Do not print tables on every refresh; use `show` instead
    #[arg(long)]
    no_watch: bool,
    #[arg(long, default_value = "panel.toml")]
    config: PathBuf,
    /// tracing filter, e.g. debug or client_core=trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = load_settings(&args.config);
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(interval) = args.interval {
        settings.interval = interval;
    }
    if let Some(locale) = args.locale {
        settings.locale = locale;
    }
    settings.drop_stale_responses |= args.drop_stale_responses;
    settings.watch &= !args.no_watch;
    info!(host = %settings.host, interval = %settings.interval, "starting panel");

    let panel = Panel::new(
        ServiceClient::new(),
        SessionInputs::new(settings.host, settings.interval),
        PanelOptions {
            locale: settings.locale,
            drop_stale_responses: settings.drop_stale_responses,
        },
    );
    let printer = tokio::spawn(follow_events(
        Arc::clone(&panel),
        panel.subscribe_events(),
        settings.watch,
    ));

    let mut controller = PanelController::new(panel);
    if let Err(error) = controller.start().await {
        println!("polling is off until a valid interval is set: {error}");
    }
    println!("{USAGE}");

    let stdin = BufReader::new(tokio::io::stdin());
    let interrupted = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    run_console(&mut controller, stdin, interrupted).await?;

    controller.stop();
    printer.abort();
    info!("panel stopped");
    Ok(())
}
