//! report-worker — owns the schedule registry and drains fired reports.
//!
//! Sessions hand report updates to the coordinator, which arms timers in the
//! shared [`ReportScheduler`]; this worker receives the reports whose timers
//! elapsed. Actual report generation and delivery hang off the drain loop in
//! the embedding application; here each firing is logged.

use clap::Parser;
use tracing::info;

use dashpulse_core::config::{load_dotenv, Config};
use dashpulse_scheduler::ReportScheduler;

// ── CLI ─────────────────────────────────────────────────────────────

/// Schedule registry worker for periodic reports.
#[derive(Parser, Debug)]
#[command(name = "report-worker", version, about)]
struct Cli {
    /// Bound of the fired-report handoff channel.
    #[arg(long, env = "DASHPULSE_FIRED_QUEUE_CAPACITY", default_value_t = 256)]
    queue_capacity: usize,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let cli = Cli::parse();

    let (scheduler, mut fired_rx) = ReportScheduler::new(cli.queue_capacity);
    info!("report-worker starting");

    loop {
        tokio::select! {
            Some(fired) = fired_rx.recv() => {
                info!(
                    key = %fired.key,
                    report = %fired.report.name,
                    fired_at = %fired.fired_at,
                    "report timer fired"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!(armed = scheduler.len().await, "shutdown signal received");
                break;
            }
        }
    }

    info!("report-worker exited cleanly");
    Ok(())
}
