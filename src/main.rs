use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use scorecard_watch::config::Settings;
use scorecard_watch::logging::init_tracing;
use scorecard_watch::{AlertSender, Evaluator, Monitor, Scheduler, ScorecardClient, Shutdown, SmtpRelay};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load settings")?;
    init_tracing(&settings.log_level);

    info!(
        endpoint = %settings.api.endpoint,
        interval_secs = settings.schedule.interval_secs,
        threshold = settings.schedule.threshold,
        relay = %format!("{}:{}", settings.mail.relay_host, settings.mail.relay_port),
        "Starting scorecard watch"
    );

    let fetcher = Arc::new(ScorecardClient::new(&settings.api).context("Failed to build API client")?);
    let relay = Arc::new(SmtpRelay::new(&settings.mail));
    let sender = AlertSender::new(&settings.mail, relay).context("Invalid mail addresses")?;
    let monitor = Arc::new(Monitor::new(
        fetcher,
        Evaluator::new(settings.schedule.threshold),
        sender,
    ));

    let shutdown = Shutdown::new();

    let listener = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = shutdown.listen_for_signals().await {
                error!(error = %e, "Failed to install signal handlers");
                shutdown.trigger();
            }
        }
    });

    let scheduler = Scheduler::new(settings.schedule.interval());
    let token = shutdown.token();
    shutdown.spawn(async move {
        scheduler
            .run(
                move || {
                    let monitor = Arc::clone(&monitor);
                    async move { monitor.run_cycle().await }
                },
                token,
            )
            .await
    });

    shutdown.wait().await;
    shutdown.drain().await;
    listener.abort();

    info!("Scorecard watch stopped");
    Ok(())
}
