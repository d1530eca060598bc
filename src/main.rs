//! Application entry point for alert-map-bot.
//!
//! Initializes all components and starts the alert poll loop.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;

use alert_map_bot::alert::AlertSource;
use alert_map_bot::alert::alerts_in_ua::AlertsInUaSource;
use alert_map_bot::config::Config;
use alert_map_bot::database::Database;
use alert_map_bot::logging::setup_logging;
use alert_map_bot::notify::MessageSender;
use alert_map_bot::notify::dispatcher::NotificationDispatcher;
use alert_map_bot::notify::telegram::TelegramSender;
use alert_map_bot::service::Services;
use alert_map_bot::task::alert_poller::AlertPoller;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;
    let _log_guard = setup_logging(&config)?;
    info!("Starting alert-map-bot...");

    let db = setup_database(&config, init_start).await?;

    let source: Arc<dyn AlertSource> =
        Arc::new(AlertsInUaSource::new(config.alerts_api_token.clone()));
    if config.alerts_api_token.is_none() {
        info!("No alerts API token configured; poll cycles will be no-ops.");
    }
    let sender: Arc<dyn MessageSender> = Arc::new(TelegramSender::new(&config.bot_token));
    let dispatcher = Arc::new(NotificationDispatcher::new(sender, config.send_delay));

    let services = Services::new(db.clone(), source.clone(), dispatcher.clone());
    info!(
        "Tracking {} subscribers.",
        services.subscriber.subscriber_count().await?
    );

    let poller = AlertPoller::new(
        source,
        db,
        dispatcher,
        config.poll_interval,
        config.fanout_cap,
    );
    poller.clone().start();

    run(init_start, poller).await
}

fn load_config() -> Result<Arc<Config>> {
    debug!("Loading configuration...");
    let config = Config::load()?;
    Ok(Arc::new(config))
}

async fn setup_database(config: &Config, init_start: Instant) -> Result<Arc<Database>> {
    debug!("Setting up Database...");
    let db = Arc::new(Database::new(&config.db_url, &config.db_path).await?);

    info!("Running database migrations...");
    db.run_migrations().await?;
    db.seed().await?;
    info!(
        "Database setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    Ok(db)
}

async fn run(init_start: Instant, poller: Arc<AlertPoller>) -> Result<()> {
    info!(
        "alert-map-bot is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");
    poller.shutdown().await;

    Ok(())
}
