mod config;
mod discord_client;
mod formatters;
mod monitor;
mod schedule_client;

use anyhow::Result;
use config::Config;
use discord_client::DiscordClient;
use dotenv::dotenv;
use log::{error, info};
use monitor::Monitor;
use schedule_client::ScheduleClient;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("Starting section monitor...");

    let cfg = Config::from_env()?;
    info!(
        "Config: course='{}' url={} interval={}s",
        cfg.course_title,
        cfg.schedule_url,
        cfg.check_interval.as_secs()
    );

    let schedule = ScheduleClient::new(cfg.schedule_url.clone(), cfg.course_title.clone());
    let discord = DiscordClient::new(
        cfg.discord_api_base_url.clone(),
        cfg.discord_bot_token.clone(),
        cfg.discord_recipient_id.clone(),
    );

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {err}");
            }
        }
    });

    let mut monitor = Monitor::new(cfg.course_title.clone());
    monitor
        .run(
            &schedule,
            &discord,
            cfg.check_interval,
            cfg.stats_log_every_cycles,
            &mut shutdown_rx,
        )
        .await;

    Ok(())
}
