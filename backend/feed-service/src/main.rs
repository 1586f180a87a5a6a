use feed_service::{replay::run_replay, Config};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // Logs go to stderr; stdout carries one state change (then one engagement) per line.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.app.log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    info!(
        "Starting {} (feed={}, events={})",
        config.app.service_name,
        config.replay.feed_path.display(),
        config.replay.events_path.display()
    );

    let report = run_replay(config).await.map_err(|e| {
        error!("Replay failed: {:#}", e);
        e
    })?;

    for change in &report.changes {
        println!("{}", serde_json::to_string(change)?);
    }
    for step in &report.engagements {
        println!("{}", serde_json::to_string(step)?);
    }

    if report.rejected() > 0 {
        info!(rejected = report.rejected(), "Some events were rejected");
    }
    Ok(())
}
