use ranking_service::{jobs::run_rank_snapshot_job, Config};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the ranked page.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.service.log_format.eq_ignore_ascii_case("json") {
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
        "Starting {} (mode={}, catalog={})",
        config.service.service_name,
        config.job.mode,
        config.job.catalog_path.display()
    );

    let output = run_rank_snapshot_job(config).await.map_err(|e| {
        error!("Rank snapshot job failed: {:#}", e);
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
