use std::time::Duration;

use leakwatch_common::config::AppConfig;
use leakwatch_poller::poller::RegionPoller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "leakwatch_poller=info,leakwatch_engine=info,leakwatch_notifier=info".into()
            }),
        )
        .json()
        .init();

    tracing::info!("LeakWatch poller starting...");

    // Load configuration
    let config = AppConfig::from_env()?;
    let interval = config.poll_interval_secs.map(Duration::from_secs);

    let mut poller = RegionPoller::from_config(&config)?;

    tracing::info!(
        regions = config.regions.len(),
        cache = %config.cache_path.display(),
        poll_interval_secs = ?config.poll_interval_secs,
        "Region poller ready"
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        _ = run(&mut poller, interval) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("LeakWatch poller stopped.");
    Ok(())
}

/// Run a single cycle, or keep cycling every `interval` when one is set.
async fn run(poller: &mut RegionPoller, interval: Option<Duration>) {
    loop {
        for report in poller.run_cycle().await {
            println!("{report}");
        }

        match interval {
            Some(interval) => tokio::time::sleep(interval).await,
            None => break,
        }
    }
}
