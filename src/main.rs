use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use agent_core::Settings;

const DB_CONNECT_RETRIES: u32 = 3;
const DB_CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    // Use `RUST_LOG=snmp_poller=info` (or trace/debug/warn/error) to control
    // level. Defaults to `info` if RUST_LOG is not set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    tracing::info!("agent starting");

    let settings = Settings::load().expect("failed to load configuration from environment");

    let pool = connect_with_retry(&settings).await;

    let shutdown = tokio_util::sync::CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    let scheduler = poller::Scheduler::new(pool, settings);
    scheduler.run(shutdown).await;

    tracing::info!("agent stopped");
}

/// Database unreachability at startup is Fatal (spec §7): retry a bounded
/// number of times with a fixed delay, then abort the process rather than
/// spin forever against a database that will never come up.
async fn connect_with_retry(settings: &Settings) -> db::PgPool {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match db::create_pool(settings).await {
            Ok(pool) => return pool,
            Err(e) if attempt < DB_CONNECT_RETRIES => {
                tracing::warn!(attempt, error = %e, "database connection failed, retrying");
                tokio::time::sleep(DB_CONNECT_RETRY_DELAY).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "database unreachable after {} attempts, aborting", DB_CONNECT_RETRIES);
                std::process::exit(1);
            }
        }
    }
}
