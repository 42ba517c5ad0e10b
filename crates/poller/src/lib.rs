//! Scheduler and Task Runner: the agent's tick loop. Every
//! `scheduler_interval_secs`, due crontab entries are fanned out to a
//! bounded worker pool; each worker runs one task invocation end to end.

use std::collections::HashSet;
use std::sync::Arc;

use agent_core::Settings;
use db::PgPool;
use time::OffsetDateTime;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub mod scheduler;
pub mod task_runner;

pub use scheduler::is_due;
pub use task_runner::{run_task, TaskRunnerError};

/// Drives the tick loop until `shutdown` is cancelled.
///
/// `running` tracks cron ids currently executing in this process. It is
/// an in-memory guard against double-dispatch within a single agent, not
/// a cross-process lock — the `mon.crontab.status` column is the only
/// thing multiple agent instances can safely coordinate on.
pub struct Scheduler {
    pool: PgPool,
    settings: Settings,
    running: Arc<Mutex<HashSet<i64>>>,
    permits: Arc<Semaphore>,
    tasks: Mutex<JoinSet<()>>,
}

impl Scheduler {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let permits = Arc::new(Semaphore::new(settings.monitor.max_workers));
        Self {
            pool,
            settings,
            running: Arc::new(Mutex::new(HashSet::new())),
            permits,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(
            self.settings.monitor.scheduler_interval_secs,
        ));

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("scheduler shutting down, waiting for in-flight tasks");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        let mut tasks = self.tasks.lock().await;
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "spawned task panicked during shutdown drain");
            }
        }
        tracing::info!("scheduler stopped");
    }

    async fn tick(&self) {
        let crontab = match db::get_active_crontab(&self.pool, &self.settings.monitor.agent_name).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "failed to load crontab");
                return;
            }
        };

        let now = OffsetDateTime::now_utc();

        for entry in crontab {
            if !is_due(&entry, now) {
                continue;
            }

            {
                let mut running = self.running.lock().await;
                if running.contains(&entry.cron_id) {
                    continue;
                }
                running.insert(entry.cron_id);
            }

            let pool = self.pool.clone();
            let monitor_settings = self.settings.monitor.clone();
            let running = self.running.clone();
            let permits = self.permits.clone();
            let cron_id = entry.cron_id;

            self.tasks.lock().await.spawn(async move {
                let _permit = permits.acquire().await.expect("semaphore never closed");
                if let Err(e) = run_task(&pool, &monitor_settings, &entry).await {
                    tracing::error!(cron_id, error = %e, "task invocation failed");
                }
                running.lock().await.remove(&cron_id);
            });
        }
    }
}
