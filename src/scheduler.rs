use crate::config::Config;
use crate::session::SessionStore;
use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

/// Initialize and start the session maintenance scheduler.
///
/// Session lifetime is the transport layer's concern, not the dialog
/// core's: an hourly job drops conversations that have been idle longer
/// than the configured window.
pub async fn start_scheduler(config: Arc<Config>, sessions: Arc<SessionStore>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let idle_hours = config.session_idle_hours;
    info!(
        "Scheduling idle-session sweep (hourly, {}h window)",
        idle_hours
    );

    // Cron format: "second minute hour day month day_of_week"
    let job = Job::new_async("0 0 * * * *", move |_uuid, _l| {
        let sessions = Arc::clone(&sessions);
        Box::pin(async move {
            let removed = sessions.sweep_idle(chrono::Duration::hours(idle_hours)).await;
            info!(
                "⏰ Idle sweep done: {} removed, {} live",
                removed,
                sessions.len().await
            );
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("✓ Scheduler started");

    Ok(scheduler)
}
