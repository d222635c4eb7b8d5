use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::AppError, service::voice_queue::VoiceQueueService};

/// Starts the idle queue sweeper
///
/// This scheduler runs every five minutes and drops queues that are empty and haven't
/// changed for at least `max_idle`, so channels that were used once don't keep a queue
/// around for the life of the process.
///
/// # Arguments
/// - `queues`: Voice queue service to sweep
/// - `max_idle`: How long an empty queue may sit unchanged
pub async fn start_scheduler(
    queues: VoiceQueueService,
    max_idle: chrono::Duration,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    // Schedule job to run every five minutes
    let job = Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
        let queues = queues.clone();

        Box::pin(async move {
            let dropped = queues.sweep_idle(max_idle).await;
            let remaining = queues.queue_count().await;
            if dropped > 0 {
                tracing::info!(
                    "Dropped {} idle voice queues, {} remaining",
                    dropped,
                    remaining
                );
            } else {
                tracing::debug!("No idle voice queues to drop, {} active", remaining);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Voice queue sweeper started");

    Ok(())
}
