mod server;

use crate::server::{
    bot,
    config::Config,
    error::AppError,
    scheduler::queue_sweeper,
    service::{queue_notification::QueueNotificationService, voice_queue::VoiceQueueService},
    startup,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let (queues, queue_events) = VoiceQueueService::new();

    tracing::info!("Starting voice queue bot");

    // Initialize Discord bot and extract HTTP client
    let (bot_client, discord_http) = bot::start::init_bot(&config, queues.clone()).await?;

    // Carry out queue side effects on Discord
    let notifications = QueueNotificationService::new(discord_http, queues.clone());
    tokio::spawn(notifications.run(queue_events));

    // Start idle queue sweeper
    let sweeper_queues = queues.clone();
    let max_idle = config.queue_idle_expiry;
    tokio::spawn(async move {
        if let Err(e) = queue_sweeper::start_scheduler(sweeper_queues, max_idle).await {
            tracing::error!("Voice queue sweeper error: {}", e);
        }
    });

    tokio::spawn(startup::shutdown_on_ctrl_c(bot_client.shard_manager.clone()));

    // Run the bot until every shard shuts down
    let result = bot::start::start_bot(bot_client).await;

    queues.shutdown();

    result
}
