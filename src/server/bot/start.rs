use serenity::all::{Client, GatewayIntents};
use serenity::http::Http;
use std::sync::Arc;

use crate::server::{
    bot::handler::Handler, config::Config, error::AppError,
    service::voice_queue::VoiceQueueService,
};

/// Builds the Discord bot client.
///
/// Creates the client with the event handler owning the voice queue service, without
/// connecting yet. The HTTP client is returned separately so other services can send
/// and edit messages through the same connection.
///
/// # Arguments
/// - `config` - Application configuration
/// - `queues` - Voice queue service the handler forwards events to
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - Bot client and its shared HTTP client
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(
    config: &Config,
    queues: VoiceQueueService,
) -> Result<(Client, Arc<Http>), AppError> {
    // Configure gateway intents - what events the bot will receive
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let handler = Handler::new(queues, config.discord_guild_id);

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    let http = client.http.clone();

    Ok((client, http))
}

/// Starts the Discord bot in a blocking manner
///
/// Connects to the gateway and processes events until every shard shuts down.
///
/// # Arguments
/// - `client` - Client built by `init_bot`
///
/// # Returns
/// - `Ok(())` if the bot ran and shut down cleanly
/// - `Err(AppError)` if connecting to Discord failed
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    // Start the bot (this blocks until shutdown)
    client.start().await?;

    Ok(())
}
