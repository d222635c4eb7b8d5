//! Ready event handler for bot initialization.
//!
//! This module handles the `ready` event which is fired when the bot successfully
//! connects to Discord's gateway and completes the initial handshake. This is the
//! first event received after authentication and indicates the bot is ready to
//! process other events.
//!
//! The ready handler is used to:
//! - Log connection information
//! - Register the queue slash commands

use serenity::all::{Command, Context, GuildId, Ready};

use crate::server::bot::command;

/// Handles the ready event when the bot connects to Discord.
///
/// Registers the slash commands in the configured guild, or globally when no guild
/// is configured. Guild commands show up immediately while global commands can take
/// a while to propagate, which makes the guild option useful during development.
///
/// # Arguments
/// - `ctx` - Discord context for registering commands
/// - `ready` - Ready event data containing bot user information
/// - `command_guild_id` - Guild to register commands in, if any
pub async fn handle_ready(ctx: Context, ready: Ready, command_guild_id: Option<u64>) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    let commands = command::definitions();

    let result = match command_guild_id {
        Some(guild_id) => GuildId::new(guild_id).set_commands(&ctx.http, commands).await,
        None => Command::set_global_commands(&ctx.http, commands).await,
    };

    match result {
        Ok(registered) => {
            tracing::info!(
                "Registered {} slash commands ({})",
                registered.len(),
                command_guild_id
                    .map(|id| format!("guild {}", id))
                    .unwrap_or_else(|| "global".to_string())
            );
        }
        Err(e) => {
            tracing::error!("Failed to register slash commands: {:?}", e);
        }
    }
}
