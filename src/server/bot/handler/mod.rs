use serenity::all::{Context, EventHandler, Interaction, Ready, VoiceState};
use serenity::async_trait;

use crate::server::service::voice_queue::VoiceQueueService;

pub mod interaction;
pub mod ready;
pub mod voice;

/// Discord bot event handler
pub struct Handler {
    pub queues: VoiceQueueService,
    /// Guild to register slash commands in; global registration when `None`
    pub command_guild_id: Option<u64>,
}

impl Handler {
    pub fn new(queues: VoiceQueueService, command_guild_id: Option<u64>) -> Self {
        Self {
            queues,
            command_guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready, self.command_guild_id).await;
    }

    /// Called when a user invokes a slash command or other interaction
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.queues, ctx, interaction).await;
    }

    /// Called when a member joins, leaves, moves or toggles mute in voice
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice::handle_voice_state_update(&self.queues, ctx, old, new).await;
    }
}
