//! Slash command handling for speaking queues.
//!
//! `/queue` and `/leave` act on the queue of the voice channel the caller is
//! currently connected to, looked up from the guild's cached voice states. Replies are
//! ephemeral so queue chatter doesn't clutter the text channel. The first admission
//! into a queue without a display message posts one in the channel the command was
//! used in.

use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    Interaction,
};

use crate::server::{
    bot::command::{LEAVE_COMMAND, QUEUE_COMMAND},
    model::voice_queue::{JoinOutcome, LeaveOutcome},
    service::{queue_notification::post_queue_display, voice_queue::VoiceQueueService},
};

pub const GUILD_ONLY_REPLY: &str = "This command can only be used in a server.";
pub const NOT_IN_VOICE_REPLY: &str = "You need to be in a voice channel to use this command.";

/// Handles an incoming interaction, ignoring anything that isn't one of our commands.
pub async fn handle_interaction(queues: &VoiceQueueService, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let reply = match command.data.name.as_str() {
        QUEUE_COMMAND => handle_queue_command(queues, &ctx, &command).await,
        LEAVE_COMMAND => handle_leave_command(queues, &ctx, &command).await,
        other => {
            tracing::warn!("Received unknown command /{}", other);
            return;
        }
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(reply)
            .ephemeral(true),
    );

    if let Err(e) = command.create_response(&ctx.http, response).await {
        tracing::error!(
            "Failed to respond to /{} from user {}: {:?}",
            command.data.name,
            command.user.id,
            e
        );
    }
}

/// Runs `/queue` and returns the reply for the caller.
async fn handle_queue_command(
    queues: &VoiceQueueService,
    ctx: &Context,
    command: &CommandInteraction,
) -> String {
    let voice_channel_id = match caller_voice_channel(ctx, command) {
        Ok(channel_id) => channel_id,
        Err(reply) => return reply.to_string(),
    };
    let user_id = command.user.id.get();

    let outcome = queues.join(voice_channel_id, user_id).await;

    match outcome {
        JoinOutcome::Admitted { .. } => {
            if queues.display(voice_channel_id).await.is_none() {
                post_queue_display(&ctx.http, queues, command.channel_id, voice_channel_id)
                    .await;
            }
            join_reply(outcome, voice_channel_id, None)
        }
        JoinOutcome::AlreadyQueued => {
            let position = queues
                .entries(voice_channel_id)
                .await
                .iter()
                .find(|entry| entry.user_id == user_id)
                .map(|entry| entry.position);
            join_reply(outcome, voice_channel_id, position)
        }
    }
}

/// Runs `/leave` and returns the reply for the caller.
async fn handle_leave_command(
    queues: &VoiceQueueService,
    ctx: &Context,
    command: &CommandInteraction,
) -> String {
    let voice_channel_id = match caller_voice_channel(ctx, command) {
        Ok(channel_id) => channel_id,
        Err(reply) => return reply.to_string(),
    };

    let outcome = queues.leave(voice_channel_id, command.user.id.get()).await;

    leave_reply(outcome, voice_channel_id)
}

/// Looks up the voice channel the caller is connected to.
///
/// The cache guard is released before returning so it is never held across an await.
fn caller_voice_channel(ctx: &Context, command: &CommandInteraction) -> Result<u64, &'static str> {
    let guild_id = command.guild_id.ok_or(GUILD_ONLY_REPLY)?;

    let channel_id = ctx.cache.guild(guild_id).and_then(|guild| {
        guild
            .voice_states
            .get(&command.user.id)
            .and_then(|state| state.channel_id)
    });

    channel_id.map(|id| id.get()).ok_or(NOT_IN_VOICE_REPLY)
}

/// Reply to the caller of `/queue`.
///
/// `current_position` is where an already queued caller currently stands, if known.
pub fn join_reply(
    outcome: JoinOutcome,
    voice_channel_id: u64,
    current_position: Option<usize>,
) -> String {
    match outcome {
        JoinOutcome::Admitted { position: 1 } => format!(
            "You joined the speaking queue in <#{}> and have the floor 🎤",
            voice_channel_id
        ),
        JoinOutcome::Admitted { position } => format!(
            "You joined the speaking queue in <#{}> at position {}.",
            voice_channel_id, position
        ),
        JoinOutcome::AlreadyQueued => match current_position {
            Some(position) => format!(
                "You are already in the speaking queue in <#{}> at position {}.",
                voice_channel_id, position
            ),
            None => format!(
                "You are already in the speaking queue in <#{}>.",
                voice_channel_id
            ),
        },
    }
}

/// Reply to the caller of `/leave`.
pub fn leave_reply(outcome: LeaveOutcome, voice_channel_id: u64) -> String {
    match outcome {
        LeaveOutcome::Removed => format!(
            "You left the speaking queue in <#{}>.",
            voice_channel_id
        ),
        LeaveOutcome::NotQueued => format!(
            "You are not in the speaking queue in <#{}>.",
            voice_channel_id
        ),
    }
}
