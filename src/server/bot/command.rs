//! Slash command definitions.

use serenity::all::CreateCommand;

/// Joins the speaking queue of the caller's voice channel.
pub const QUEUE_COMMAND: &str = "queue";

/// Leaves the speaking queue of the caller's voice channel.
pub const LEAVE_COMMAND: &str = "leave";

/// Builds the slash commands registered on startup.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(QUEUE_COMMAND)
            .description("Join the speaking queue of your voice channel"),
        CreateCommand::new(LEAVE_COMMAND)
            .description("Leave the speaking queue of your voice channel"),
    ]
}
