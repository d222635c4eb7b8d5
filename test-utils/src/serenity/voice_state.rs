//! Test factory for creating Serenity VoiceState objects.

use serde_json::json;
use serenity::all::VoiceState;

/// Creates a test Serenity VoiceState for a member.
///
/// Creates a VoiceState object by deserializing JSON with the provided values. The
/// member payload is omitted and every flag other than self-mute is `false`.
///
/// # Arguments
/// - `guild_id` - Discord guild ID (snowflake)
/// - `channel_id` - Voice channel the member is in, `None` when disconnected
/// - `user_id` - Discord user ID of the member
/// - `self_mute` - Whether the member has muted themselves
///
/// # Returns
/// - `VoiceState` - A valid Serenity VoiceState struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a VoiceState (indicates invalid test data)
///
/// # Examples
///
/// ```rust,ignore
/// use test_utils::serenity::voice_state::create_test_voice_state;
///
/// // Member connected and talking
/// let state = create_test_voice_state(123456789, Some(555), 42, false);
///
/// // Same member after disconnecting
/// let state = create_test_voice_state(123456789, None, 42, false);
/// ```
pub fn create_test_voice_state(
    guild_id: u64,
    channel_id: Option<u64>,
    user_id: u64,
    self_mute: bool,
) -> VoiceState {
    serde_json::from_value(json!({
        "channel_id": channel_id.map(|id| id.to_string()),
        "deaf": false,
        "guild_id": guild_id.to_string(),
        "member": null,
        "mute": false,
        "self_deaf": false,
        "self_mute": self_mute,
        "self_stream": false,
        "self_video": false,
        "session_id": format!("session-{}", user_id),
        "suppress": false,
        "user_id": user_id.to_string(),
        "request_to_speak_timestamp": null
    }))
    .expect("Failed to create test voice state")
}
