//! Voice state transitions relevant to speaking queues.
//!
//! Discord reports voice activity as full before/after `VoiceState` snapshots. The queue
//! only cares about two things: a member leaving the channel they were queued in, and a
//! member toggling self-mute while staying in the same channel.

use serenity::all::VoiceState;

/// The parts of a member's voice state the queue reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePresence {
    /// Voice channel the member is connected to, if any.
    pub channel_id: Option<u64>,
    /// Whether the member has muted themselves.
    pub self_mute: bool,
}

impl From<&VoiceState> for VoicePresence {
    fn from(state: &VoiceState) -> Self {
        Self {
            channel_id: state.channel_id.map(|id| id.get()),
            self_mute: state.self_mute,
        }
    }
}

/// A voice state change the queue service must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTransition {
    /// Member is no longer connected to `channel_id` (disconnected or moved away).
    LeftChannel { channel_id: u64 },
    /// Member toggled self-mute while staying in `channel_id`.
    MuteChanged {
        channel_id: u64,
        was_self_muted: bool,
        is_self_muted: bool,
    },
}

impl VoiceTransition {
    /// Derives the queue-relevant transition from a before/after pair.
    ///
    /// # Arguments
    /// - `old` - Previous presence, `None` when Discord didn't have it cached
    /// - `new` - Current presence
    ///
    /// # Returns
    /// - `Some(VoiceTransition)` - The change the queue service should process
    /// - `None` - Nothing queue-relevant happened (joining a channel, deafening, etc.)
    pub fn between(old: Option<VoicePresence>, new: VoicePresence) -> Option<Self> {
        let old = old?;
        let old_channel = old.channel_id?;

        if new.channel_id != Some(old_channel) {
            return Some(Self::LeftChannel {
                channel_id: old_channel,
            });
        }

        if old.self_mute != new.self_mute {
            return Some(Self::MuteChanged {
                channel_id: old_channel,
                was_self_muted: old.self_mute,
                is_self_muted: new.self_mute,
            });
        }

        None
    }
}
