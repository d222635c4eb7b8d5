//! Voice state handling for speaking queues.
//!
//! Each `voice_state_update` is reduced to a `VoiceTransition` and forwarded to the
//! queue service. Bots are ignored entirely: they can't use slash commands and
//! shouldn't be reminded to.

use serenity::all::{Context, VoiceState};

use crate::server::{
    model::voice_state::{VoicePresence, VoiceTransition},
    service::voice_queue::VoiceQueueService,
};

/// Handles the voice_state_update event when a member's voice state changes
pub async fn handle_voice_state_update(
    queues: &VoiceQueueService,
    ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    if is_bot(&ctx, &new) {
        return;
    }

    dispatch_voice_update(queues, old.as_ref(), &new).await;
}

/// Applies a member's voice state change to the queue service.
///
/// # Returns
/// - `Some(VoiceTransition)` - The transition that was applied
/// - `None` - The change didn't concern any queue
pub async fn dispatch_voice_update(
    queues: &VoiceQueueService,
    old: Option<&VoiceState>,
    new: &VoiceState,
) -> Option<VoiceTransition> {
    let user_id = new.user_id.get();
    let transition =
        VoiceTransition::between(old.map(VoicePresence::from), VoicePresence::from(new))?;

    match transition {
        VoiceTransition::LeftChannel { channel_id } => {
            tracing::debug!("User {} left voice channel {}", user_id, channel_id);
            queues.on_user_left_voice(channel_id, user_id).await;
        }
        VoiceTransition::MuteChanged {
            channel_id,
            was_self_muted,
            is_self_muted,
        } => {
            queues.on_mute_changed(channel_id, user_id, was_self_muted, is_self_muted);
        }
    }

    Some(transition)
}

/// Whether the voice state belongs to a bot account.
///
/// Falls back to the user cache when the gateway didn't include the member.
fn is_bot(ctx: &Context, state: &VoiceState) -> bool {
    if let Some(member) = &state.member {
        return member.user.bot;
    }

    ctx.cache
        .user(state.user_id)
        .map(|user| user.bot)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use test_utils::serenity::voice_state::create_test_voice_state;
    use tokio::time::sleep;

    use crate::server::model::voice_queue::QueueEvent;

    const GUILD: u64 = 100;
    const CHANNEL: u64 = 900;
    const OTHER_CHANNEL: u64 = 901;
    const ALICE: u64 = 1;
    const BOB: u64 = 2;

    /// Tests that disconnecting removes the member from the queue they were in.
    ///
    /// Expected: LeftChannel transition and the member is no longer queued
    #[tokio::test]
    async fn disconnect_removes_member_from_queue() {
        let (queues, _events) = VoiceQueueService::new();
        queues.join(CHANNEL, ALICE).await;
        queues.join(CHANNEL, BOB).await;

        let old = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, false);
        let new = create_test_voice_state(GUILD, None, ALICE, false);

        let transition = dispatch_voice_update(&queues, Some(&old), &new).await;

        assert_eq!(
            transition,
            Some(VoiceTransition::LeftChannel {
                channel_id: CHANNEL
            })
        );
        assert_eq!(queues.current_speaker(CHANNEL).await, Some(BOB));
    }

    /// Tests that moving to another channel counts as leaving the old one.
    ///
    /// Expected: member removed from the old channel's queue only
    #[tokio::test]
    async fn moving_channels_leaves_old_queue() {
        let (queues, _events) = VoiceQueueService::new();
        queues.join(CHANNEL, ALICE).await;
        queues.join(OTHER_CHANNEL, ALICE).await;

        let old = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, false);
        let new = create_test_voice_state(GUILD, Some(OTHER_CHANNEL), ALICE, false);

        dispatch_voice_update(&queues, Some(&old), &new).await;

        assert_eq!(queues.current_speaker(CHANNEL).await, None);
        assert_eq!(queues.current_speaker(OTHER_CHANNEL).await, Some(ALICE));
    }

    /// Tests that unmuting as the current speaker advances the queue after 15 seconds.
    ///
    /// Expected: the next member holds the floor once the timer fires
    #[tokio::test(start_paused = true)]
    async fn unmuted_speaker_is_advanced() {
        let (queues, _events) = VoiceQueueService::new();
        queues.join(CHANNEL, ALICE).await;
        queues.join(CHANNEL, BOB).await;

        let old = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, true);
        let new = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, false);

        let transition = dispatch_voice_update(&queues, Some(&old), &new).await;
        assert_eq!(
            transition,
            Some(VoiceTransition::MuteChanged {
                channel_id: CHANNEL,
                was_self_muted: true,
                is_self_muted: false,
            })
        );

        sleep(Duration::from_secs(16)).await;

        assert_eq!(queues.current_speaker(CHANNEL).await, Some(BOB));
    }

    /// Tests that talking without being queued produces a reminder.
    ///
    /// Expected: a Reminder event for the member once the timer fires
    #[tokio::test(start_paused = true)]
    async fn unqueued_talker_gets_reminder() {
        let (queues, mut events) = VoiceQueueService::new();

        let old = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, true);
        let new = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, false);
        dispatch_voice_update(&queues, Some(&old), &new).await;

        sleep(Duration::from_secs(16)).await;

        assert!(matches!(
            events.try_recv(),
            Ok(QueueEvent::Reminder {
                channel_id: CHANNEL,
                user_id: ALICE
            })
        ));
    }

    /// Tests that joining a channel for the first time is not queue-relevant.
    ///
    /// Expected: no transition and no queue created
    #[tokio::test]
    async fn joining_voice_is_ignored() {
        let (queues, _events) = VoiceQueueService::new();

        let old = create_test_voice_state(GUILD, None, ALICE, false);
        let new = create_test_voice_state(GUILD, Some(CHANNEL), ALICE, false);

        assert_eq!(dispatch_voice_update(&queues, Some(&old), &new).await, None);
        assert_eq!(dispatch_voice_update(&queues, None, &new).await, None);
        assert_eq!(queues.queue_count().await, 0);
    }
}
