//! Voice speaking-queue service.
//!
//! This module provides the `VoiceQueueService`, which owns one `VoiceQueue` per voice
//! channel together with the activity timers that auto-advance a queue once its current
//! speaker has talked for long enough. The service performs no Discord I/O: it mutates
//! in-memory state and emits `QueueEvent`s for the bot adapter to act on.
//!
//! Mutations on the same channel are serialized by that queue's mutex, while different
//! channels proceed independently. Display refresh events are emitted while the queue
//! is still locked, so refreshes for a channel arrive in mutation order.
//!
//! The service is organized into separate modules by concern:
//! - `render` - Display text for a queue
//! - `timer` - Cancellable per-member activity timers

pub mod render;
pub mod timer;

#[cfg(test)]
mod test;

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::server::model::voice_queue::{
    AdvanceOutcome, DisplayHandle, JoinOutcome, LeaveOutcome, QueueEntry, QueueEvent, VoiceQueue,
};

use self::render::render_queue_text;
use self::timer::ActivityTimers;

/// How long a member must talk unmuted before the timer fires.
pub const SPEAK_THRESHOLD: Duration = Duration::from_secs(15);

type SharedQueue = Arc<Mutex<VoiceQueue>>;

/// Service owning every speaking queue and activity timer.
///
/// Cloning the service is cheap and every clone shares the same queues, timers and
/// event channel. It is created once at startup and handed to the bot handler and the
/// sweeper job.
#[derive(Clone)]
pub struct VoiceQueueService {
    /// Voice channel ID -> queue. Only locked long enough to look up or insert a queue.
    queues: Arc<RwLock<HashMap<u64, SharedQueue>>>,
    /// Live activity timers keyed by `(channel_id, user_id)`.
    timers: ActivityTimers,
    /// Outbound side effects for the bot adapter.
    events: mpsc::UnboundedSender<QueueEvent>,
}

impl VoiceQueueService {
    /// Creates a new service with no queues.
    ///
    /// # Returns
    /// - `(VoiceQueueService, UnboundedReceiver<QueueEvent>)` - The service and the
    ///   receiving end of its event channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueueEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();

        let service = Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
            timers: ActivityTimers::new(),
            events,
        };

        (service, receiver)
    }

    /// Adds a member to the tail of a channel's queue.
    ///
    /// Creates the queue if this is the first request for the channel. Emits a display
    /// refresh when the member is admitted.
    ///
    /// # Arguments
    /// - `channel_id` - Voice channel the member wants to speak in
    /// - `user_id` - Member requesting a spot
    ///
    /// # Returns
    /// - `JoinOutcome::Admitted { position }` - Member appended at `position`
    /// - `JoinOutcome::AlreadyQueued` - Member was already queued; nothing changed
    pub async fn join(&self, channel_id: u64, user_id: u64) -> JoinOutcome {
        let queue = self.queue_or_create(channel_id).await;
        let mut queue = queue.lock().await;

        let Some(position) = queue.add_user(user_id) else {
            tracing::debug!(
                "User {} is already queued in channel {}",
                user_id,
                channel_id
            );
            return JoinOutcome::AlreadyQueued;
        };

        tracing::info!(
            "User {} joined voice queue in channel {} at position {}",
            user_id,
            channel_id,
            position
        );
        self.emit_refresh(&queue);

        JoinOutcome::Admitted { position }
    }

    /// Removes a member from a channel's queue.
    ///
    /// Cancels the member's activity timer for the channel when they were removed.
    ///
    /// # Returns
    /// - `LeaveOutcome::Removed` - Member removed, followers shifted forward
    /// - `LeaveOutcome::NotQueued` - Member wasn't queued; nothing changed
    pub async fn leave(&self, channel_id: u64, user_id: u64) -> LeaveOutcome {
        let Some(queue) = self.queue(channel_id).await else {
            return LeaveOutcome::NotQueued;
        };
        let mut queue = queue.lock().await;

        if !queue.remove_user(user_id) {
            return LeaveOutcome::NotQueued;
        }

        self.timers.cancel((channel_id, user_id));

        tracing::info!(
            "User {} removed from voice queue in channel {}",
            user_id,
            channel_id
        );
        self.emit_refresh(&queue);

        LeaveOutcome::Removed
    }

    /// Removes the current speaker and promotes the next member.
    ///
    /// # Returns
    /// - `AdvanceOutcome::NewSpeaker(user_id)` - `user_id` is now at position 1
    /// - `AdvanceOutcome::Empty` - Nobody is left (or the queue was already empty)
    pub async fn advance(&self, channel_id: u64) -> AdvanceOutcome {
        let Some(queue) = self.queue(channel_id).await else {
            return AdvanceOutcome::Empty;
        };
        let mut queue = queue.lock().await;

        self.advance_locked(&mut queue)
    }

    /// Returns the member at position 1 of a channel's queue.
    pub async fn current_speaker(&self, channel_id: u64) -> Option<u64> {
        let queue = self.queue(channel_id).await?;
        let speaker = queue.lock().await.current_speaker();
        speaker
    }

    /// Returns a snapshot of a channel's queue entries in order.
    pub async fn entries(&self, channel_id: u64) -> Vec<QueueEntry> {
        let Some(queue) = self.queue(channel_id).await else {
            return Vec::new();
        };
        let queue = queue.lock().await;
        queue.entries().to_vec()
    }

    /// Handles a member toggling self-mute while staying in a channel.
    ///
    /// Unmuting starts a fresh activity timer for the member (replacing any running
    /// one); muting cancels it. An unchanged mute state is ignored.
    ///
    /// # Arguments
    /// - `channel_id` - Voice channel the member is in
    /// - `user_id` - Member whose mute state changed
    /// - `was_self_muted` - Self-mute flag before the change
    /// - `is_self_muted` - Self-mute flag after the change
    pub fn on_mute_changed(
        &self,
        channel_id: u64,
        user_id: u64,
        was_self_muted: bool,
        is_self_muted: bool,
    ) {
        match (was_self_muted, is_self_muted) {
            (false, true) => {
                if self.timers.cancel((channel_id, user_id)) {
                    tracing::debug!(
                        "Cancelled activity timer for user {} in channel {}",
                        user_id,
                        channel_id
                    );
                }
            }
            (true, false) => {
                let service = self.clone();
                self.timers
                    .start((channel_id, user_id), SPEAK_THRESHOLD, move || async move {
                        service.on_timer_fired(channel_id, user_id).await;
                    });
                tracing::debug!(
                    "Started activity timer for user {} in channel {}",
                    user_id,
                    channel_id
                );
            }
            _ => {}
        }
    }

    /// Handles a member's activity timer elapsing.
    ///
    /// If the member is the current speaker they have held the floor long enough and
    /// the queue advances. Otherwise they talked without holding the floor and a
    /// reminder is emitted; the queue is left untouched.
    pub(crate) async fn on_timer_fired(&self, channel_id: u64, user_id: u64) {
        if let Some(queue) = self.queue(channel_id).await {
            let mut queue = queue.lock().await;

            if queue.current_speaker() == Some(user_id) {
                let outcome = self.advance_locked(&mut queue);
                tracing::info!(
                    "Voice queue advanced in channel {} (speaker {} finished): {:?}",
                    channel_id,
                    user_id,
                    outcome
                );
                return;
            }
        }

        tracing::info!(
            "User {} spoke out of turn in channel {}, sending reminder",
            user_id,
            channel_id
        );
        self.emit(QueueEvent::Reminder {
            channel_id,
            user_id,
        });
    }

    /// Handles a member disconnecting from (or moving out of) a voice channel.
    ///
    /// Always cancels the member's activity timer for the channel, then removes them
    /// from its queue.
    pub async fn on_user_left_voice(&self, channel_id: u64, user_id: u64) -> LeaveOutcome {
        self.timers.cancel((channel_id, user_id));
        self.leave(channel_id, user_id).await
    }

    /// Renders the current display text for a channel's queue.
    pub async fn render_queue_text(&self, channel_id: u64) -> String {
        let Some(queue) = self.queue(channel_id).await else {
            return render_queue_text(None);
        };
        let queue = queue.lock().await;
        render_queue_text(Some(&queue))
    }

    /// Records the message displaying a channel's queue.
    ///
    /// Creates the queue if needed. Only attaches when no display is set yet, so two
    /// members posting a display at the same time end up with a single one. A refresh
    /// is emitted on attach so the message catches up with changes made while it was
    /// being posted.
    ///
    /// # Returns
    /// - `true` - `display` is now attached
    /// - `false` - Another display was already attached; `display` should be discarded
    pub async fn attach_display(&self, channel_id: u64, display: DisplayHandle) -> bool {
        let queue = self.queue_or_create(channel_id).await;
        let mut queue = queue.lock().await;

        if queue.display.is_some() {
            let message_id = display.message_id;
            tracing::debug!(
                "Voice queue in channel {} already has a display, not attaching message {}",
                channel_id,
                message_id
            );
            return false;
        }

        queue.display = Some(display);
        self.emit_refresh(&queue);

        true
    }

    /// Forgets a channel's display message, typically after it was deleted.
    ///
    /// Only clears the display if it is still `display`, so a newer message attached
    /// in the meantime is kept.
    ///
    /// # Returns
    /// - `true` - The display was cleared
    /// - `false` - No queue, or a different display is attached
    pub async fn clear_display(&self, channel_id: u64, display: DisplayHandle) -> bool {
        let Some(queue) = self.queue(channel_id).await else {
            return false;
        };
        let mut queue = queue.lock().await;

        if queue.display != Some(display) {
            return false;
        }

        queue.display = None;
        true
    }

    /// Returns the message currently displaying a channel's queue.
    pub async fn display(&self, channel_id: u64) -> Option<DisplayHandle> {
        let queue = self.queue(channel_id).await?;
        let display = queue.lock().await.display;
        display
    }

    /// Drops queues that are empty and haven't changed for longer than `max_idle`.
    ///
    /// Queues that are currently locked or referenced by an in-flight operation are
    /// kept and reconsidered on the next sweep.
    ///
    /// # Returns
    /// - `usize` - Number of queues dropped
    pub async fn sweep_idle(&self, max_idle: chrono::Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut queues = self.queues.write().await;
        let before = queues.len();

        queues.retain(|channel_id, queue| {
            if Arc::strong_count(queue) > 1 {
                return true;
            }

            let Ok(queue) = queue.try_lock() else {
                return true;
            };

            let expired = queue.is_empty() && queue.last_updated <= cutoff;
            if expired {
                tracing::debug!("Dropping idle voice queue for channel {}", channel_id);
            }
            !expired
        });

        before - queues.len()
    }

    /// Number of channels that currently have a queue.
    pub async fn queue_count(&self) -> usize {
        self.queues.read().await.len()
    }

    /// Cancels every live activity timer.
    pub fn shutdown(&self) {
        let cancelled = self.timers.cancel_all();
        tracing::info!(
            "Voice queue service shut down, cancelled {} activity timers",
            cancelled
        );
    }

    async fn queue(&self, channel_id: u64) -> Option<SharedQueue> {
        self.queues.read().await.get(&channel_id).cloned()
    }

    async fn queue_or_create(&self, channel_id: u64) -> SharedQueue {
        if let Some(queue) = self.queue(channel_id).await {
            return queue;
        }

        self.queues
            .write()
            .await
            .entry(channel_id)
            .or_insert_with(|| Arc::new(Mutex::new(VoiceQueue::new(channel_id))))
            .clone()
    }

    /// Pops the current speaker of an already locked queue.
    fn advance_locked(&self, queue: &mut VoiceQueue) -> AdvanceOutcome {
        let Some(previous) = queue.pop_speaker() else {
            return AdvanceOutcome::Empty;
        };

        self.emit_refresh(queue);

        match queue.current_speaker() {
            Some(next) => {
                tracing::info!(
                    "Voice queue in channel {} advanced from {} to {}",
                    queue.channel_id,
                    previous,
                    next
                );
                AdvanceOutcome::NewSpeaker(next)
            }
            None => {
                tracing::info!(
                    "Voice queue in channel {} advanced from {}, now empty",
                    queue.channel_id,
                    previous
                );
                AdvanceOutcome::Empty
            }
        }
    }

    fn emit_refresh(&self, queue: &VoiceQueue) {
        self.emit(QueueEvent::DisplayRefresh {
            channel_id: queue.channel_id,
            text: render_queue_text(Some(queue)),
            display: queue.display,
        });
    }

    fn emit(&self, event: QueueEvent) {
        if let Err(e) = self.events.send(event) {
            tracing::debug!("Dropped queue event, no receiver: {:?}", e.0);
        }
    }
}
