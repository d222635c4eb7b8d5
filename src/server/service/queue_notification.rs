//! Queue notification service for Discord message management.
//!
//! This module provides the `QueueNotificationService`, which consumes the `QueueEvent`s
//! emitted by the voice queue service and carries them out against Discord: editing the
//! message that displays a queue and sending reminder DMs to members who talk out of
//! turn. Discord failures are logged and never fed back into queue state, except for a
//! deleted display message which is detached and posted again.

use serenity::all::{ChannelId, CreateMessage, EditMessage, MessageId, UserId};
use serenity::http::{Http, HttpError};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::server::{
    model::voice_queue::{DisplayHandle, QueueEvent},
    service::voice_queue::VoiceQueueService,
};

/// Direct message sent to members who talk for a while without holding the floor.
pub const REMINDER_TEXT: &str = "Remember to use `/queue` to join the speaking queue 🚂";

/// How a failed display edit is recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEditFailure {
    /// The message is gone; detach it and post a new one in the same channel.
    Deleted,
    /// Anything else; keep the display and wait for the next refresh.
    Other,
}

impl DisplayEditFailure {
    /// Classifies a failed edit by the HTTP status Discord answered with, if any.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(404) => Self::Deleted,
            _ => Self::Other,
        }
    }

    pub fn from_error(error: &serenity::Error) -> Self {
        Self::from_status(http_status(error))
    }
}

/// Service carrying out queue side effects on Discord.
pub struct QueueNotificationService {
    /// Discord HTTP client for editing display messages and sending DMs
    http: Arc<Http>,
    /// Queue service, used to replace display messages that no longer exist
    queues: VoiceQueueService,
}

impl QueueNotificationService {
    /// Creates a new QueueNotificationService instance.
    ///
    /// # Arguments
    /// - `http` - Arc-wrapped Discord HTTP client for API requests
    /// - `queues` - Voice queue service whose events are being handled
    ///
    /// # Returns
    /// - `QueueNotificationService` - New service instance
    pub fn new(http: Arc<Http>, queues: VoiceQueueService) -> Self {
        Self { http, queues }
    }

    /// Handles queue events until the sending side is dropped.
    ///
    /// Events are processed one at a time, so display edits for a channel are applied
    /// in the order the queue changed.
    ///
    /// # Arguments
    /// - `events` - Receiving end of the queue service's event channel
    pub async fn run(self, mut events: UnboundedReceiver<QueueEvent>) {
        tracing::info!("Queue notification service started");

        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }

        tracing::info!("Queue event channel closed, notification service stopping");
    }

    /// Carries out a single queue event.
    pub async fn handle(&self, event: QueueEvent) {
        match event {
            QueueEvent::DisplayRefresh {
                channel_id,
                text,
                display,
            } => self.update_queue_display(channel_id, text, display).await,
            QueueEvent::Reminder {
                channel_id,
                user_id,
            } => self.send_queue_reminder(channel_id, user_id).await,
        }
    }

    /// Edits the message displaying a queue.
    ///
    /// Skipped when no display message is attached; one is posted the next time a
    /// member joins through `/queue`. A display that Discord reports as missing is
    /// detached and posted again in the same text channel.
    ///
    /// # Arguments
    /// - `voice_channel_id` - Voice channel whose queue changed
    /// - `text` - Rendered queue text
    /// - `display` - Display message attached when the queue changed
    async fn update_queue_display(
        &self,
        voice_channel_id: u64,
        text: String,
        display: Option<DisplayHandle>,
    ) {
        let Some(display) = display else {
            tracing::debug!(
                "No display attached for voice queue in channel {}, skipping refresh",
                voice_channel_id
            );
            return;
        };

        let edit_message = EditMessage::new().content(text);

        let Err(e) = self
            .http
            .edit_message(
                ChannelId::new(display.channel_id),
                MessageId::new(display.message_id),
                &edit_message,
                vec![],
            )
            .await
        else {
            tracing::debug!(
                "Updated voice queue display for channel {}",
                voice_channel_id
            );
            return;
        };

        match DisplayEditFailure::from_error(&e) {
            DisplayEditFailure::Deleted => {
                tracing::warn!(
                    "Voice queue display for channel {} was deleted, posting a new one",
                    voice_channel_id
                );

                // A newer display may have been attached since this refresh was emitted
                if self.queues.clear_display(voice_channel_id, display).await {
                    post_queue_display(
                        &self.http,
                        &self.queues,
                        ChannelId::new(display.channel_id),
                        voice_channel_id,
                    )
                    .await;
                }
            }
            DisplayEditFailure::Other => {
                tracing::error!(
                    "Failed to update queue display for channel {}: {:?}",
                    voice_channel_id,
                    e
                );
            }
        }
    }

    /// Sends a reminder DM to a member who talked without holding the floor.
    ///
    /// Members with DMs closed simply don't get the reminder.
    async fn send_queue_reminder(&self, voice_channel_id: u64, user_id: u64) {
        let message = CreateMessage::new().content(REMINDER_TEXT);

        match UserId::new(user_id)
            .direct_message(&self.http, message)
            .await
        {
            Ok(_) => {
                tracing::info!(
                    "Voice queue reminder sent to user {} in channel {}",
                    user_id,
                    voice_channel_id
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to send voice queue reminder to user {}: {:?}",
                    user_id,
                    e
                );
            }
        }
    }
}

/// Posts a fresh display message for a queue and attaches it.
///
/// If another display got attached while this one was being posted, the new message
/// is deleted again so only one display per queue stays around. A failed post leaves
/// the queue without a display; the next admission tries again.
///
/// # Arguments
/// - `http` - Discord HTTP client
/// - `queues` - Voice queue service owning the queue
/// - `text_channel_id` - Text channel to post the display in
/// - `voice_channel_id` - Voice channel whose queue is displayed
///
/// # Returns
/// - `Some(DisplayHandle)` - The posted message is now the queue's display
/// - `None` - Posting failed or another display won
pub async fn post_queue_display(
    http: &Arc<Http>,
    queues: &VoiceQueueService,
    text_channel_id: ChannelId,
    voice_channel_id: u64,
) -> Option<DisplayHandle> {
    let text = queues.render_queue_text(voice_channel_id).await;
    let message = CreateMessage::new().content(text);

    let message = match text_channel_id.send_message(http, message).await {
        Ok(message) => message,
        Err(e) => {
            tracing::error!(
                "Failed to post voice queue display for channel {}: {:?}",
                voice_channel_id,
                e
            );
            return None;
        }
    };

    let display = DisplayHandle {
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
    };

    if queues.attach_display(voice_channel_id, display).await {
        tracing::debug!(
            "Posted voice queue display for channel {} as message {}",
            voice_channel_id,
            message.id
        );
        return Some(display);
    }

    if let Err(e) = http
        .delete_message(message.channel_id, message.id, None)
        .await
    {
        tracing::warn!(
            "Failed to delete duplicate voice queue display {}: {:?}",
            message.id,
            e
        );
    }

    None
}

/// HTTP status of a failed Discord API request.
fn http_status(error: &serenity::Error) -> Option<u16> {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            Some(response.status_code.as_u16())
        }
        _ => None,
    }
}
