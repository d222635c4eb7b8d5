//! Domain models for per-channel speaking queues.
//!
//! A `VoiceQueue` holds the members waiting to speak in one voice channel, in arrival
//! order. The entry at position 1 is the current speaker. Positions are derived from
//! the entry order and are renumbered after every mutation, so they always form the
//! contiguous range `1..=N`.

use chrono::{DateTime, Utc};

/// A member waiting in a speaking queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    /// Discord user ID of the queued member.
    pub user_id: u64,
    /// 1-based position in the queue; position 1 is the current speaker.
    pub position: usize,
    /// When the member was admitted to the queue.
    pub joined_at: DateTime<Utc>,
}

/// Reference to the Discord message currently displaying a queue.
///
/// The queue only remembers where its display lives; posting, editing and deleting
/// the message is up to the bot adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayHandle {
    /// Text channel the display message was posted in.
    pub channel_id: u64,
    /// ID of the display message.
    pub message_id: u64,
}

/// Speaking queue for a single voice channel.
#[derive(Debug, Clone)]
pub struct VoiceQueue {
    /// Discord voice channel ID this queue belongs to.
    pub channel_id: u64,
    entries: Vec<QueueEntry>,
    /// Timestamp of the last mutation (or creation).
    pub last_updated: DateTime<Utc>,
    /// Message currently displaying this queue, if one has been posted.
    pub display: Option<DisplayHandle>,
}

impl VoiceQueue {
    /// Creates an empty queue for a voice channel.
    pub fn new(channel_id: u64) -> Self {
        Self {
            channel_id,
            entries: Vec::new(),
            last_updated: Utc::now(),
            display: None,
        }
    }

    /// Entries in queue order.
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, user_id: u64) -> bool {
        self.entries.iter().any(|entry| entry.user_id == user_id)
    }

    /// Returns the member at position 1, if any.
    pub fn current_speaker(&self) -> Option<u64> {
        self.entries.first().map(|entry| entry.user_id)
    }

    /// Appends a member to the tail of the queue.
    ///
    /// # Arguments
    /// - `user_id` - Discord user ID to admit
    ///
    /// # Returns
    /// - `Some(position)` - Member was admitted at this position
    /// - `None` - Member was already queued; nothing changed
    pub fn add_user(&mut self, user_id: u64) -> Option<usize> {
        if self.contains(user_id) {
            return None;
        }

        let now = Utc::now();
        self.entries.push(QueueEntry {
            user_id,
            position: self.entries.len() + 1,
            joined_at: now,
        });
        self.last_updated = now;

        Some(self.entries.len())
    }

    /// Removes a member from the queue, shifting everyone behind them forward.
    ///
    /// # Returns
    /// - `true` - Member was removed
    /// - `false` - Member was not queued; nothing changed
    pub fn remove_user(&mut self, user_id: u64) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.user_id == user_id)
        else {
            return false;
        };

        self.entries.remove(index);
        self.renumber(index);
        self.last_updated = Utc::now();

        true
    }

    /// Pops the current speaker.
    ///
    /// # Returns
    /// - `Some(user_id)` - The member that was popped from position 1
    /// - `None` - The queue was empty; nothing changed
    pub fn pop_speaker(&mut self) -> Option<u64> {
        if self.entries.is_empty() {
            return None;
        }

        let removed = self.entries.remove(0);
        self.renumber(0);
        self.last_updated = Utc::now();

        Some(removed.user_id)
    }

    /// Recomputes positions from `from` onwards after a removal.
    fn renumber(&mut self, from: usize) {
        for (index, entry) in self.entries.iter_mut().enumerate().skip(from) {
            entry.position = index + 1;
        }
    }
}

/// Result of a request to join a speaking queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Member was appended at `position`.
    Admitted { position: usize },
    /// Member was already in the queue.
    AlreadyQueued,
}

/// Result of a request to leave a speaking queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Removed,
    NotQueued,
}

/// Result of advancing a speaking queue past its current speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The given member is now at position 1.
    NewSpeaker(u64),
    /// Nobody is left to speak.
    Empty,
}

/// Side effects emitted by the queue service for the bot adapter to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    /// Queue state changed; the display for `channel_id` should show `text`.
    DisplayRefresh {
        channel_id: u64,
        text: String,
        display: Option<DisplayHandle>,
    },
    /// `user_id` talked for the full threshold without being the current speaker.
    Reminder { channel_id: u64, user_id: u64 },
}
