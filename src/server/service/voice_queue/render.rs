//! Text rendering for queue display messages.

use crate::server::model::voice_queue::VoiceQueue;

const JOIN_HINT: &str = "Use `/queue` to join!";

/// Renders the display text for a speaking queue.
///
/// Members and channels are rendered as Discord mentions so the client resolves
/// display names. The output depends only on the queue contents, so rendering the
/// same state twice always produces the same text.
///
/// # Arguments
/// - `queue` - The queue to render, or `None` if the channel has no queue yet
///
/// # Returns
/// - `String` - Markdown message content
pub fn render_queue_text(queue: Option<&VoiceQueue>) -> String {
    let Some(queue) = queue.filter(|queue| !queue.is_empty()) else {
        return format!("🚂 **Speaking queue**\n\n📋 The queue is empty.\n\n{}", JOIN_HINT);
    };

    let mut text = format!("🚂 **Speaking queue in <#{}>**\n\n", queue.channel_id);

    if let Some(speaker) = queue.current_speaker() {
        text.push_str(&format!("**🎤 Now speaking:** <@{}>\n\n", speaker));
    }

    let waiting = &queue.entries()[1..];
    if waiting.is_empty() {
        text.push_str("📋 Nobody is waiting after the current speaker.\n");
    } else {
        text.push_str("📋 **Waiting:**\n");
        for entry in waiting {
            text.push_str(&format!("{}. <@{}>\n", entry.position, entry.user_id));
        }
    }

    text.push('\n');
    text.push_str(JOIN_HINT);
    text
}
