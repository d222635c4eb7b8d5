use super::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;

mod mute;
mod sweep;

const CHANNEL: u64 = 900;
const OTHER_CHANNEL: u64 = 901;
const ALICE: u64 = 1;
const BOB: u64 = 2;
const CAROL: u64 = 3;

/// Collects every event emitted so far.
fn drain(events: &mut UnboundedReceiver<QueueEvent>) -> Vec<QueueEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Queue contents as `(user_id, position)` pairs.
async fn positions(service: &VoiceQueueService, channel_id: u64) -> Vec<(u64, usize)> {
    service
        .entries(channel_id)
        .await
        .iter()
        .map(|entry| (entry.user_id, entry.position))
        .collect()
}

/// Creates a service with `users` queued in `CHANNEL` and the join events drained.
async fn service_with(users: &[u64]) -> (VoiceQueueService, UnboundedReceiver<QueueEvent>) {
    let (service, mut events) = VoiceQueueService::new();
    for user in users {
        service.join(CHANNEL, *user).await;
    }
    drain(&mut events);
    (service, events)
}
