use super::*;

/// Tests sweeping an empty queue past the idle limit.
///
/// Expected: queue dropped and counted
#[tokio::test]
async fn drops_empty_idle_queue() {
    let (service, _events) = service_with(&[ALICE]).await;
    service.leave(CHANNEL, ALICE).await;

    assert_eq!(service.sweep_idle(chrono::Duration::zero()).await, 1);
    assert_eq!(service.queue_count().await, 0);
}

/// Tests that sweeping keeps queues that still have members.
///
/// Expected: nothing dropped regardless of idle time
#[tokio::test]
async fn keeps_populated_queue() {
    let (service, _events) = service_with(&[ALICE]).await;

    assert_eq!(service.sweep_idle(chrono::Duration::zero()).await, 0);
    assert_eq!(service.current_speaker(CHANNEL).await, Some(ALICE));
}

/// Tests that sweeping keeps recently emptied queues.
///
/// Expected: nothing dropped while within the idle limit
#[tokio::test]
async fn keeps_recently_active_queue() {
    let (service, _events) = service_with(&[ALICE]).await;
    service.leave(CHANNEL, ALICE).await;

    assert_eq!(service.sweep_idle(chrono::Duration::hours(1)).await, 0);
    assert_eq!(service.queue_count().await, 1);
}

/// Tests that a swept channel starts over cleanly.
///
/// Expected: joining after a sweep creates a fresh queue without display
#[tokio::test]
async fn swept_channel_recreated_on_join() {
    let (service, _events) = service_with(&[ALICE]).await;
    service
        .attach_display(
            CHANNEL,
            DisplayHandle {
                channel_id: 50,
                message_id: 5000,
            },
        )
        .await;
    service.leave(CHANNEL, ALICE).await;
    service.sweep_idle(chrono::Duration::zero()).await;

    assert_eq!(
        service.join(CHANNEL, BOB).await,
        JoinOutcome::Admitted { position: 1 }
    );
    assert_eq!(service.display(CHANNEL).await, None);
}
