use super::*;

/// Tests the current speaker holding the floor for the full threshold.
///
/// Verifies that unmuting starts a timer which, after 15 seconds without a
/// remute, advances the queue past the speaker.
///
/// Expected: next member becomes current speaker, no reminder
#[tokio::test(start_paused = true)]
async fn speaker_talking_past_threshold_advances_queue() {
    let (service, mut events) = service_with(&[ALICE, BOB]).await;

    service.on_mute_changed(CHANNEL, ALICE, true, false);
    sleep(SPEAK_THRESHOLD + Duration::from_secs(1)).await;

    assert_eq!(service.current_speaker(CHANNEL).await, Some(BOB));
    assert_eq!(positions(&service, CHANNEL).await, vec![(BOB, 1)]);

    let emitted = drain(&mut events);
    assert_eq!(emitted.len(), 1);
    assert!(matches!(
        emitted[0],
        QueueEvent::DisplayRefresh { channel_id: CHANNEL, .. }
    ));
    assert!(!service.timers.is_active((CHANNEL, ALICE)));
}

/// Tests the current speaker remuting before the threshold.
///
/// Expected: timer cancelled, no advance at the 15 second mark
#[tokio::test(start_paused = true)]
async fn remute_within_threshold_prevents_advance() {
    let (service, mut events) = service_with(&[ALICE, BOB]).await;

    service.on_mute_changed(CHANNEL, ALICE, true, false);
    sleep(Duration::from_secs(10)).await;
    service.on_mute_changed(CHANNEL, ALICE, false, true);

    sleep(SPEAK_THRESHOLD * 2).await;

    assert_eq!(service.current_speaker(CHANNEL).await, Some(ALICE));
    assert!(drain(&mut events).is_empty());
}

/// Tests a waiting member talking for the full threshold.
///
/// Verifies that a member who is not the current speaker gets a reminder and
/// that the queue is left untouched.
///
/// Expected: Reminder for the member, queue unchanged
#[tokio::test(start_paused = true)]
async fn non_speaker_talking_gets_reminder() {
    let (service, mut events) = service_with(&[ALICE, BOB]).await;

    service.on_mute_changed(CHANNEL, BOB, true, false);
    sleep(SPEAK_THRESHOLD + Duration::from_secs(1)).await;

    assert_eq!(
        drain(&mut events),
        vec![QueueEvent::Reminder {
            channel_id: CHANNEL,
            user_id: BOB,
        }]
    );
    assert_eq!(
        positions(&service, CHANNEL).await,
        vec![(ALICE, 1), (BOB, 2)]
    );
}

/// Tests a member outside any queue talking for the full threshold.
///
/// Expected: Reminder emitted and no queue created for the channel
#[tokio::test(start_paused = true)]
async fn unqueued_member_talking_gets_reminder() {
    let (service, mut events) = VoiceQueueService::new();

    service.on_mute_changed(OTHER_CHANNEL, CAROL, true, false);
    sleep(SPEAK_THRESHOLD + Duration::from_secs(1)).await;

    assert_eq!(
        drain(&mut events),
        vec![QueueEvent::Reminder {
            channel_id: OTHER_CHANNEL,
            user_id: CAROL,
        }]
    );
    assert_eq!(service.queue_count().await, 0);
}

/// Tests unmuting again while a timer is running.
///
/// Verifies that the second unmute replaces the first timer so the threshold is
/// measured from the latest unmute, and the queue advances exactly once.
///
/// Expected: single advance 15 seconds after the second unmute
#[tokio::test(start_paused = true)]
async fn repeated_unmute_restarts_timer() {
    let (service, mut events) = service_with(&[ALICE, BOB, CAROL]).await;

    service.on_mute_changed(CHANNEL, ALICE, true, false);
    sleep(Duration::from_secs(10)).await;
    service.on_mute_changed(CHANNEL, ALICE, true, false);
    assert_eq!(service.timers.len(), 1);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(service.current_speaker(CHANNEL).await, Some(ALICE));

    sleep(Duration::from_secs(6)).await;
    assert_eq!(service.current_speaker(CHANNEL).await, Some(BOB));
    assert_eq!(drain(&mut events).len(), 1);
}

/// Tests mute updates that don't change the self-mute flag.
///
/// Expected: no timer started or cancelled
#[tokio::test(start_paused = true)]
async fn unchanged_mute_state_is_ignored() {
    let (service, _events) = service_with(&[ALICE]).await;

    service.on_mute_changed(CHANNEL, ALICE, false, false);
    service.on_mute_changed(CHANNEL, ALICE, true, true);
    assert!(service.timers.is_empty());

    service.on_mute_changed(CHANNEL, ALICE, true, false);
    service.on_mute_changed(CHANNEL, ALICE, false, false);
    assert!(service.timers.is_active((CHANNEL, ALICE)));
}

/// Tests the timer callback directly when the member has become the speaker.
///
/// Verifies that the head check happens when the timer fires, not when it
/// starts: a member who was waiting at unmute time but reached position 1 in
/// the meantime is advanced.
///
/// Expected: advance instead of reminder
#[tokio::test(start_paused = true)]
async fn head_check_happens_at_fire_time() {
    let (service, mut events) = service_with(&[ALICE, BOB]).await;

    service.on_mute_changed(CHANNEL, BOB, true, false);
    sleep(Duration::from_secs(5)).await;
    service.leave(CHANNEL, ALICE).await;
    drain(&mut events);

    sleep(SPEAK_THRESHOLD).await;

    assert!(service.entries(CHANNEL).await.is_empty());
    let emitted = drain(&mut events);
    assert_eq!(emitted.len(), 1);
    assert!(matches!(emitted[0], QueueEvent::DisplayRefresh { .. }));
}

/// Tests shutting the service down with live timers.
///
/// Expected: every timer cancelled and nothing fires afterwards
#[tokio::test(start_paused = true)]
async fn shutdown_cancels_all_timers() {
    let (service, mut events) = service_with(&[ALICE, BOB]).await;

    service.on_mute_changed(CHANNEL, ALICE, true, false);
    service.on_mute_changed(CHANNEL, BOB, true, false);
    service.shutdown();

    sleep(SPEAK_THRESHOLD * 2).await;

    assert!(service.timers.is_empty());
    assert!(drain(&mut events).is_empty());
    assert_eq!(service.current_speaker(CHANNEL).await, Some(ALICE));
}
