//! Integration Tests for the Event Bus
//!
//! Exercises the suspend/resume scenario the bus exists for: a consumer
//! saves a resume timestamp, misses events while suspended, and catches up
//! on re-subscription within the retention window.

use std::sync::Arc;

use datasync_core::{BusConfig, Clock, Driver, EventBus, ManualClock, Replay};

// == Domain Events ==

#[derive(Debug, PartialEq, Eq)]
struct MemberDeleted {
    member_id: u64,
}

#[derive(Debug, PartialEq, Eq)]
struct MemberRenamed {
    member_id: u64,
    name: String,
}

fn build_bus() -> (Arc<EventBus>, Arc<ManualClock>) {
    init_tracing();
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(clock.clone(), BusConfig::default()));
    (bus, clock)
}

/// Logging honors RUST_LOG when the tests run with --nocapture.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// == Suspend / Resume ==

#[tokio::test]
async fn test_consumer_catches_up_after_suspension() {
    let (bus, clock) = build_bus();
    let deletions = Driver::<MemberDeleted>::new(Arc::clone(&bus));

    // Consumer is live, then suspends, remembering the clock time
    let mut live = deletions.subscribe_live();
    clock.advance(1_000);
    deletions.post(MemberDeleted { member_id: 1 });
    assert_eq!(live.next().await.unwrap().member_id, 1);

    // Suspends after processing event 1; the resume point is saved later
    // than that event's stamp so it is not replayed again
    clock.advance(500);
    let suspended_at = clock.now();
    drop(live);

    // Deletions happen while the consumer is down
    clock.advance(5_000);
    deletions.post(MemberDeleted { member_id: 2 });
    clock.advance(5_000);
    deletions.post(MemberDeleted { member_id: 3 });

    // Re-subscribe from the saved timestamp: both missed events replay,
    // then the stream continues with live events
    let mut resumed = deletions.subscribe(Replay::Since(suspended_at));
    assert_eq!(resumed.next().await.unwrap().member_id, 2);
    assert_eq!(resumed.next().await.unwrap().member_id, 3);

    deletions.post(MemberDeleted { member_id: 4 });
    assert_eq!(resumed.next().await.unwrap().member_id, 4);
}

#[tokio::test]
async fn test_replay_lower_bound_is_inclusive() {
    let (bus, clock) = build_bus();
    let driver = Driver::<MemberDeleted>::new(Arc::clone(&bus));

    clock.advance(100);
    driver.post(MemberDeleted { member_id: 1 });
    clock.advance(100);
    let t2 = clock.now();
    driver.post(MemberDeleted { member_id: 2 });
    clock.advance(100);
    driver.post(MemberDeleted { member_id: 3 });

    let mut stream = driver.subscribe(Replay::Since(t2));
    assert_eq!(stream.next().await.unwrap().member_id, 2);
    assert_eq!(stream.next().await.unwrap().member_id, 3);
    assert!(stream.try_next().is_none());
}

#[tokio::test]
async fn test_fresh_consumer_sees_no_history() {
    let (bus, _clock) = build_bus();
    let driver = Driver::<MemberDeleted>::new(Arc::clone(&bus));

    driver.post(MemberDeleted { member_id: 1 });
    driver.post(MemberDeleted { member_id: 2 });

    let mut stream = driver.subscribe_live();
    assert!(stream.try_next().is_none());

    driver.post(MemberDeleted { member_id: 3 });
    assert_eq!(stream.next().await.unwrap().member_id, 3);
}

// == Retention Window ==

#[tokio::test]
async fn test_events_expire_after_retention_window() {
    let (bus, clock) = build_bus();
    let driver = Driver::<MemberDeleted>::new(Arc::clone(&bus));

    driver.post(MemberDeleted { member_id: 1 });
    clock.advance(60_000);
    driver.post(MemberDeleted { member_id: 2 });

    // 130s after the first post: only the second event remains replayable
    clock.advance(70_000);
    let mut stream = driver.subscribe(Replay::Since(0));
    assert_eq!(stream.next().await.unwrap().member_id, 2);
    assert!(stream.try_next().is_none());
}

#[tokio::test]
async fn test_custom_ttl_respected() {
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(clock.clone(), BusConfig { ttl_seconds: 5 }));
    let driver = Driver::<MemberDeleted>::new(Arc::clone(&bus));

    driver.post(MemberDeleted { member_id: 1 });
    clock.advance(4_000);
    assert_eq!(bus.retained_len(), 1);

    clock.advance(2_000);
    assert_eq!(bus.retained_len(), 0);
}

// == Kind Filtering ==

#[tokio::test]
async fn test_drivers_filter_by_event_kind() {
    let (bus, _clock) = build_bus();
    let deletions = Driver::<MemberDeleted>::new(Arc::clone(&bus));
    let renames = Driver::<MemberRenamed>::new(Arc::clone(&bus));

    deletions.post(MemberDeleted { member_id: 1 });
    renames.post(MemberRenamed {
        member_id: 2,
        name: "ada".to_string(),
    });
    deletions.post(MemberDeleted { member_id: 3 });

    let mut deleted = deletions.subscribe(Replay::Since(0));
    assert_eq!(deleted.next().await.unwrap().member_id, 1);
    assert_eq!(deleted.next().await.unwrap().member_id, 3);
    assert!(deleted.try_next().is_none());

    let mut renamed = renames.subscribe(Replay::Since(0));
    assert_eq!(renamed.next().await.unwrap().name, "ada");
    assert!(renamed.try_next().is_none());
}

// == Cancellation ==

#[tokio::test]
async fn test_cancelling_one_subscriber_leaves_others_untouched() {
    let (bus, _clock) = build_bus();
    let driver = Driver::<MemberDeleted>::new(Arc::clone(&bus));

    let dropped = driver.subscribe_live();
    let mut first = driver.subscribe_live();
    let mut second = driver.subscribe_live();
    drop(dropped);

    driver.post(MemberDeleted { member_id: 7 });
    assert_eq!(first.next().await.unwrap().member_id, 7);
    assert_eq!(second.next().await.unwrap().member_id, 7);
    assert_eq!(bus.retained_len(), 1);
}

// == Concurrency ==

#[tokio::test]
async fn test_concurrent_posters_all_delivered() {
    let (bus, _clock) = build_bus();
    let driver = Driver::<MemberDeleted>::new(Arc::clone(&bus));
    let mut stream = driver.subscribe(Replay::Since(0));

    let mut joins = Vec::new();
    for id in 0..16u64 {
        let poster = Driver::<MemberDeleted>::new(Arc::clone(&bus));
        joins.push(tokio::spawn(async move {
            poster.post(MemberDeleted { member_id: id });
        }));
    }
    for join in joins {
        join.await.unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..16 {
        seen.push(stream.next().await.unwrap().member_id);
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..16u64).collect::<Vec<_>>());
}
