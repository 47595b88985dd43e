use chrono::{Duration, Utc};
use tickler_core::{EventKind, EventPayload, EventStatus, ScheduledEvent};
use tickler_store::{EventQueue, StoreError};

fn event(id: &str, kind: EventKind, fire_at: chrono::DateTime<Utc>) -> ScheduledEvent {
    ScheduledEvent {
        event_id: id.to_string(),
        task_id: "task-1".to_string(),
        kind,
        fire_at,
        payload: EventPayload {
            description: "Submit report".to_string(),
            recipient: "user@example.com".to_string(),
            deadline_text: "2025-03-10 17:00".to_string(),
            reminder_texts: vec![],
        },
    }
}

#[test]
fn test_insert_and_lookup() {
    let queue = EventQueue::open_in_memory().unwrap();
    let fire_at = Utc::now() + Duration::hours(1);
    queue.insert(&event("e1", EventKind::Deadline, fire_at)).unwrap();

    let stored = queue.event("e1").unwrap().expect("event should exist");
    assert_eq!(stored.status, EventStatus::Pending);
    assert_eq!(stored.event.kind, EventKind::Deadline);
    assert_eq!(stored.event.payload.description, "Submit report");
    // Fire instants are persisted at millisecond precision.
    assert_eq!(
        stored.event.fire_at.timestamp_millis(),
        fire_at.timestamp_millis()
    );

    assert!(queue.event("missing").unwrap().is_none());
}

#[test]
fn test_duplicate_insert_rejected() {
    let queue = EventQueue::open_in_memory().unwrap();
    let fire_at = Utc::now();
    queue.insert(&event("e1", EventKind::Reminder, fire_at)).unwrap();

    let err = queue
        .insert(&event("e1", EventKind::Reminder, fire_at))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEvent(id) if id == "e1"));
}

#[test]
fn test_due_before_orders_by_fire_instant() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();

    // Inserted out of order on purpose.
    queue.insert(&event("e3", EventKind::Deadline, now - Duration::minutes(1))).unwrap();
    queue.insert(&event("e1", EventKind::Reminder, now - Duration::minutes(30))).unwrap();
    queue.insert(&event("e2", EventKind::Reminder, now - Duration::minutes(10))).unwrap();

    let due = queue.due_before(now).unwrap();
    let ids: Vec<_> = due.iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(ids, ["e1", "e2", "e3"]);
}

#[test]
fn test_due_before_ties_break_by_insertion_order() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();
    let fire_at = now - Duration::minutes(5);

    queue.insert(&event("first", EventKind::Confirmation, fire_at)).unwrap();
    queue.insert(&event("second", EventKind::Reminder, fire_at)).unwrap();

    let due = queue.due_before(now).unwrap();
    let ids: Vec<_> = due.iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(ids, ["first", "second"]);
}

#[test]
fn test_due_before_is_idempotent() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();
    queue.insert(&event("e1", EventKind::Reminder, now - Duration::seconds(1))).unwrap();

    assert_eq!(queue.due_before(now).unwrap().len(), 1);
    assert!(queue.due_before(now).unwrap().is_empty());

    // The claimed event is in flight, not pending.
    assert_eq!(queue.status("e1").unwrap(), Some(EventStatus::InFlight));
}

#[test]
fn test_due_before_ignores_future_events() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();
    queue.insert(&event("soon", EventKind::Reminder, now + Duration::minutes(10))).unwrap();

    assert!(queue.due_before(now).unwrap().is_empty());
    assert_eq!(queue.pending_count().unwrap(), 1);
}

#[test]
fn test_cancel_pending_event() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();
    queue.insert(&event("e1", EventKind::Reminder, now + Duration::hours(1))).unwrap();

    queue.cancel("e1").unwrap();
    assert!(queue.event("e1").unwrap().is_none());
    assert_eq!(queue.pending_count().unwrap(), 0);
}

#[test]
fn test_cancel_is_noop_for_missing_or_claimed_events() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();

    // Unknown id: fine.
    queue.cancel("missing").unwrap();

    // Already claimed: the event stays.
    queue.insert(&event("e1", EventKind::Reminder, now - Duration::seconds(1))).unwrap();
    queue.due_before(now).unwrap();
    queue.cancel("e1").unwrap();
    assert_eq!(queue.status("e1").unwrap(), Some(EventStatus::InFlight));
}

#[test]
fn test_resolve_records_terminal_state() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();
    queue.insert(&event("ok", EventKind::Reminder, now)).unwrap();
    queue.insert(&event("bad", EventKind::Reminder, now)).unwrap();
    queue.due_before(now).unwrap();

    queue.resolve("ok", EventStatus::Delivered, None).unwrap();
    queue
        .resolve("bad", EventStatus::Failed, Some("email: relay refused"))
        .unwrap();

    assert_eq!(queue.status("ok").unwrap(), Some(EventStatus::Delivered));
    let stored = queue.event("bad").unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Failed);
    assert_eq!(stored.error.as_deref(), Some("email: relay refused"));
}

#[test]
fn test_next_fire_at_tracks_earliest_pending() {
    let queue = EventQueue::open_in_memory().unwrap();
    assert!(queue.next_fire_at().unwrap().is_none());

    let now = Utc::now();
    let early = now + Duration::minutes(5);
    let late = now + Duration::hours(1);
    queue.insert(&event("late", EventKind::Deadline, late)).unwrap();
    queue.insert(&event("early", EventKind::Reminder, early)).unwrap();

    let next = queue.next_fire_at().unwrap().unwrap();
    assert_eq!(next.timestamp_millis(), early.timestamp_millis());
}

#[test]
fn test_restart_recovers_past_due_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.db");
    let now = Utc::now();

    {
        let queue = EventQueue::open(&path).unwrap();
        queue.insert(&event("past", EventKind::Reminder, now - Duration::hours(2))).unwrap();
        queue.insert(&event("future", EventKind::Deadline, now + Duration::hours(2))).unwrap();
    }

    // Simulated restart: the past-due event is immediately due, not dropped.
    let queue = EventQueue::open(&path).unwrap();
    let due = queue.due_before(Utc::now()).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].event_id, "past");
    assert_eq!(queue.pending_count().unwrap(), 1);
}

#[test]
fn test_restart_requeues_in_flight_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.db");
    let now = Utc::now();

    {
        let queue = EventQueue::open(&path).unwrap();
        queue.insert(&event("e1", EventKind::Reminder, now - Duration::seconds(1))).unwrap();
        // Claimed but never resolved: process dies mid-delivery.
        assert_eq!(queue.due_before(now).unwrap().len(), 1);
    }

    let queue = EventQueue::open(&path).unwrap();
    assert_eq!(queue.status("e1").unwrap(), Some(EventStatus::Pending));
    assert_eq!(queue.due_before(Utc::now()).unwrap().len(), 1);
}

#[test]
fn test_confirmation_payload_roundtrip() {
    let queue = EventQueue::open_in_memory().unwrap();
    let now = Utc::now();
    let mut confirmation = event("c1", EventKind::Confirmation, now);
    confirmation.payload.reminder_texts =
        vec!["2025-03-10 16:50".to_string(), "2025-03-10 16:55".to_string()];
    queue.insert(&confirmation).unwrap();

    let due = queue.due_before(now).unwrap();
    assert_eq!(due[0].payload.reminder_texts, confirmation.payload.reminder_texts);
}
