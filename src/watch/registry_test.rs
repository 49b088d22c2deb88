use std::sync::Arc;

use super::registry::Watch;
use super::registry::WatchRegistry;
use crate::event::Event;
use crate::glob::Any;
use crate::tree::Node;

fn event(seqn: i64, path: &str) -> Event {
    Event {
        seqn,
        path: path.to_string(),
        body: "x".to_string(),
        rev: seqn,
        mutation: format!("0:{path}=x"),
        err: None,
        getter: Node::default(),
    }
}

fn register(reg: &mut WatchRegistry, from: i64, to: i64) -> super::WatchHandle {
    let (watch, handle) = Watch::new(Any, from, to, 8);
    reg.add(Arc::new(watch));
    handle
}

#[test]
fn test_in_window_match_queues_notice() {
    let mut reg = WatchRegistry::default();
    let _handle = register(&mut reg, 1, i64::MAX);
    reg.notify(&event(1, "/a"));
    assert_eq!(reg.notice_count(), 1);
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_event_below_window_is_skipped_but_watch_survives() {
    let mut reg = WatchRegistry::default();
    let _handle = register(&mut reg, 5, i64::MAX);
    reg.notify(&event(3, "/a"));
    assert_eq!(reg.notice_count(), 0);
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_watch_retired_after_final_window_event() {
    let mut reg = WatchRegistry::default();
    let _handle = register(&mut reg, 1, 3);
    reg.notify(&event(1, "/a"));
    reg.notify(&event(2, "/b"));
    assert_eq!(reg.notice_count(), 2);
    assert_eq!(reg.len(), 0);
}

#[test]
fn test_event_at_or_past_to_drops_watch_without_notice() {
    let mut reg = WatchRegistry::default();
    let _handle = register(&mut reg, 1, 3);
    reg.notify(&event(3, "/a"));
    assert_eq!(reg.notice_count(), 0);
    assert_eq!(reg.len(), 0);
}

#[test]
fn test_stopped_watch_is_dropped() {
    let mut reg = WatchRegistry::default();
    let handle = register(&mut reg, 1, i64::MAX);
    handle.stop();
    reg.notify(&event(1, "/a"));
    assert_eq!(reg.notice_count(), 0);
    assert_eq!(reg.len(), 0);
}

#[test]
fn test_drop_of_handle_stops_watch() {
    let mut reg = WatchRegistry::default();
    let handle = register(&mut reg, 1, i64::MAX);
    drop(handle);
    reg.notify(&event(1, "/a"));
    assert_eq!(reg.len(), 0);
}

#[test]
fn test_into_receiver_disables_stop_on_drop() {
    let mut reg = WatchRegistry::default();
    let handle = register(&mut reg, 1, i64::MAX);
    let rx = handle.into_receiver();
    drop(rx);
    reg.notify(&event(1, "/a"));
    // Still live; retiring a dropped receiver happens at delivery time.
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_matcher_filters_paths() {
    let mut reg = WatchRegistry::default();
    let (watch, _handle) = Watch::new(|path: &str| path.starts_with("/svc/"), 1, i64::MAX, 8);
    reg.add(Arc::new(watch));
    reg.notify(&event(1, "/other"));
    assert_eq!(reg.notice_count(), 0);
    reg.notify(&event(2, "/svc/a"));
    assert_eq!(reg.notice_count(), 1);
}

#[test]
fn test_next_notice_discards_stopped_heads() {
    let mut reg = WatchRegistry::default();
    let stopped = register(&mut reg, 1, i64::MAX);
    let _live = register(&mut reg, 1, i64::MAX);
    reg.notify(&event(1, "/a"));
    assert_eq!(reg.notice_count(), 2);

    stopped.stop();
    let (watch, ev) = reg.next_notice().expect("live notice");
    assert!(!watch.is_stopped());
    assert_eq!(ev.seqn, 1);
    assert_eq!(reg.notice_count(), 1);
}

#[test]
fn test_backfill_respects_window_and_reports_liveness() {
    let mut reg = WatchRegistry::default();
    let (watch, _handle) = Watch::new(Any, 2, 4, 8);
    let watch = Arc::new(watch);

    assert!(reg.backfill(&watch, &event(1, "/a")));
    assert_eq!(reg.notice_count(), 0);

    assert!(reg.backfill(&watch, &event(2, "/b")));
    assert_eq!(reg.notice_count(), 1);

    // Final window event: notice queued, watch exhausted.
    assert!(!reg.backfill(&watch, &event(3, "/c")));
    assert_eq!(reg.notice_count(), 2);
}
