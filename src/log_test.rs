use super::log::EventLog;
use crate::event::Event;
use crate::tree::Node;

fn event(seqn: i64) -> Event {
    Event {
        seqn,
        path: format!("/n{seqn}"),
        body: "x".to_string(),
        rev: seqn,
        mutation: format!("0:/n{seqn}=x"),
        err: None,
        getter: Node::default(),
    }
}

#[test]
fn test_record_and_get() {
    let mut log = EventLog::default();
    log.record(event(1));
    log.record(event(2));
    assert_eq!(log.get(1).unwrap().seqn, 1);
    assert_eq!(log.get(2).unwrap().seqn, 2);
    assert!(log.get(3).is_none());
    assert_eq!(log.head(), 0);
}

#[test]
fn test_clean_trims_and_advances_head() {
    let mut log = EventLog::default();
    for seqn in 1..=5 {
        log.record(event(seqn));
    }
    log.clean(3);
    assert_eq!(log.head(), 4);
    assert!(log.get(3).is_none());
    assert_eq!(log.get(4).unwrap().seqn, 4);
    assert_eq!(log.len(), 2);
}

#[test]
fn test_clean_below_head_is_a_no_op() {
    let mut log = EventLog::default();
    for seqn in 1..=5 {
        log.record(event(seqn));
    }
    log.clean(4);
    log.clean(2);
    assert_eq!(log.head(), 5);
    assert_eq!(log.get(5).unwrap().seqn, 5);
}

#[test]
fn test_advance_head_does_not_trim() {
    let mut log = EventLog::default();
    log.record(event(8));
    log.advance_head(9);
    assert_eq!(log.head(), 9);
    assert_eq!(log.get(8).unwrap().seqn, 8);

    log.advance_head(3);
    assert_eq!(log.head(), 9);
}
