use super::event::Event;
use crate::constants::MISSING;
use crate::errors::StoreError;
use crate::tree::Node;

fn event(rev: i64, path: &str, err: Option<StoreError>) -> Event {
    Event {
        seqn: 1,
        path: path.to_string(),
        body: String::new(),
        rev,
        mutation: String::new(),
        err,
        getter: Node::default(),
    }
}

#[test]
fn test_is_set() {
    assert!(event(1, "/a", None).is_set());
    assert!(!event(MISSING, "/a", None).is_set());
    assert!(!event(1, "/a", Some(StoreError::RevMismatch)).is_set());
}

#[test]
fn test_is_del() {
    assert!(event(MISSING, "/a", None).is_del());
    assert!(!event(1, "/a", None).is_del());
    assert!(!event(MISSING, "", None).is_del());
    assert!(!event(MISSING, "/a", Some(StoreError::RevMismatch)).is_del());
}
