//! The record emitted by applying one operation.

use crate::constants::MISSING;
use crate::errors::StoreError;
use crate::tree::Getter;
use crate::tree::Node;

/// One applied operation, as observed by watchers and the event log.
///
/// `seqn` is the sequence number the operation was applied at. `rev` is
/// the revision assigned to the written node: the seqn for a set,
/// [`MISSING`] for a delete, and a sentinel (with `err` set) for failed
/// applications. The event carries the tree snapshot as of `seqn`, so a
/// subscriber can resolve other paths at the same point in time.
#[derive(Debug, Clone)]
pub struct Event {
    pub seqn: i64,
    pub path: String,
    pub body: String,
    pub rev: i64,
    pub mutation: String,
    pub err: Option<StoreError>,
    pub(crate) getter: Node,
}

impl Event {
    /// The tree snapshot as of this event.
    pub fn getter(&self) -> &Node {
        &self.getter
    }

    /// True when this event records a successful write.
    pub fn is_set(&self) -> bool {
        self.err.is_none() && self.rev > 0
    }

    /// True when this event records a successful delete.
    pub fn is_del(&self) -> bool {
        self.err.is_none() && self.rev == MISSING && !self.path.is_empty()
    }
}

impl Getter for Event {
    fn get(&self, path: &str) -> (Vec<String>, i64) {
        self.getter.get(path)
    }

    fn stat(&self, path: &str) -> (u32, i64) {
        self.getter.stat(path)
    }
}
