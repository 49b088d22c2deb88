//! Retained events keyed by sequence number.

use std::collections::BTreeMap;

use crate::event::Event;

/// The event log: one entry per applied sequence number, trimmable from
/// the tail. `head` is the smallest seqn still retained; watches cannot
/// start below it.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    entries: BTreeMap<i64, Event>,
    head: i64,
}

impl EventLog {
    pub fn record(&mut self, ev: Event) {
        self.entries.insert(ev.seqn, ev);
    }

    pub fn get(&self, seqn: i64) -> Option<&Event> {
        self.entries.get(&seqn)
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    /// Drops every entry with `seqn <= up_to` and advances `head` to
    /// `up_to + 1`. Trimming below the current head is a no-op, keeping
    /// the watermark monotonic.
    pub fn clean(&mut self, up_to: i64) {
        if up_to < self.head {
            return;
        }
        self.entries = self.entries.split_off(&(up_to + 1));
        self.head = up_to + 1;
    }

    /// Moves the head watermark forward without trimming entries. Used
    /// after a flush, which collapses gaps no watch may start inside.
    pub fn advance_head(&mut self, head: i64) {
        if head > self.head {
            self.head = head;
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
