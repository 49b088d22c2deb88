use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use crate::event::Event;
use crate::glob::PathMatcher;

/// Dispatcher-side subscription state. The window `[from, to)` and the
/// matcher are fixed at registration; only the stop flag is shared with
/// the caller's handle.
pub(crate) struct Watch {
    pub(crate) matcher: Box<dyn PathMatcher>,
    pub(crate) from: i64,
    pub(crate) to: i64,
    pub(crate) tx: mpsc::Sender<Event>,
    stop: Arc<AtomicBool>,
}

impl Watch {
    #[cfg(test)]
    pub(crate) fn new<M>(matcher: M, from: i64, to: i64, buffer: usize) -> (Watch, WatchHandle)
    where
        M: PathMatcher,
    {
        Self::boxed(Box::new(matcher), from, to, buffer)
    }

    /// Builds the dispatcher-side watch and the caller-side handle sharing
    /// one bounded channel and one stop flag.
    pub(crate) fn boxed(
        matcher: Box<dyn PathMatcher>,
        from: i64,
        to: i64,
        buffer: usize,
    ) -> (Watch, WatchHandle) {
        let (tx, rx) = mpsc::channel(buffer);
        let stop = Arc::new(AtomicBool::new(false));
        let watch = Watch {
            matcher,
            from,
            to,
            tx,
            stop: stop.clone(),
        };
        let handle = WatchHandle {
            events: rx,
            stop,
            stop_on_drop: true,
        };
        (watch, handle)
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Marks the watch stopped from the dispatcher side, e.g. when its
    /// receiver has gone away.
    pub(crate) fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

/// Caller side of a watch.
///
/// Receive events with [`recv`](WatchHandle::recv); cancel with
/// [`stop`](WatchHandle::stop) (idempotent, callable from any thread).
/// The channel closes once the watch is gone from the dispatcher and all
/// pending notices have drained.
#[derive(Debug)]
pub struct WatchHandle {
    events: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
    stop_on_drop: bool,
}

impl WatchHandle {
    /// Receives the next event, or `None` once the watch is finished.
    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Stops the watch. Already-queued notices are discarded lazily; no
    /// further events arrive apart from those already buffered in the
    /// channel.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn events_mut(&mut self) -> &mut mpsc::Receiver<Event> {
        &mut self.events
    }

    /// Consumes the handle and returns the bare receiver, disabling
    /// stop-on-drop. The watch then lives until the store shuts down or
    /// its window is exhausted; dropping the receiver lets the dispatcher
    /// retire it on the next delivery attempt.
    pub fn into_receiver(mut self) -> mpsc::Receiver<Event> {
        self.stop_on_drop = false;
        let (_tx, dummy) = mpsc::channel(1);
        std::mem::replace(&mut self.events, dummy)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if self.stop_on_drop {
            self.stop.store(true, Ordering::Release);
        }
    }
}

struct Notice {
    watch: Arc<Watch>,
    event: Event,
}

/// The live watch set plus the FIFO of matched-but-undelivered notices.
/// Owned exclusively by the dispatcher.
#[derive(Default)]
pub(crate) struct WatchRegistry {
    live: Vec<Arc<Watch>>,
    notices: VecDeque<Notice>,
}

impl WatchRegistry {
    pub fn add(&mut self, watch: Arc<Watch>) {
        self.live.push(watch);
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Matches one applied event against every live watch: stopped and
    /// exhausted watches drop out, in-window matches queue a notice, and a
    /// watch whose window ends at this event is retired after it.
    pub fn notify(&mut self, ev: &Event) {
        let mut kept = Vec::with_capacity(self.live.len());
        for watch in self.live.drain(..) {
            if watch.is_stopped() || ev.seqn >= watch.to {
                continue;
            }
            let last = ev.seqn == watch.to - 1;
            if ev.seqn >= watch.from && watch.matcher.matches(&ev.path) {
                trace!(seqn = ev.seqn, path = %ev.path, "notice queued");
                self.notices.push_back(Notice {
                    watch: watch.clone(),
                    event: ev.clone(),
                });
            }
            if !last {
                kept.push(watch);
            }
        }
        self.live = kept;
    }

    /// Replays one retained event to a watch being registered. Returns
    /// false once the watch is exhausted or stopped, ending the replay.
    pub fn backfill(&mut self, watch: &Arc<Watch>, ev: &Event) -> bool {
        if watch.is_stopped() || ev.seqn >= watch.to {
            return false;
        }
        if ev.seqn >= watch.from && watch.matcher.matches(&ev.path) {
            self.notices.push_back(Notice {
                watch: watch.clone(),
                event: ev.clone(),
            });
        }
        ev.seqn != watch.to - 1
    }

    /// Discards stopped watches from the head of the notice queue, then
    /// returns the head notice for the dispatcher to offer.
    pub fn next_notice(&mut self) -> Option<(Arc<Watch>, Event)> {
        while let Some(head) = self.notices.front() {
            if head.watch.is_stopped() {
                self.notices.pop_front();
            } else {
                return Some((head.watch.clone(), head.event.clone()));
            }
        }
        None
    }

    pub fn pop_notice(&mut self) {
        self.notices.pop_front();
    }

    #[cfg(test)]
    pub fn notice_count(&self) -> usize {
        self.notices.len()
    }
}
