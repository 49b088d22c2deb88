use std::cmp;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::Command;
use super::Op;
use super::State;
use crate::errors::Result;
use crate::errors::StoreError;
use crate::log::EventLog;
use crate::pending::PendingQueue;
use crate::tree::Node;
use crate::watch::Watch;
use crate::watch::WatchRegistry;

/// The single-writer event loop.
///
/// Owns the tree, the event log, the pending heap, the watch set and the
/// notice queue; nothing else touches them. Each iteration services
/// exactly one input (an operation, a control command, or one notice
/// delivery), then drains every operation whose turn has come.
pub(crate) struct Dispatcher {
    ops_rx: mpsc::Receiver<Op>,
    cmd_rx: mpsc::Receiver<Command>,
    state: Arc<ArcSwap<State>>,
    version: i64,
    root: Node,
    pending: PendingQueue,
    log: EventLog,
    registry: WatchRegistry,
}

impl Dispatcher {
    pub(crate) fn new(
        ops_rx: mpsc::Receiver<Op>,
        cmd_rx: mpsc::Receiver<Command>,
        state: Arc<ArcSwap<State>>,
    ) -> Self {
        let published = state.load_full();
        let (version, root) = (published.version, published.root.clone());
        Dispatcher {
            ops_rx,
            cmd_rx,
            state,
            version,
            root,
            pending: PendingQueue::default(),
            log: EventLog::default(),
            registry: WatchRegistry::default(),
        }
    }

    pub(crate) async fn run(mut self) {
        debug!("store dispatcher started");
        let mut cmd_open = true;

        loop {
            let notice = self.registry.next_notice();
            let has_notice = notice.is_some();
            let notice_watch = notice.as_ref().map(|(watch, _)| watch.clone());

            let mut flush = false;
            let mut flush_reply: Option<oneshot::Sender<i64>> = None;

            tokio::select! {
                op = self.ops_rx.recv() => {
                    match op {
                        // Producers closed the ops channel: shut down.
                        None => break,
                        Some(op) => {
                            if op.seqn > self.version {
                                self.pending.push(op);
                            }
                        }
                    }
                }

                cmd = self.cmd_rx.recv(), if cmd_open => {
                    match cmd {
                        None => cmd_open = false,
                        Some(Command::Register { watch, reply }) => {
                            self.register(watch, reply);
                        }
                        Some(Command::Clean(up_to)) => {
                            self.log.clean(up_to);
                        }
                        Some(Command::Version(tx)) => {
                            let _ = tx.send(self.version);
                        }
                        Some(Command::WatcherCount(tx)) => {
                            let _ = tx.send(self.registry.len());
                        }
                        Some(Command::Flush(tx)) => {
                            // Absorb every operation already queued by the
                            // producer so the collapse sees all of them.
                            while let Ok(op) = self.ops_rx.try_recv() {
                                if op.seqn > self.version {
                                    self.pending.push(op);
                                }
                            }
                            flush = true;
                            flush_reply = Some(tx);
                        }
                    }
                }

                sent = async move {
                    let (watch, ev) = notice.expect("guarded on has_notice");
                    watch.tx.send(ev).await
                }, if has_notice => {
                    if sent.is_err() {
                        // Receiver gone without a stop: retire the watch.
                        warn!("watch receiver dropped, retiring watch");
                        if let Some(watch) = notice_watch {
                            watch.stop();
                        }
                    }
                    self.registry.pop_notice();
                }
            }

            self.drain(flush);

            if let Some(tx) = flush_reply {
                let _ = tx.send(self.version);
            }
        }

        debug!(version = self.version, "store dispatcher stopped");
        // Dropping the registry closes every watcher channel.
    }

    /// Applies every pending operation whose turn has come. With `flush`
    /// set, gaps are jumped instead of waited out, per-op events are
    /// neither logged nor delivered, and only the final event is recorded.
    fn drain(&mut self, flush: bool) {
        let mut last_event = None;

        while let Some(top) = self.pending.peek_seqn() {
            if flush && self.version < top {
                self.version = top - 1;
            }
            if top > self.version + 1 {
                break;
            }
            let Some(op) = self.pending.pop() else {
                break;
            };
            if op.seqn < self.version + 1 {
                // Duplicate or stale.
                continue;
            }

            let (root, ev) = self.root.apply(op.seqn, &op.mutation);
            trace!(seqn = ev.seqn, path = %ev.path, "applied");
            self.root = root;
            self.version = ev.seqn;
            self.publish();

            if !flush {
                self.log.record(ev.clone());
                self.registry.notify(&ev);
            }
            last_event = Some(ev);
        }

        if flush {
            if let Some(ev) = last_event {
                self.log.record(ev);
            }
            self.log.advance_head(self.version + 1);
        }
    }

    /// Backfills a registering watch from the log, then adds it to the
    /// live set if any of its window remains. Registrations below the log
    /// head are rejected and never receive an event.
    fn register(&mut self, watch: Watch, reply: oneshot::Sender<Result<()>>) {
        if self.log.head() > watch.from {
            let _ = reply.send(Err(StoreError::TooLate));
            return;
        }

        let watch = Arc::new(watch);
        let mut live = true;
        let replay_end = cmp::min(watch.to, self.version + 1);
        for seqn in watch.from..replay_end {
            if let Some(ev) = self.log.get(seqn) {
                live = self.registry.backfill(&watch, ev);
                if !live {
                    break;
                }
            }
        }

        if live {
            debug!(from = watch.from, to = watch.to, "watch registered");
            self.registry.add(watch);
        }
        let _ = reply.send(Ok(()));
    }

    fn publish(&self) {
        self.state.store(Arc::new(State {
            version: self.version,
            root: self.root.clone(),
        }));
    }
}
