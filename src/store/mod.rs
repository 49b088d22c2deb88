//! The store handle and its single-writer dispatcher.
//!
//! A [`Store`] owns one spawned dispatcher task. Producers feed sequenced
//! operations through the channel returned by [`Store::ops`]; the
//! dispatcher applies them in seqn order, appends the resulting events to
//! the log, and fans them out to watches. Readers never touch the
//! dispatcher: [`Store::snap`] is a single atomic pointer load of the
//! published `(version, root)` pair.

mod dispatcher;


use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

use crate::config::StoreConfig;
use crate::constants::DIR;
use crate::constants::MISSING;
use crate::errors::Result;
use crate::errors::StoreError;
use crate::glob::Any;
use crate::glob::Glob;
use crate::glob::PathMatcher;
use crate::tree::Getter;
use crate::tree::Node;
use crate::watch::Watch;
use crate::watch::WatchHandle;
use self::dispatcher::Dispatcher;

/// An operation to apply at position `seqn`.
///
/// Operations may arrive in any order; the store holds early arrivals
/// until the sequence reaches them. Duplicates and operations at or below
/// the current version are silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub seqn: i64,
    pub mutation: String,
}

/// The atomically published pair read by snapshotters.
#[derive(Debug)]
pub(crate) struct State {
    pub(crate) version: i64,
    pub(crate) root: Node,
}

/// Control requests multiplexed into the dispatcher alongside operations
/// and notice delivery.
pub(crate) enum Command {
    Register {
        watch: Watch,
        reply: oneshot::Sender<Result<()>>,
    },
    Clean(i64),
    Version(oneshot::Sender<i64>),
    WatcherCount(oneshot::Sender<usize>),
    Flush(oneshot::Sender<i64>),
}

/// Sequenced, observable, in-memory key/value store.
///
/// Cloning the handle is cheap; all clones drive the same dispatcher.
/// The store shuts down once every operation sender (the handle's own
/// included) is gone, at which point all watcher channels close.
#[derive(Clone)]
pub struct Store {
    ops_tx: mpsc::Sender<Op>,
    cmd_tx: mpsc::Sender<Command>,
    state: Arc<ArcSwap<State>>,
    config: StoreConfig,
}

impl Store {
    /// Creates an empty store at version 0 and starts its dispatcher.
    /// Must be called within a tokio runtime.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let (ops_tx, ops_rx) = mpsc::channel(config.ops_capacity);
        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_capacity);
        let state = Arc::new(ArcSwap::from_pointee(State {
            version: 0,
            root: Node::default(),
        }));

        tokio::spawn(Dispatcher::new(ops_rx, cmd_rx, state.clone()).run());

        Store {
            ops_tx,
            cmd_tx,
            state,
            config,
        }
    }

    /// The producer-side channel. Send `Op{seqn, mutation}` to mutate the
    /// store; drop every sender to shut it down.
    pub fn ops(&self) -> mpsc::Sender<Op> {
        self.ops_tx.clone()
    }

    /// A point-in-time snapshot of the store: the version and the
    /// immutable tree as of that version, from one atomic load.
    pub fn snap(&self) -> (i64, Node) {
        let state = self.state.load();
        (state.version, state.root.clone())
    }

    /// Gets the value stored at `path` in the current snapshot. See
    /// [`Getter::get`] for the return convention.
    pub fn get(&self, path: &str) -> (Vec<String>, i64) {
        let (_, root) = self.snap();
        root.get(path)
    }

    /// Stats `path` in the current snapshot. See [`Getter::stat`].
    pub fn stat(&self, path: &str) -> (u32, i64) {
        let (_, root) = self.snap();
        root.stat(path)
    }

    /// The current version, answered by the dispatcher itself: each call
    /// corresponds to one dispatcher iteration.
    pub async fn seqns(&self) -> Result<i64> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Version(tx)).await?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    /// The number of live watches.
    pub async fn watcher_count(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::WatcherCount(tx)).await?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    /// Applies every queued operation even if the sequence has gaps,
    /// jumping the version across them. Only the final event is recorded,
    /// and no watches are notified. Returns the version reached.
    ///
    /// This is for bootstrapping a store from a snapshot of another; it
    /// is not useful during normal operation.
    pub async fn flush(&self) -> Result<i64> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Flush(tx)).await?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    /// Discards log entries with `seqn <= up_to`. Watches can no longer
    /// start at or below `up_to`.
    pub async fn clean(&self, up_to: i64) -> Result<()> {
        self.command(Command::Clean(up_to)).await
    }

    /// Subscribes to every future event whose path `matcher` accepts,
    /// starting just past the current version. The subscription lives
    /// until the receiver is dropped or the store shuts down.
    pub async fn watch<M: PathMatcher>(&self, matcher: M) -> Result<mpsc::Receiver<crate::Event>> {
        let (version, _) = self.snap();
        let handle = self.watch_on(Box::new(matcher), version + 1, i64::MAX, None).await?;
        Ok(handle.into_receiver())
    }

    /// Subscribes from sequence number `from` onward, replaying retained
    /// events first. Fails with [`StoreError::TooLate`] when `from` is
    /// below the log head.
    pub async fn watch_from<M: PathMatcher>(&self, matcher: M, from: i64) -> Result<WatchHandle> {
        self.watch_on(Box::new(matcher), from, i64::MAX, None).await
    }

    /// Returns a receiver for the single event at position `seqn`, which
    /// may lie in the past (replayed from the log) or the future.
    pub async fn wait(&self, seqn: i64) -> Result<mpsc::Receiver<crate::Event>> {
        let handle = self.watch_on(Box::new(Any), seqn, seqn + 1, Some(1)).await?;
        Ok(handle.into_receiver())
    }

    /// Returns a tree snapshot in which `path` exists as a regular file,
    /// waiting for it to be set if necessary.
    pub async fn sync_path(&self, path: &str) -> Result<Node> {
        let glob = Glob::compile(path)?;
        let (version, _) = self.snap();
        let mut handle = self.watch_on(Box::new(glob), version + 1, i64::MAX, None).await?;

        let (_, root) = self.snap();
        let (_, rev) = root.get(path);
        if rev != DIR && rev != MISSING {
            return Ok(root);
        }

        while let Some(ev) = handle.recv().await {
            if ev.is_set() {
                return Ok(ev.getter().clone());
            }
        }
        Err(StoreError::Closed)
    }

    async fn watch_on(
        &self,
        matcher: Box<dyn PathMatcher>,
        from: i64,
        to: i64,
        buffer: Option<usize>,
    ) -> Result<WatchHandle> {
        if from < 1 {
            return Err(StoreError::TooLate);
        }
        let buffer = buffer.unwrap_or(self.config.watch.watcher_buffer_size);
        let (watch, handle) = Watch::boxed(matcher, from, to, buffer);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(Command::Register {
            watch,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| StoreError::Closed)??;
        Ok(handle)
    }

    async fn command(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| StoreError::Closed)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
