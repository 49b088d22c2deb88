//! # seqstore
//!
//! The sequenced, observable, in-memory key/value store at the heart of a
//! coordination service. Clients submit mutations tagged with
//! monotonically increasing sequence numbers; the store applies them in
//! order, maintains a versioned hierarchical namespace with conditional
//! writes, emits one ordered event per applied mutation, and fans those
//! events out to subscribed watches filtered by path matchers.
//!
//! ## Features
//! - **Gapless ordering**: out-of-order operations are held until their
//!   turn; duplicates are dropped; every sequence number yields exactly
//!   one event.
//! - **Conditional writes**: mutations carry the revision they expect,
//!   with [`CLOBBER`] for unconditional writes.
//! - **O(1) snapshots**: the tree is persistent and structurally shared;
//!   a snapshot is one atomic pointer load.
//! - **Watches with backfill**: subscriptions replay retained events from
//!   their starting point, then stream live ones, in seqn order.
//! - **Bootstrap flush**: collapse sequence gaps into a single terminal
//!   state when restoring from a snapshot.
//!
//! ## Architecture
//!
//! ```text
//! producers ──Op{seqn,mut}──▶ ┌────────────┐ ──events──▶ watches
//!                             │ dispatcher │
//! control ──register/clean──▶ │ (1 task)   │ ──ArcSwap──▶ snapshots
//!                             └────────────┘
//! ```
//!
//! One spawned task owns all mutable state; readers share only the
//! atomically published `(version, root)` pair. The consensus layer that
//! decides sequence numbers, the network surface, and persistence are the
//! caller's responsibility.
//!
//! ## Example
//!
//! ```rust,ignore
//! use seqstore::{Glob, Op, Store};
//!
//! let store = Store::new();
//! let mut events = store.watch(Glob::compile("/svc/**")?).await?;
//!
//! store.ops().send(Op { seqn: 1, mutation: "0:/svc/a=addr".into() }).await?;
//!
//! let ev = events.recv().await.unwrap();
//! assert_eq!(ev.path, "/svc/a");
//! ```

mod codec;
pub mod config;
mod constants;
mod errors;
mod event;
mod glob;
mod log;
mod pending;
mod store;
mod tree;
mod watch;

pub use codec::decode;
pub use codec::encode_del;
pub use codec::encode_set;
pub use codec::must_encode_del;
pub use codec::must_encode_set;
pub use codec::Mutation;
pub use constants::CLOBBER;
pub use constants::DIR;
pub use constants::MISSING;
pub use constants::NOP;
pub use constants::NOP_MUTATION;
pub use errors::Result;
pub use errors::StoreError;
pub use event::Event;
pub use self::glob::Any;
pub use self::glob::Glob;
pub use self::glob::PathMatcher;
pub use store::Op;
pub use store::Store;
pub use tree::Getter;
pub use tree::Node;
pub use watch::WatchHandle;

#[cfg(test)]
mod errors_test;
#[cfg(test)]
mod event_test;
#[cfg(test)]
mod glob_test;
#[cfg(test)]
mod log_test;
#[cfg(test)]
mod pending_test;
