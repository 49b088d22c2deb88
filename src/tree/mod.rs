//! Persistent path tree.
//!
//! The namespace is a tree of directory and file nodes keyed by path.
//! Nodes are immutable and structurally shared: applying a mutation copies
//! only the nodes on the path from the changed leaf to the root, so a
//! snapshot is an `Arc` clone and old snapshots never change.

mod node;

pub use node::Getter;
pub use node::Node;
