use std::collections::HashMap;
use std::sync::Arc;

use crate::codec;
use crate::constants::CLOBBER;
use crate::constants::DIR;
use crate::constants::MISSING;
use crate::constants::NOP;
use crate::constants::NOP_MUTATION;
use crate::errors::StoreError;
use crate::event::Event;

/// Read-only capability over one tree snapshot.
pub trait Getter {
    /// Gets the value stored at `path`, if any.
    ///
    /// For a file, returns `(vec![body], rev)`. For a directory, returns
    /// the sorted child names and [`DIR`]. Otherwise returns
    /// `(vec![], MISSING)`.
    fn get(&self, path: &str) -> (Vec<String>, i64);

    /// Returns `(body length, rev)` for a file, `(child count, DIR)` for a
    /// directory, and `(0, MISSING)` otherwise.
    fn stat(&self, path: &str) -> (u32, i64);

    /// The body of the file at `path`, or `None` if `path` is not a file.
    fn body(&self, path: &str) -> Option<String> {
        let (mut values, rev) = self.get(path);
        if rev > 0 {
            Some(values.swap_remove(0))
        } else {
            None
        }
    }
}

/// One node of the tree: a file with a body and the revision it was last
/// written at, or a directory of named children.
///
/// Cloning a `Node` is cheap; both variants are behind an [`Arc`].
#[derive(Debug, Clone)]
pub enum Node {
    File { body: Arc<str>, rev: i64 },
    Dir(Arc<HashMap<String, Node>>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Dir(Arc::new(HashMap::new()))
    }
}

enum Probe {
    File(i64),
    Dir,
    Missing,
    /// A strict ancestor of the target path is a file.
    Blocked,
}

impl Node {
    fn lookup(&self, parts: &[&str]) -> Option<&Node> {
        let mut cur = self;
        for part in parts {
            match cur {
                Node::Dir(children) => cur = children.get(*part)?,
                Node::File { .. } => return None,
            }
        }
        Some(cur)
    }

    #[cfg(test)]
    pub(crate) fn node_at(&self, path: &str) -> &Node {
        self.lookup(&codec::split(path)).expect("path present")
    }

    fn probe(&self, parts: &[&str]) -> Probe {
        let mut cur = self;
        for part in parts {
            match cur {
                Node::File { .. } => return Probe::Blocked,
                Node::Dir(children) => match children.get(*part) {
                    Some(child) => cur = child,
                    None => return Probe::Missing,
                },
            }
        }
        match cur {
            Node::File { rev, .. } => Probe::File(*rev),
            Node::Dir(_) => Probe::Dir,
        }
    }

    /// Applies one decoded-or-not mutation at sequence number `seqn`,
    /// returning the (possibly unchanged) new root and the event produced.
    ///
    /// Failed applications leave the tree untouched and carry the failure
    /// in the event; the sequence advances regardless.
    pub(crate) fn apply(&self, seqn: i64, mutation: &str) -> (Node, Event) {
        if mutation == NOP_MUTATION {
            let ev = Event {
                seqn,
                path: String::new(),
                body: String::new(),
                rev: NOP,
                mutation: mutation.to_string(),
                err: None,
                getter: self.clone(),
            };
            return (self.clone(), ev);
        }

        let decoded = match codec::decode(mutation) {
            Ok(d) => d,
            Err(e) => {
                let ev = Event {
                    seqn,
                    path: String::new(),
                    body: String::new(),
                    rev: MISSING,
                    mutation: mutation.to_string(),
                    err: Some(e),
                    getter: self.clone(),
                };
                return (self.clone(), ev);
            }
        };

        let parts = codec::split(decoded.path);
        let mut ev = Event {
            seqn,
            path: decoded.path.to_string(),
            body: String::new(),
            rev: MISSING,
            mutation: mutation.to_string(),
            err: None,
            getter: self.clone(),
        };

        let cur_rev = match self.probe(&parts) {
            Probe::Dir => {
                ev.rev = DIR;
                ev.err = Some(StoreError::RevMismatch);
                return (self.clone(), ev);
            }
            Probe::Blocked => {
                ev.err = Some(StoreError::RevMismatch);
                return (self.clone(), ev);
            }
            Probe::File(rev) => rev,
            Probe::Missing => MISSING,
        };

        if decoded.rev != CLOBBER && decoded.rev != cur_rev {
            ev.err = Some(StoreError::RevMismatch);
            return (self.clone(), ev);
        }

        if decoded.keep {
            let root = set(self, &parts, decoded.body, seqn);
            ev.rev = seqn;
            ev.body = decoded.body.to_string();
            ev.getter = root.clone();
            (root, ev)
        } else {
            let root = del(self, &parts);
            ev.getter = root.clone();
            (root, ev)
        }
    }
}

impl Getter for Node {
    fn get(&self, path: &str) -> (Vec<String>, i64) {
        if codec::check_path(path).is_err() {
            return (Vec::new(), MISSING);
        }
        match self.lookup(&codec::split(path)) {
            Some(Node::File { body, rev }) => (vec![body.to_string()], *rev),
            Some(Node::Dir(children)) => {
                let mut names: Vec<String> = children.keys().cloned().collect();
                names.sort();
                (names, DIR)
            }
            None => (Vec::new(), MISSING),
        }
    }

    fn stat(&self, path: &str) -> (u32, i64) {
        if codec::check_path(path).is_err() {
            return (0, MISSING);
        }
        match self.lookup(&codec::split(path)) {
            Some(Node::File { body, rev }) => (body.len() as u32, *rev),
            Some(Node::Dir(children)) => (children.len() as u32, DIR),
            None => (0, MISSING),
        }
    }
}

fn set(node: &Node, parts: &[&str], body: &str, rev: i64) -> Node {
    match parts {
        [] => Node::File {
            body: Arc::from(body),
            rev,
        },
        [head, rest @ ..] => {
            let mut children = match node {
                Node::Dir(children) => HashMap::clone(children),
                Node::File { .. } => HashMap::new(),
            };
            let child = children.remove(*head).unwrap_or_default();
            children.insert((*head).to_string(), set(&child, rest, body, rev));
            Node::Dir(Arc::new(children))
        }
    }
}

fn is_empty_dir(node: &Node) -> bool {
    matches!(node, Node::Dir(children) if children.is_empty())
}

fn del(node: &Node, parts: &[&str]) -> Node {
    let Node::Dir(children) = node else {
        return node.clone();
    };
    match parts {
        [] => node.clone(),
        [leaf] => {
            let mut children = HashMap::clone(children);
            children.remove(*leaf);
            Node::Dir(Arc::new(children))
        }
        [head, rest @ ..] => match children.get(*head) {
            None => node.clone(),
            Some(child) => {
                let new_child = del(child, rest);
                let mut children = HashMap::clone(children);
                if is_empty_dir(&new_child) {
                    children.remove(*head);
                } else {
                    children.insert((*head).to_string(), new_child);
                }
                Node::Dir(Arc::new(children))
            }
        },
    }
}
