//! Mutation codec.
//!
//! Mutations travel through the surrounding replication layer as opaque
//! plain-text strings of the form `<rev>:<path>[=<body>]`. The presence of
//! `=` distinguishes a set from a delete; only the first `=` separates path
//! from body, so bodies may themselves contain `=` and may be empty.
//!
//! Paths are `/` alone, or one or more `/<segment>` repetitions where each
//! segment is a non-empty run of `[A-Za-z0-9.-]`.

use crate::errors::Result;
use crate::errors::StoreError;


/// A decoded mutation. `keep` is true for a set, false for a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation<'a> {
    pub path: &'a str,
    pub body: &'a str,
    pub rev: i64,
    pub keep: bool,
}

fn is_path_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'-'
}

/// Validates `path` against the store's path grammar.
pub(crate) fn check_path(path: &str) -> Result<()> {
    if path == "/" {
        return Ok(());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(StoreError::BadPath(path.to_string()));
    };
    if rest.is_empty() {
        return Err(StoreError::BadPath(path.to_string()));
    }
    for segment in rest.split('/') {
        if segment.is_empty() || !segment.bytes().all(is_path_char) {
            return Err(StoreError::BadPath(path.to_string()));
        }
    }
    Ok(())
}

/// Splits a well-formed path into its segments. The root splits into none.
pub(crate) fn split(path: &str) -> Vec<&str> {
    match path.strip_prefix('/') {
        None | Some("") => Vec::new(),
        Some(rest) => rest.split('/').collect(),
    }
}

/// Returns a mutation that sets the file at `path` to `body` iff `rev`
/// equals the file's revision at the time of application, or
/// unconditionally when `rev` is [`CLOBBER`].
///
/// [`CLOBBER`]: crate::CLOBBER
pub fn encode_set(path: &str, body: &str, rev: i64) -> Result<String> {
    check_path(path)?;
    Ok(format!("{rev}:{path}={body}"))
}

/// Returns a mutation that deletes the file at `path` iff `rev` equals the
/// file's revision at the time of application, or unconditionally when
/// `rev` is [`CLOBBER`].
///
/// [`CLOBBER`]: crate::CLOBBER
pub fn encode_del(path: &str, rev: i64) -> Result<String> {
    check_path(path)?;
    Ok(format!("{rev}:{path}"))
}

/// Like [`encode_set`] but panics on an invalid path. Simplifies building
/// mutations from static paths.
pub fn must_encode_set(path: &str, body: &str, rev: i64) -> String {
    match encode_set(path, body, rev) {
        Ok(m) => m,
        Err(e) => panic!("encode set {path:?}: {e}"),
    }
}

/// Like [`encode_del`] but panics on an invalid path.
pub fn must_encode_del(path: &str, rev: i64) -> String {
    match encode_del(path, rev) {
        Ok(m) => m,
        Err(e) => panic!("encode del {path:?}: {e}"),
    }
}

/// Decodes a mutation string.
pub fn decode(mutation: &str) -> Result<Mutation<'_>> {
    let (rev, rest) = mutation.split_once(':').ok_or(StoreError::BadMutation)?;
    let rev: i64 = rev.parse().map_err(|_| StoreError::BadMutation)?;

    match rest.split_once('=') {
        Some((path, body)) => {
            check_path(path)?;
            Ok(Mutation {
                path,
                body,
                rev,
                keep: true,
            })
        }
        None => {
            check_path(rest)?;
            Ok(Mutation {
                path: rest,
                body: "",
                rev,
                keep: false,
            })
        }
    }
}
