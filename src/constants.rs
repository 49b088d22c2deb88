//! Reserved revision values and the no-op mutation marker.

/// Revision reported for a path at which no file exists.
pub const MISSING: i64 = 0;

/// Caller-supplied revision requesting an unconditional write or delete.
pub const CLOBBER: i64 = -1;

/// Revision reported when the path names a directory rather than a file.
pub const DIR: i64 = -2;

/// Revision carried by the event of a no-op mutation.
pub const NOP: i64 = -3;

/// Mutation marker that is applied without decoding. It produces an event
/// for its sequence number but changes nothing; producers use it to fill
/// sequence gaps during bootstrap.
pub const NOP_MUTATION: &str = "nop:";
