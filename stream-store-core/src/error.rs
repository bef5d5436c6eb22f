//! Error taxonomy for registry and history operations
//!
//! Every error is raised synchronously at the offending call, before any
//! state is mutated. The engine never catches its own errors.

use thiserror::Error;

/// Errors returned by [`StreamStore`](crate::StreamStore) and
/// [`StreamHistory`](crate::StreamHistory) operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `create_action` on a name that is already registered.
    #[error("there is a stream named `{0}` already registered")]
    DuplicateName(String),

    /// Dispatch, subscribe, effect-attach, or destroy on a name that was
    /// never created or has already been destroyed.
    #[error("no stream named `{0}` is registered")]
    UnknownAction(String),

    /// History lookup or restore on an index with no snapshot.
    #[error("no snapshot at index {0}")]
    IndexOutOfRange(usize),
}
