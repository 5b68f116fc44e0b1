//! Table errors and the fatal diagnostic path.

use crate::relocation::RelocationKind;

/// Conditions that break a table invariant.
///
/// The plain operations (`with_capacity`, `rehash`, `insert` on a static
/// table) treat these as fatal. The `try_*` variants hand them back instead.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A table needs at least one slot or bucket.
    #[error("zero is not a valid capacity")]
    ZeroCapacity,

    /// Open-addressing tables cannot hold more elements than slots.
    #[error("capacity {capacity} cannot hold the current {size} elements")]
    CapacityBelowSize { capacity: usize, size: usize },

    /// Every slot of a fixed-capacity table is occupied.
    #[error("table is full: all {capacity} slots are occupied")]
    Full { capacity: usize },

    /// A live element would have to be relocated under a policy that forbids it.
    #[error("elements with the {kind:?} relocation policy cannot be relocated")]
    Unrelocatable { kind: RelocationKind },
}

/// Reports a broken invariant and stops.
///
/// Logs at `error` level, then panics with the error text. Built with
/// `panic = "abort"` this terminates the process.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: TableError) -> ! {
    log::error!("fatal table error: {err}");
    panic!("{err}");
}

/// Unwraps a table result, treating the error as fatal.
#[track_caller]
pub(crate) fn or_fatal<T>(res: Result<T, TableError>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => fatal(e),
    }
}
