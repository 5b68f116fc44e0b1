//! Debug-only probe guard.
//!
//! Probes call into user code (`K: Eq`, the hasher). A key whose `eq`
//! reaches back into the table it is being compared in would observe a
//! half-updated slot array. In debug builds every table operation holds a
//! `ProbeGuard` and a nested entry panics; release builds compile it away.

#[cfg(debug_assertions)]
use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

/// Per-table nesting tracker.
#[derive(Debug)]
pub(crate) struct ProbeGuard {
    #[cfg(debug_assertions)]
    active: Cell<bool>,
}

impl ProbeGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(false),
        }
    }

    /// Marks the table busy until the returned token is dropped.
    #[inline]
    pub(crate) fn enter(&self) -> Busy<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.active.replace(true),
                "table re-entered while a probe was running"
            );
            Busy { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            Busy { _owner: PhantomData }
        }
    }
}

impl Default for ProbeGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ProbeGuard {
    // A copy starts idle regardless of the source.
    fn clone(&self) -> Self {
        Self::new()
    }
}

pub(crate) struct Busy<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(false);
    }
}
