//! Relocation policies.
//!
//! A table's policy parameter decides how a live element travels when the
//! table has to move it to new storage (open-addressing rehash and growth)
//! and whether the table can be deep-copied:
//!
//! | Policy     | Relocates by        | `Clone` for the table |
//! |------------|---------------------|-----------------------|
//! | `Movable`  | move                | yes (`T: Clone`)      |
//! | `MoveOnly` | move                | no                    |
//! | `Copyable` | clone, then drop    | yes (`T: Clone`)      |
//! | `Trivial`  | bitwise copy        | yes (`T: Copy`)       |
//! | `Neither`  | never (fatal)       | no                    |
//!
//! The policies are sealed marker types; the engine only ever goes through
//! [`relocate`].

use crate::error::TableError;

/// Runtime tag for a relocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelocationKind {
    Movable,
    MoveOnly,
    Copyable,
    Trivial,
    Neither,
}

mod sealed {
    pub trait Sealed {}
}

/// Elements may be moved or cloned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Movable;
/// Elements may be moved but never duplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOnly;
/// Elements travel by cloning; the original stays in place until the copy is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct Copyable;
/// Elements are plain bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial;
/// Elements are constructed once in place and never relocated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neither;

impl sealed::Sealed for Movable {}
impl sealed::Sealed for MoveOnly {}
impl sealed::Sealed for Copyable {}
impl sealed::Sealed for Trivial {}
impl sealed::Sealed for Neither {}

/// How an element of type `T` is relocated.
pub trait Relocation<T>: sealed::Sealed {
    const KIND: RelocationKind;

    /// Produces the element for its new home.
    ///
    /// Moving policies leave `None` behind. Copying policies leave `src`
    /// untouched; the old storage drops it later.
    fn relocate(src: &mut Option<T>) -> Result<Option<T>, TableError>;
}

/// Policies under which a whole table may be deep-copied.
pub trait Duplicate<T>: Relocation<T> {
    fn duplicate(src: &T) -> T;
}

impl<T> Relocation<T> for Movable {
    const KIND: RelocationKind = RelocationKind::Movable;

    #[inline]
    fn relocate(src: &mut Option<T>) -> Result<Option<T>, TableError> {
        Ok(src.take())
    }
}

impl<T> Relocation<T> for MoveOnly {
    const KIND: RelocationKind = RelocationKind::MoveOnly;

    #[inline]
    fn relocate(src: &mut Option<T>) -> Result<Option<T>, TableError> {
        Ok(src.take())
    }
}

impl<T: Clone> Relocation<T> for Copyable {
    const KIND: RelocationKind = RelocationKind::Copyable;

    #[inline]
    fn relocate(src: &mut Option<T>) -> Result<Option<T>, TableError> {
        Ok(src.clone())
    }
}

impl<T: Copy> Relocation<T> for Trivial {
    const KIND: RelocationKind = RelocationKind::Trivial;

    #[inline]
    fn relocate(src: &mut Option<T>) -> Result<Option<T>, TableError> {
        Ok(*src)
    }
}

impl<T> Relocation<T> for Neither {
    const KIND: RelocationKind = RelocationKind::Neither;

    fn relocate(src: &mut Option<T>) -> Result<Option<T>, TableError> {
        match src {
            Some(_) => Err(TableError::Unrelocatable { kind: RelocationKind::Neither }),
            None => Ok(None),
        }
    }
}

impl<T: Clone> Duplicate<T> for Movable {
    #[inline]
    fn duplicate(src: &T) -> T {
        src.clone()
    }
}

impl<T: Clone> Duplicate<T> for Copyable {
    #[inline]
    fn duplicate(src: &T) -> T {
        src.clone()
    }
}

impl<T: Copy> Duplicate<T> for Trivial {
    #[inline]
    fn duplicate(src: &T) -> T {
        *src
    }
}

/// Returns an error if `live` elements would have to be relocated under `P`.
#[inline]
pub(crate) fn check_relocatable<T, P: Relocation<T>>(live: usize) -> Result<(), TableError> {
    if live > 0 && P::KIND == RelocationKind::Neither {
        return Err(TableError::Unrelocatable { kind: P::KIND });
    }
    Ok(())
}

/// Relocates one element according to `P`.
#[inline]
pub(crate) fn relocate<T, P: Relocation<T>>(src: &mut Option<T>) -> Result<Option<T>, TableError> {
    P::relocate(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn moving_policies_leave_source_empty() {
        let mut a = Some(String::from("a"));
        assert_eq!(
            relocate::<_, Movable>(&mut a).unwrap(),
            Some("a".to_string())
        );
        assert!(a.is_none());

        let mut b = Some(String::from("b"));
        assert_eq!(
            relocate::<_, MoveOnly>(&mut b).unwrap(),
            Some("b".to_string())
        );
        assert!(b.is_none());
    }

    /// Copying keeps the original alive until its owner drops it.
    #[test]
    fn copyable_clones_and_keeps_source() {
        let rc = Rc::new(5);
        let mut src = Some(rc.clone());
        let out = relocate::<_, Copyable>(&mut src).unwrap();
        assert!(src.is_some());
        assert_eq!(Rc::strong_count(&rc), 3);
        drop(src);
        drop(out);
        assert_eq!(Rc::strong_count(&rc), 1);
    }

    #[test]
    fn trivial_copies_bits() {
        let mut src = Some((1u32, 2u64));
        assert_eq!(relocate::<_, Trivial>(&mut src).unwrap(), Some((1, 2)));
        assert_eq!(src, Some((1, 2)));
    }

    #[test]
    fn neither_refuses_live_elements() {
        let mut live = Some(1);
        assert_eq!(
            relocate::<_, Neither>(&mut live),
            Err(TableError::Unrelocatable {
                kind: RelocationKind::Neither
            })
        );
        let mut empty: Option<i32> = None;
        assert_eq!(relocate::<_, Neither>(&mut empty), Ok(None));
        assert!(check_relocatable::<i32, Neither>(0).is_ok());
        assert!(check_relocatable::<i32, Neither>(1).is_err());
        assert!(check_relocatable::<i32, MoveOnly>(7).is_ok());
    }

    #[test]
    fn duplicate_matches_policy() {
        assert_eq!(<Movable as Duplicate<String>>::duplicate(&"x".into()), "x");
        assert_eq!(<Trivial as Duplicate<u8>>::duplicate(&3), 3);
    }
}
