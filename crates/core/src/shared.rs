//! Mutable, non-owning view of a resource.

use crate::error::RefCapResult;
use crate::owned::OwnedHandle;
use crate::read_only::ReadOnlyHandle;
use crate::types::{HandleId, Operation};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Mutable borrow of the resource behind an [`OwnedHandle`].
///
/// The lifetime `'a` is the borrow of the owner, so the compiler rejects any
/// use after the owner is moved or released:
///
/// ```compile_fail
/// use refcap_core::{OwnedHandle, SharedHandle};
///
/// let mut owner = OwnedHandle::create(1);
/// let shared = SharedHandle::from_owned(&mut owner).unwrap();
/// drop(owner);
/// println!("{}", *shared);
/// ```
///
/// Only an owner can produce one. There is no `Clone`:
///
/// ```compile_fail
/// use refcap_core::{OwnedHandle, SharedHandle};
///
/// let mut owner = OwnedHandle::create(1);
/// let shared = owner.share().unwrap();
/// let again: SharedHandle<'_, i32> = Clone::clone(&shared);
/// ```
///
/// and no constructor taking another `SharedHandle`:
///
/// ```compile_fail
/// use refcap_core::{OwnedHandle, SharedHandle};
///
/// let mut owner = OwnedHandle::create(1);
/// let mut shared = owner.share().unwrap();
/// let again = SharedHandle::from_owned(&mut shared);
/// ```
///
/// The only conversion is down to [`ReadOnlyHandle`].
pub struct SharedHandle<'a, T> {
    origin: HandleId,
    value: &'a mut T,
}

impl<'a, T> SharedHandle<'a, T> {
    /// Fails with `UseAfterMove` if `owner` is empty. `owner` is not modified.
    pub fn from_owned(owner: &'a mut OwnedHandle<T>) -> RefCapResult<Self> {
        let origin = owner.id();
        let value = owner.value_mut(Operation::Share)?;
        Ok(Self { origin, value })
    }

    pub fn access(&mut self) -> &mut T {
        &mut *self.value
    }

    pub fn get(&self) -> &T {
        &*self.value
    }

    /// Temporary read-only view; the shared handle stays usable afterwards.
    pub fn read_only(&self) -> ReadOnlyHandle<'_, T> {
        ReadOnlyHandle::from_shared(self)
    }

    /// Narrows permanently, keeping the full owner borrow.
    pub fn into_read_only(self) -> ReadOnlyHandle<'a, T> {
        ReadOnlyHandle::new(self.origin, self.value)
    }

    /// Id of the owning handle this view was taken from.
    pub fn origin(&self) -> HandleId {
        self.origin
    }
}

impl<T> Deref for SharedHandle<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.value
    }
}

impl<T> DerefMut for SharedHandle<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHandle")
            .field("origin", &self.origin)
            .field("value", &&*self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefCapError;

    #[test]
    fn writes_are_visible_to_owner() {
        let mut owner = OwnedHandle::create(vec![1]);
        let id = owner.id();
        {
            let mut shared = SharedHandle::from_owned(&mut owner).unwrap();
            shared.access().push(2);
            shared.push(3);
            assert_eq!(shared.origin(), id);
        }
        assert_eq!(owner.get().unwrap(), &[1, 2, 3]);
        assert!(owner.is_owning());
    }

    #[test]
    fn from_empty_owner_fails() {
        let mut owner: OwnedHandle<u8> = OwnedHandle::empty();
        let id = owner.id();
        let err = SharedHandle::from_owned(&mut owner).unwrap_err();
        assert_eq!(
            err,
            RefCapError::UseAfterMove {
                handle: id,
                op: Operation::Share
            }
        );
    }

    #[test]
    fn read_only_observes_prior_mutation() {
        let mut owner = OwnedHandle::create(1);
        let mut shared = owner.share().unwrap();
        *shared.access() = 2;
        let ro = shared.read_only();
        assert_eq!(*ro.access(), 2);
        assert!(std::ptr::eq(ro.access(), shared.get()));
    }

    #[test]
    fn into_read_only_keeps_origin() {
        let mut owner = OwnedHandle::create('a');
        let id = owner.id();
        let ro = owner.share().unwrap().into_read_only();
        assert_eq!(ro.origin(), id);
        assert_eq!(*ro, 'a');
    }
}
