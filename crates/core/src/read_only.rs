//! Read-only, non-owning view of a resource. Terminal capability level.

use crate::error::RefCapResult;
use crate::owned::OwnedHandle;
use crate::shared::SharedHandle;
use crate::types::{HandleId, Operation};
use std::fmt;
use std::ops::Deref;

/// Shared borrow of a resource, taken from an owner or a [`SharedHandle`].
///
/// Exposes no mutating surface, so writes are rejected at compile time:
///
/// ```compile_fail
/// use refcap_core::OwnedHandle;
///
/// let owner = OwnedHandle::create(1);
/// let ro = owner.read_only().unwrap();
/// *ro.access() = 2;
/// ```
///
/// Nothing converts a read-only handle back into a wider capability, neither
/// to a shared view:
///
/// ```compile_fail
/// use refcap_core::{OwnedHandle, SharedHandle};
///
/// let owner = OwnedHandle::create(1);
/// let ro = owner.read_only().unwrap();
/// let shared = SharedHandle::from_owned(ro);
/// ```
///
/// nor to an owner:
///
/// ```compile_fail
/// use refcap_core::OwnedHandle;
///
/// let owner = OwnedHandle::create(1);
/// let ro = owner.read_only().unwrap();
/// let widened: OwnedHandle<i32> = OwnedHandle::from(ro);
/// ```
pub struct ReadOnlyHandle<'a, T> {
    origin: HandleId,
    value: &'a T,
}

impl<'a, T> ReadOnlyHandle<'a, T> {
    /// Fails with `UseAfterMove` if `owner` is empty.
    pub fn from_owned(owner: &'a OwnedHandle<T>) -> RefCapResult<Self> {
        let value = owner.value(Operation::ReadOnly)?;
        Ok(Self::new(owner.id(), value))
    }

    /// Always succeeds: a shared handle is only ever built over a live owner.
    pub fn from_shared(shared: &'a SharedHandle<'_, T>) -> Self {
        Self::new(shared.origin(), shared.get())
    }

    pub(crate) fn new(origin: HandleId, value: &'a T) -> Self {
        Self { origin, value }
    }

    pub fn access(&self) -> &'a T {
        self.value
    }

    pub fn origin(&self) -> HandleId {
        self.origin
    }
}

impl<'a, T> From<SharedHandle<'a, T>> for ReadOnlyHandle<'a, T> {
    fn from(shared: SharedHandle<'a, T>) -> Self {
        shared.into_read_only()
    }
}

impl<T> Clone for ReadOnlyHandle<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReadOnlyHandle<'_, T> {}

impl<T> Deref for ReadOnlyHandle<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnlyHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyHandle")
            .field("origin", &self.origin)
            .field("value", self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefCapError;

    #[test]
    fn from_owned_reads_value() {
        let owner = OwnedHandle::create(String::from("hello"));
        let ro = ReadOnlyHandle::from_owned(&owner).unwrap();
        assert_eq!(ro.access(), "hello");
        assert_eq!(ro.len(), 5);
        assert_eq!(ro.origin(), owner.id());
    }

    #[test]
    fn copies_observe_same_resource() {
        let owner = OwnedHandle::create(9);
        let a = owner.read_only().unwrap();
        let b = a;
        assert!(std::ptr::eq(a.access(), b.access()));
        assert!(std::ptr::eq(a.access(), owner.get().unwrap()));
    }

    #[test]
    fn from_empty_owner_fails() {
        let owner: OwnedHandle<u8> = OwnedHandle::empty();
        assert_eq!(
            ReadOnlyHandle::from_owned(&owner).unwrap_err(),
            RefCapError::UseAfterMove {
                handle: owner.id(),
                op: Operation::ReadOnly
            }
        );
    }

    #[test]
    fn shared_converts_with_from() {
        let mut owner = OwnedHandle::create(1);
        let mut shared = owner.share().unwrap();
        *shared += 41;
        let ro: ReadOnlyHandle<'_, i32> = shared.into();
        assert_eq!(*ro, 42);
    }
}
