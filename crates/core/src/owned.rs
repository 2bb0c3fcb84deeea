//! Exclusive, movable owning handle.
//!
//! An [`OwnedHandle`] is either `Owning` (holds the only handle to a boxed
//! resource) or `Empty`. Plain Rust moves already reject reuse of a moved
//! binding at compile time; the runtime tag covers the explicit transfers
//! below, which leave the source in place but empty.

use crate::error::{RefCapError, RefCapResult};
use crate::read_only::ReadOnlyHandle;
use crate::shared::SharedHandle;
use crate::types::{HandleId, HandleState, Operation};
use std::fmt;

/// Exclusive owner of one heap-allocated `T`, or of nothing.
pub struct OwnedHandle<T> {
    id: HandleId,
    slot: Option<Box<T>>,
}

impl<T> OwnedHandle<T> {
    /// Allocates a fresh resource holding `value`.
    pub fn create(value: T) -> Self {
        let handle = Self {
            id: HandleId::next(),
            slot: Some(Box::new(value)),
        };
        tracing::trace!(handle = %handle.id, "created");
        handle
    }

    /// A handle that owns nothing, ready to receive a resource via
    /// [`move_assign`](Self::move_assign).
    pub fn empty() -> Self {
        Self {
            id: HandleId::next(),
            slot: None,
        }
    }

    /// Transfers the resource out of `source` into a new handle.
    ///
    /// `source` is left `Empty`. Fails with `UseAfterMove` if it already was.
    pub fn move_from(source: &mut Self) -> RefCapResult<Self> {
        let resource = source
            .slot
            .take()
            .ok_or_else(|| use_after_move(source.id, Operation::Move))?;
        let target = Self {
            id: HandleId::next(),
            slot: Some(resource),
        };
        tracing::trace!(from = %source.id, to = %target.id, "moved");
        Ok(target)
    }

    /// Moves the resource held by `source` into `self`.
    ///
    /// `self` must be `Empty`: replacing a live resource would silently drop
    /// it, so that case fails with `DoubleOwnership` and neither handle
    /// changes.
    pub fn move_assign(&mut self, source: &mut Self) -> RefCapResult<()> {
        if self.slot.is_some() {
            tracing::debug!(handle = %self.id, incoming = %source.id, "double ownership");
            return Err(RefCapError::DoubleOwnership {
                target: self.id,
                incoming: source.id,
            });
        }
        let resource = source
            .slot
            .take()
            .ok_or_else(|| use_after_move(source.id, Operation::MoveAssign))?;
        self.slot = Some(resource);
        tracing::trace!(from = %source.id, to = %self.id, "move-assigned");
        Ok(())
    }

    /// Mutable access to the owned resource.
    pub fn access(&mut self) -> RefCapResult<&mut T> {
        self.value_mut(Operation::Access)
    }

    /// Shared access to the owned resource.
    pub fn get(&self) -> RefCapResult<&T> {
        self.value(Operation::Access)
    }

    /// Deallocates the resource if owning. Releasing an empty handle is a no-op.
    pub fn release(&mut self) {
        if let Some(resource) = self.slot.take() {
            drop(resource);
            tracing::trace!(handle = %self.id, "released");
        }
    }

    /// Lends a mutable, non-owning view for the duration of the borrow.
    pub fn share(&mut self) -> RefCapResult<SharedHandle<'_, T>> {
        SharedHandle::from_owned(self)
    }

    /// Lends a read-only view for the duration of the borrow.
    pub fn read_only(&self) -> RefCapResult<ReadOnlyHandle<'_, T>> {
        ReadOnlyHandle::from_owned(self)
    }

    /// Consumes the handle and hands back the value itself.
    pub fn into_inner(mut self) -> RefCapResult<T> {
        match self.slot.take() {
            Some(resource) => Ok(*resource),
            None => Err(use_after_move(self.id, Operation::Move)),
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn state(&self) -> HandleState {
        if self.slot.is_some() {
            HandleState::Owning
        } else {
            HandleState::Empty
        }
    }

    pub fn is_owning(&self) -> bool {
        self.slot.is_some()
    }

    pub(crate) fn value(&self, op: Operation) -> RefCapResult<&T> {
        let id = self.id;
        self.slot
            .as_deref()
            .ok_or_else(|| use_after_move(id, op))
    }

    pub(crate) fn value_mut(&mut self, op: Operation) -> RefCapResult<&mut T> {
        let id = self.id;
        self.slot
            .as_deref_mut()
            .ok_or_else(|| use_after_move(id, op))
    }
}

impl<T: Clone> OwnedHandle<T> {
    /// New owning handle over a fresh allocation holding a clone of the value.
    pub fn duplicate(&self) -> RefCapResult<Self> {
        let value = self.value(Operation::Duplicate)?.clone();
        let copy = Self::create(value);
        tracing::trace!(from = %self.id, to = %copy.id, "duplicated");
        Ok(copy)
    }
}

impl<T> Default for OwnedHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Drop for OwnedHandle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedHandle")
            .field("id", &self.id)
            .field("value", &self.slot.as_deref())
            .finish()
    }
}

pub(crate) fn use_after_move(handle: HandleId, op: Operation) -> RefCapError {
    tracing::debug!(handle = %handle, op = %op, "use after move");
    RefCapError::UseAfterMove { handle, op }
}
