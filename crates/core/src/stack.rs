//! LIFO container that owns its elements.
//!
//! Ownership moves in on [`push`](ManagedStack::push) and out on
//! [`pop`](ManagedStack::pop); [`top`](ManagedStack::top) only lends.

use crate::error::{RefCapError, RefCapResult};
use crate::owned::{use_after_move, OwnedHandle};
use crate::read_only::ReadOnlyHandle;
use crate::shared::SharedHandle;
use crate::types::Operation;
use smallvec::SmallVec;

/// Stack of owning handles, top = most recently pushed.
///
/// Every stored handle is `Owning`; empty handles are rejected at push.
/// `SmallVec<[_; 8]>` keeps shallow stacks off the heap.
#[derive(Debug)]
pub struct ManagedStack<T> {
    items: SmallVec<[OwnedHandle<T>; 8]>,
}

impl<T> ManagedStack<T> {
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    /// Takes ownership of `handle`. Fails with `UseAfterMove` if it is empty.
    pub fn push(&mut self, handle: OwnedHandle<T>) -> RefCapResult<()> {
        if !handle.is_owning() {
            return Err(use_after_move(handle.id(), Operation::Push));
        }
        tracing::trace!(handle = %handle.id(), depth = self.items.len() + 1, "pushed");
        self.items.push(handle);
        Ok(())
    }

    /// Mutable view of the top element. Leaves the stack unchanged.
    pub fn top(&mut self) -> RefCapResult<SharedHandle<'_, T>> {
        let handle = self
            .items
            .last_mut()
            .ok_or_else(|| empty_container(Operation::Top))?;
        handle.share()
    }

    /// Read-only view of the top element.
    pub fn peek(&self) -> RefCapResult<ReadOnlyHandle<'_, T>> {
        let handle = self
            .items
            .last()
            .ok_or_else(|| empty_container(Operation::Top))?;
        handle.read_only()
    }

    /// Removes the top element and hands its ownership to the caller.
    pub fn pop(&mut self) -> RefCapResult<OwnedHandle<T>> {
        let handle = self
            .items
            .pop()
            .ok_or_else(|| empty_container(Operation::Pop))?;
        tracing::trace!(handle = %handle.id(), depth = self.items.len(), "popped");
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Releases every element, top first. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        while let Some(mut handle) = self.items.pop() {
            handle.release();
        }
        count
    }
}

impl<T> Default for ManagedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_container(op: Operation) -> RefCapError {
    tracing::debug!(op = %op, "empty container");
    RefCapError::EmptyContainer { op }
}
