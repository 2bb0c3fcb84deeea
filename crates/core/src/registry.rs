//! Generational slot registry for references that must outlive a borrow.
//!
//! Borrowed views cannot be stored in long-lived containers. A [`SlotKey`]
//! can: it is `Copy`, and every lookup revalidates its generation, so a key
//! to a vacated or reused slot yields `StaleHandle` instead of a dangling
//! reference.
//!
//! Keys are only meaningful for the registry that issued them.

use crate::error::{RefCapError, RefCapResult};
use crate::owned::{use_after_move, OwnedHandle};
use crate::read_only::ReadOnlyHandle;
use crate::shared::SharedHandle;
use crate::types::{Operation, SlotKey};

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    occupant: Option<OwnedHandle<T>>,
}

/// Owns resources in generation-tagged slots.
#[derive(Debug)]
pub struct Registry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Takes ownership of `handle` and returns a key to its slot.
    ///
    /// Vacated slots are reused most-recent first.
    pub fn insert(&mut self, handle: OwnedHandle<T>) -> RefCapResult<SlotKey> {
        if !handle.is_owning() {
            return Err(use_after_move(handle.id(), Operation::Insert));
        }
        let handle_id = handle.id();
        let key = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.occupant = Some(handle);
                SlotKey {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    occupant: Some(handle),
                });
                SlotKey {
                    index,
                    generation: 0,
                }
            }
        };
        self.len += 1;
        tracing::trace!(handle = %handle_id, key = %key, "registered");
        Ok(key)
    }

    pub fn get(&self, key: SlotKey) -> RefCapResult<ReadOnlyHandle<'_, T>> {
        self.occupant(key, Operation::Lookup)?.read_only()
    }

    pub fn get_mut(&mut self, key: SlotKey) -> RefCapResult<SharedHandle<'_, T>> {
        self.occupant_mut(key, Operation::Lookup)?.share()
    }

    /// Moves the resource out of its slot. Every key to the slot goes stale.
    pub fn take(&mut self, key: SlotKey) -> RefCapResult<OwnedHandle<T>> {
        let slot = self
            .slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .ok_or_else(|| stale(key, Operation::Take))?;
        let Some(handle) = slot.occupant.take() else {
            return Err(stale(key, Operation::Take));
        };
        slot.generation += 1;
        self.free.push(key.index);
        self.len -= 1;
        tracing::trace!(handle = %handle.id(), key = %key, "unregistered");
        Ok(handle)
    }

    pub fn contains(&self, key: SlotKey) -> bool {
        self.occupant(key, Operation::Lookup).is_ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn occupant(&self, key: SlotKey, op: Operation) -> RefCapResult<&OwnedHandle<T>> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.occupant.as_ref())
            .ok_or_else(|| stale(key, op))
    }

    fn occupant_mut(&mut self, key: SlotKey, op: Operation) -> RefCapResult<&mut OwnedHandle<T>> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.occupant.as_mut())
            .ok_or_else(|| stale(key, op))
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn stale(key: SlotKey, op: Operation) -> RefCapError {
    tracing::debug!(key = %key, op = %op, "stale handle");
    RefCapError::StaleHandle { key, op }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut registry = Registry::new();
        let key = registry.insert(OwnedHandle::create(10)).unwrap();
        assert_eq!(*registry.get(key).unwrap(), 10);
        *registry.get_mut(key).unwrap() += 1;
        assert_eq!(*registry.get(key).unwrap(), 11);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn take_invalidates_keys() {
        let mut registry = Registry::new();
        let key = registry.insert(OwnedHandle::create("a")).unwrap();
        let copy = key;
        let owned = registry.take(key).unwrap();
        assert_eq!(*owned.get().unwrap(), "a");
        assert!(!registry.contains(copy));
        assert_eq!(
            registry.get(copy).unwrap_err(),
            RefCapError::StaleHandle {
                key: copy,
                op: Operation::Lookup
            }
        );
        assert!(matches!(
            registry.take(copy),
            Err(RefCapError::StaleHandle {
                op: Operation::Take,
                ..
            })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn reused_slot_rejects_old_generation() {
        let mut registry = Registry::new();
        let old = registry.insert(OwnedHandle::create(1)).unwrap();
        drop(registry.take(old).unwrap());
        let new = registry.insert(OwnedHandle::create(2)).unwrap();
        assert_eq!(new.index, old.index);
        assert_ne!(new.generation, old.generation);
        assert!(registry.get(old).is_err());
        assert_eq!(*registry.get(new).unwrap(), 2);
    }

    #[test]
    fn insert_empty_handle_rejected() {
        let mut registry: Registry<u8> = Registry::default();
        let err = registry.insert(OwnedHandle::empty()).unwrap_err();
        assert!(matches!(
            err,
            RefCapError::UseAfterMove {
                op: Operation::Insert,
                ..
            }
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn out_of_range_key_is_stale() {
        let registry: Registry<u8> = Registry::new();
        let key = SlotKey {
            index: 4,
            generation: 0,
        };
        assert!(!registry.contains(key));
    }
}
