//! Shared domain types for the reference-capability handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Handle identity
// ---------------------------------------------------------------------------

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one [`OwnedHandle`](crate::OwnedHandle) instance.
///
/// Identifies the handle, not the resource: a resource moved between two
/// handles is reported under two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(u64);

impl HandleId {
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Handle state
// ---------------------------------------------------------------------------

/// Per-instance state of an owning handle.
///
/// Release collapses into `Empty`; there is no separate released state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleState {
    Empty,
    Owning,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleState::Empty => "empty",
            HandleState::Owning => "owning",
        })
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// The operation that detected a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Move,
    MoveAssign,
    Access,
    Share,
    ReadOnly,
    Duplicate,
    Push,
    Top,
    Pop,
    Insert,
    Lookup,
    Take,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Move => "move",
            Operation::MoveAssign => "move_assign",
            Operation::Access => "access",
            Operation::Share => "share",
            Operation::ReadOnly => "read_only",
            Operation::Duplicate => "duplicate",
            Operation::Push => "push",
            Operation::Top => "top",
            Operation::Pop => "pop",
            Operation::Insert => "insert",
            Operation::Lookup => "lookup",
            Operation::Take => "take",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Registry keys
// ---------------------------------------------------------------------------

/// Detachable reference into a [`Registry`](crate::Registry) slot.
///
/// `generation` must match the slot's current generation for the key to
/// resolve; taking the element out of the slot invalidates every key to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub index: usize,
    pub generation: u64,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_ids_are_unique_and_increasing() {
        let a = HandleId::next();
        let b = HandleId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn operation_names_are_snake_case() {
        assert_eq!(Operation::MoveAssign.to_string(), "move_assign");
        assert_eq!(Operation::ReadOnly.as_str(), "read_only");
    }

    #[test]
    fn display_formats() {
        assert_eq!(SlotKey { index: 3, generation: 1 }.to_string(), "3v1");
        assert_eq!(HandleState::Owning.to_string(), "owning");
    }
}
