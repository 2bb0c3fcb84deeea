//! Error taxonomy for reference-capability violations.
//!
//! Every variant signals a caller defect, never a transient condition.

use crate::types::{HandleId, Operation, SlotKey};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RefCapError {
    /// Access or conversion on a handle in the `Empty` state.
    #[error("use after move: {op} on empty handle {handle}")]
    UseAfterMove { handle: HandleId, op: Operation },

    /// Move-assignment into a handle that still owns a resource.
    #[error("double ownership: handle {target} already owns a resource, refusing move from {incoming}")]
    DoubleOwnership { target: HandleId, incoming: HandleId },

    #[error("empty container: {op} on a stack with no elements")]
    EmptyContainer { op: Operation },

    /// Registry key whose slot was vacated or reused.
    #[error("stale handle: {op} with key {key}")]
    StaleHandle { key: SlotKey, op: Operation },
}

pub type RefCapResult<T> = Result<T, RefCapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_handle_and_operation() {
        let handle = HandleId::next();
        let err = RefCapError::UseAfterMove {
            handle,
            op: Operation::Access,
        };
        let msg = err.to_string();
        assert!(msg.contains("access"));
        assert!(msg.contains(&handle.to_string()));
    }

    #[test]
    fn empty_container_message() {
        let err = RefCapError::EmptyContainer { op: Operation::Pop };
        assert_eq!(err.to_string(), "empty container: pop on a stack with no elements");
    }
}
