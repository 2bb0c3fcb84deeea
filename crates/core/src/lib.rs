//! Reference capabilities: owned, shared and read-only handles to a resource.
//!
//! Capability only narrows, `OwnedHandle` -> `SharedHandle` -> `ReadOnlyHandle`.
//! Borrowed views are tied to their owner by lifetime; detachable references
//! go through the generational [`Registry`].
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod owned;
pub mod read_only;
pub mod registry;
pub mod shared;
pub mod stack;
pub mod types;

pub use error::{RefCapError, RefCapResult};
pub use owned::OwnedHandle;
pub use read_only::ReadOnlyHandle;
pub use registry::Registry;
pub use shared::SharedHandle;
pub use stack::ManagedStack;
pub use types::{HandleId, HandleState, Operation, SlotKey};
