//! Core state machinery - actions, store, commit bus, compound operations
//!
//! These modules never perform I/O: they take parsed payloads and actions,
//! and hand out immutable snapshots.

pub mod action;
pub mod bus;
pub mod ids;
pub mod load;
pub mod orchestrator;
pub mod payload;
pub mod store;

// Re-exports for convenience
pub use action::Action;
pub use bus::{Commit, CommitBus};
pub use load::{load_document, DocumentPayload, LoadError, LoadOptions};
pub use store::{Snapshot, Store};
