//! STAGECRAFT - document state model for multi-device presentations
//!
//! Re-exports all modules for use by the binary target.

// Core state machinery (actions, store, orchestration, loading)
pub mod core;

// Document entities and their reducers
pub mod entities;

// Front-end support
pub mod cli;
pub mod config;

// Re-export commonly used types from core
pub use core::action::Action;
pub use core::bus::{Commit, CommitBus};
pub use core::load::{DocumentPayload, LoadError, LoadOptions};
pub use core::store::{Snapshot, Store};

// Re-export entities
pub use entities::{Chapter, RegionNode, Screen, Timeline};
