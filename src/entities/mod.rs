//! Entities module - document structures and their pure reducers
//!
//! Each entity owns one top-level collection of the document snapshot:
//! - Chapter tree (positional access paths)
//! - Screens with region split-trees
//! - Timelines, tracks and elements
//! - Assets, master layouts, document metadata
//!
//! The collections reference each other only by id. Reducers take the
//! previous collection and an action, and return `None` when nothing changed.

pub mod access_path;
pub mod asset;
pub mod chapter;
pub mod document;
pub mod master;
pub mod screen;
pub mod timeline;

pub use access_path::{AccessPath, Nested};
pub use asset::Asset;
pub use chapter::Chapter;
pub use document::Document;
pub use master::{ComponentPlacement, MasterLayout};
pub use screen::{DeviceKind, Orientation, RegionLeaf, RegionNode, Screen, ScreenState, SplitOrientation};
pub use timeline::{Element, Timeline, Track};
