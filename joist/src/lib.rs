//! Joist: incremental layout for retained-mode UI containers
//!
//! Joist tracks per-child layout metadata for a container control, decides
//! when measurement and arrangement actually need recomputing, and answers
//! point queries over the arranged children:
//! - Per-child records with measure/arrange dirty flags
//! - A measurement gate that skips clean passes entirely
//! - Push-based invalidation from elements to their records
//! - Pluggable measurement/arrangement strategies for concrete layouts
//!
//! # Architecture
//!
//! [`Layout`] owns the element-to-record mapping and the structural-change
//! pipeline driven by the host's child collection. [`LayoutManager`] binds
//! a [`LayoutStrategy`] to a container and implements the measure/arrange
//! contract the host's layout pass expects; the strategy supplies the
//! actual sizing and placement math.
//!
//! # Usage
//!
//! ```ignore
//! use joist::{LayoutManager, Rect};
//!
//! let mut manager = LayoutManager::new(MyStrategy::default());
//! manager.on_add(0, &child);
//! let size = manager.measure(400.0, 300.0)?;
//! manager.arrange_children(Rect::new(0.0, 0.0, size.width, size.height))?;
//! ```

// Geometry primitives
pub mod geometry;

// Element contract and identity
pub mod element;

// Per-child layout records
pub mod info;

// Generic container: tracking, measurement gate, hit-testing
pub mod container;

// Strategy seam and host-facing contract
pub mod manager;

// Error surface
pub mod error;

// Test doubles for host elements
pub mod testing;

// Re-export core types
pub use container::Layout;
pub use element::{Dimension, Element, ElementHandle, ElementId, InvalidationHandle, element_handle};
pub use error::LayoutError;
pub use geometry::{Axis, Point, Rect, Size, SizeLimits, UNCONSTRAINED};
pub use info::{ItemInfo, LayoutInfo};
pub use manager::{LayoutManager, LayoutStrategy};
