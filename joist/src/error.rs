//! Error surface for the host-facing layout contract.

use thiserror::Error;

use crate::geometry::Rect;

/// Contract violations surfaced at the
/// [`LayoutManager`](crate::manager::LayoutManager) boundary.
///
/// These mark programming errors in the host or a concrete layout, not
/// recoverable conditions; everything below the boundary is infallible.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LayoutError {
    /// Measure was driven with NaN or negative constraints. Infinity is
    /// legal and means unconstrained.
    #[error("invalid measure constraint {width}x{height}: constraints must be non-negative")]
    InvalidConstraint { width: f32, height: f32 },

    /// Arrange was driven with non-finite or negative bounds.
    #[error("invalid arrange bounds {0:?}: bounds must be finite with non-negative extent")]
    InvalidBounds(Rect),
}
