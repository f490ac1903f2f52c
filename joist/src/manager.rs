//! The strategy seam and the host-facing measurement/arrangement contract.
//!
//! The host view system drives a [`LayoutManager`] through child-collection
//! lifecycle calls and the measure/arrange pair of its layout pass. The
//! manager validates inputs, runs the container's measurement gate, and
//! delegates the actual math to a [`LayoutStrategy`]. Within one cycle the
//! host measures before it arranges; nothing here suspends or re-enters.

use tracing::{debug, trace, warn};

use crate::container::Layout;
use crate::element::ElementHandle;
use crate::error::LayoutError;
use crate::geometry::{Point, Rect, Size};
use crate::info::ItemInfo;

/// A concrete layout algorithm: how to size and place tracked children.
///
/// The container's structural pipeline is fixed; a strategy specializes it
/// through the metadata factory, the optional add/remove hooks, and the
/// two content algorithms. All of these are infallible: they run over
/// inputs the manager has already validated.
pub trait LayoutStrategy {
    /// Per-child metadata this strategy works with.
    type Info: ItemInfo;

    /// Build metadata for a newly added element, or `None` to exclude the
    /// element from layout participation entirely.
    fn create_item_info(&mut self, element: &ElementHandle) -> Option<Self::Info>;

    /// Runs after metadata is created for an element.
    fn on_item_added(&mut self, _info: &mut Self::Info) {}

    /// Runs after metadata leaves the mapping, before the record detaches.
    fn on_item_removed(&mut self, _info: &mut Self::Info) {}

    /// Compute the container's desired size under the given constraints,
    /// measuring children as needed.
    fn measure_content(
        &mut self,
        layout: &mut Layout<Self::Info>,
        width: f32,
        height: f32,
    ) -> Size;

    /// Place children within `bounds`, returning the size actually
    /// consumed, which may be less than `bounds` offers.
    fn arrange_content(&mut self, layout: &mut Layout<Self::Info>, bounds: Rect) -> Size;
}

/// Binds a strategy to a container and implements the contract the host
/// view system drives: child-collection lifecycle, measure, arrange, and
/// hit-testing.
pub struct LayoutManager<S: LayoutStrategy> {
    strategy: S,
    layout: Layout<S::Info>,
}

impl<S: LayoutStrategy> LayoutManager<S> {
    /// A manager around a strategy, tracking no children yet.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            layout: Layout::new(),
        }
    }

    /// The bound strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// The container state: tracked records and the measurement cache.
    pub fn layout(&self) -> &Layout<S::Info> {
        &self.layout
    }

    // =========================================================================
    // Child-collection lifecycle
    // =========================================================================

    /// Host callback: an element was appended to the child collection.
    pub fn on_add(&mut self, index: usize, element: &ElementHandle) {
        self.layout.on_add(&mut self.strategy, index, element);
    }

    /// Host callback: an element was inserted at `index`.
    pub fn on_insert(&mut self, index: usize, element: &ElementHandle) {
        self.layout.on_insert(&mut self.strategy, index, element);
    }

    /// Host callback: an element was removed.
    pub fn on_remove(&mut self, index: usize, element: &ElementHandle) {
        self.layout.on_remove(&mut self.strategy, index, element);
    }

    /// Host callback: `old` was replaced by `new` at the same index.
    pub fn on_update(&mut self, index: usize, new: &ElementHandle, old: &ElementHandle) {
        self.layout.on_update(&mut self.strategy, index, new, old);
    }

    /// Host callback: the child collection was emptied.
    pub fn on_clear(&mut self) {
        self.layout.on_clear(&mut self.strategy);
    }

    // =========================================================================
    // Layout pass
    // =========================================================================

    /// Measure pass. An empty container is zero-sized without consulting
    /// the strategy. When neither the constraints nor any child changed
    /// since the last pass, the cached size is returned and no per-child
    /// work runs.
    ///
    /// Constraints must be non-negative; infinity means unconstrained.
    pub fn measure(&mut self, width: f32, height: f32) -> Result<Size, LayoutError> {
        if self.layout.is_empty() {
            return Ok(Size::ZERO);
        }
        if width.is_nan() || height.is_nan() || width < 0.0 || height < 0.0 {
            warn!(width, height, "rejecting invalid measure constraints");
            return Err(LayoutError::InvalidConstraint { width, height });
        }
        if !self.layout.needs_measure_pass(width, height) {
            if let Some(size) = self.layout.cached_size() {
                trace!(?size, "measure served from cache");
                return Ok(size);
            }
        }
        let size = self.strategy.measure_content(&mut self.layout, width, height);
        debug_assert!(
            !size.width.is_nan() && !size.height.is_nan(),
            "NaN measured size"
        );
        self.layout.store_measurement(width, height, size);
        debug!(width, height, ?size, "measure pass completed");
        Ok(size)
    }

    /// Arrange pass. Bounds must be finite with non-negative extent.
    /// Returns the size the content actually consumed.
    pub fn arrange_children(&mut self, bounds: Rect) -> Result<Size, LayoutError> {
        if !bounds.x.is_finite()
            || !bounds.y.is_finite()
            || !bounds.width.is_finite()
            || !bounds.height.is_finite()
            || bounds.width < 0.0
            || bounds.height < 0.0
        {
            warn!(?bounds, "rejecting invalid arrange bounds");
            return Err(LayoutError::InvalidBounds(bounds));
        }
        let consumed = self.strategy.arrange_content(&mut self.layout, bounds);
        trace!(?bounds, ?consumed, "arrange pass completed");
        Ok(consumed)
    }

    // =========================================================================
    // Hit-testing
    // =========================================================================

    /// The first tracked record whose bounds contain `point`.
    pub fn find(&self, point: Point) -> Option<&S::Info> {
        self.layout.find(point)
    }

    /// The element under `point`, if any.
    pub fn find_child_element(&self, point: Point) -> Option<ElementHandle> {
        self.layout.find_child_element(point)
    }
}

impl<S: LayoutStrategy + Default> Default for LayoutManager<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
