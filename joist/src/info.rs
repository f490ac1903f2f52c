//! Per-element layout records and the metadata capability trait.

use tracing::trace;

use crate::element::{ElementHandle, ElementId, InvalidationHandle};
use crate::geometry::{Axis, Rect, Size};

/// Per-element layout state: committed bounds, cached measurement, and the
/// dirty flags that drive incremental relayout.
///
/// A record exists exactly as long as its element is tracked by the owning
/// container. It subscribes to the element's invalidation signal on
/// creation and detaches on removal.
pub struct LayoutInfo {
    element: ElementHandle,
    id: ElementId,
    bounds: Rect,
    measured: Size,
    stale: InvalidationHandle,
    needs_arrange: bool,
    attached: bool,
}

impl LayoutInfo {
    /// Create a record for a newly tracked element and subscribe to its
    /// invalidation signal. New records start dirty on both passes.
    pub fn new(element: ElementHandle) -> Self {
        let id = element.borrow().id();
        let stale = InvalidationHandle::new();
        stale.set(true);
        element.borrow_mut().subscribe(stale.clone());
        Self {
            element,
            id,
            bounds: Rect::ZERO,
            measured: Size::ZERO,
            stale,
            needs_arrange: true,
            attached: true,
        }
    }

    /// Identity of the tracked element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Handle to the tracked element.
    pub fn element(&self) -> &ElementHandle {
        &self.element
    }

    /// Bounds last assigned by arrangement.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Size cached by the last measurement pass.
    pub fn measured(&self) -> Size {
        self.measured
    }

    /// Whether `bounds` changed since the last arrange commit.
    pub fn needs_arrange(&self) -> bool {
        self.needs_arrange
    }

    /// Set bounds, flagging rearrangement when the value actually changes.
    /// All bounds mutation funnels through here, so the flag can never be
    /// observed stale against a new value.
    pub fn set_bounds(&mut self, bounds: Rect) {
        debug_assert!(
            !bounds.x.is_nan()
                && !bounds.y.is_nan()
                && !bounds.width.is_nan()
                && !bounds.height.is_nan(),
            "NaN bounds"
        );
        if bounds != self.bounds {
            self.bounds = bounds;
            self.needs_arrange = true;
        }
    }

    /// Measure the element under the given constraints and cache the
    /// result. Clears the measure flag; a changed size marks the record for
    /// rearrangement through the bounds setter.
    pub fn measure(&mut self, width: f32, height: f32) -> Size {
        debug_assert!(!width.is_nan() && !height.is_nan(), "NaN measure constraint");
        let size = self.element.borrow_mut().measure(width, height);
        self.measured = size;
        self.set_bounds(Rect::new(
            self.bounds.x,
            self.bounds.y,
            size.width,
            size.height,
        ));
        self.stale.set(false);
        size
    }

    /// Arrange the element into `bounds`. The element's frame-commit runs
    /// only when its current frame differs; the arrange flag clears either
    /// way.
    pub fn arrange(&mut self, bounds: Rect) {
        self.set_bounds(bounds);
        let committed = self.element.borrow().frame();
        if committed != self.bounds {
            self.element.borrow_mut().arrange(self.bounds);
        }
        self.needs_arrange = false;
    }

    /// Whether the element must be remeasured.
    ///
    /// True when the element raised its invalidation flag, and lazily when
    /// a declared dimension is still auto and the bounds shape warrants a
    /// fresh look. The lazy result is memoized into the flag, so repeated
    /// queries agree until a measure or a new invalidation changes the
    /// answer.
    pub fn needs_measure(&mut self) -> bool {
        if self.stale.is_raised() {
            return true;
        }
        let declared_auto = {
            let element = self.element.borrow();
            element.declared_width().is_auto() || element.declared_height().is_auto()
        };
        // Asymmetric on purpose: remeasure when the width is finite or the
        // height is not.
        // TODO: confirm against the host toolkit's visual regression
        // baseline before symmetrizing this check.
        if declared_auto && (self.bounds.width.is_finite() || !self.bounds.height.is_finite()) {
            self.stale.set(true);
            return true;
        }
        false
    }

    /// Clamp a proposed dimension to the element's declared limits on one
    /// axis. Bounds that are unset (non-finite or not strictly positive)
    /// do not constrain.
    pub fn constrain(&self, value: f32, axis: Axis) -> f32 {
        debug_assert!(!value.is_nan(), "NaN dimension in constrain");
        self.element.borrow().limits().clamp(value, axis)
    }

    /// Force remeasurement on the next pass.
    pub(crate) fn mark_stale(&mut self) {
        self.stale.set(true);
    }

    /// Stop tracking: unsubscribe from the element's invalidation signal.
    /// Idempotent; the owning container calls this once on removal, after
    /// which the record is dropped and its element handle released.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.element.borrow_mut().unsubscribe();
        trace!(id = self.id.raw(), "layout record detached");
    }

    /// Whether the record is still subscribed to its element.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Capability every per-child metadata type exposes: access to the
/// embedded layout record. Concrete layouts wrap their own fields around
/// it; layouts that need nothing extra use [`LayoutInfo`] directly.
pub trait ItemInfo {
    fn info(&self) -> &LayoutInfo;
    fn info_mut(&mut self) -> &mut LayoutInfo;
}

impl ItemInfo for LayoutInfo {
    fn info(&self) -> &LayoutInfo {
        self
    }

    fn info_mut(&mut self) -> &mut LayoutInfo {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{SizeLimits, UNCONSTRAINED};
    use crate::testing::TestElement;

    #[test]
    fn new_record_starts_dirty_and_subscribed() {
        let element = TestElement::new(20.0, 10.0);
        let probe = element.probe();
        let mut info = LayoutInfo::new(element.into_handle());
        assert!(probe.is_subscribed());
        assert!(info.needs_measure());
        assert!(info.needs_arrange());
        assert_eq!(info.bounds(), Rect::ZERO);
    }

    #[test]
    fn set_bounds_flags_only_on_change() {
        let element = TestElement::new(20.0, 10.0);
        let mut info = LayoutInfo::new(element.into_handle());
        let bounds = Rect::new(5.0, 5.0, 20.0, 10.0);
        info.arrange(bounds);
        assert!(!info.needs_arrange());

        info.set_bounds(bounds);
        assert!(!info.needs_arrange());

        info.set_bounds(Rect::new(6.0, 5.0, 20.0, 10.0));
        assert!(info.needs_arrange());
    }

    #[test]
    fn measure_stores_size_and_clears_flag() {
        let element = TestElement::fixed(20.0, 10.0);
        let probe = element.probe();
        let mut info = LayoutInfo::new(element.into_handle());
        let size = info.measure(UNCONSTRAINED, UNCONSTRAINED);
        assert_eq!(size, Size::new(20.0, 10.0));
        assert_eq!(info.measured(), size);
        assert_eq!(probe.measure_calls(), 1);
        assert!(!info.needs_measure());
    }

    #[test]
    fn measure_updates_bounds_size_keeping_origin() {
        let element = TestElement::fixed(20.0, 10.0);
        let mut info = LayoutInfo::new(element.into_handle());
        info.arrange(Rect::new(7.0, 3.0, 1.0, 1.0));
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        assert_eq!(info.bounds(), Rect::new(7.0, 3.0, 20.0, 10.0));
        assert!(info.needs_arrange());
    }

    #[test]
    fn arrange_commits_once_and_skips_redundant_commits() {
        let element = TestElement::new(20.0, 10.0);
        let probe = element.probe();
        let mut info = LayoutInfo::new(element.into_handle());
        let bounds = Rect::new(0.0, 0.0, 20.0, 10.0);

        info.arrange(bounds);
        assert_eq!(probe.arrange_calls(), 1);
        assert!(!info.needs_arrange());

        info.arrange(bounds);
        assert_eq!(probe.arrange_calls(), 1);

        info.arrange(Rect::new(0.0, 30.0, 20.0, 10.0));
        assert_eq!(probe.arrange_calls(), 2);
        assert!(!info.needs_arrange());
    }

    #[test]
    fn invalidation_reaches_the_record() {
        let element = TestElement::fixed(20.0, 10.0);
        let probe = element.probe();
        let mut info = LayoutInfo::new(element.into_handle());
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        assert!(!info.needs_measure());
        probe.invalidate();
        assert!(info.needs_measure());
    }

    #[test]
    fn auto_size_with_finite_width_stays_dirty() {
        let element = TestElement::new(20.0, 10.0);
        let mut info = LayoutInfo::new(element.into_handle());
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        // Bounds width is finite and a dimension is auto, so the lazy
        // check keeps requesting remeasurement.
        assert!(info.needs_measure());
        assert!(info.needs_measure());
    }

    #[test]
    fn auto_size_with_infinite_width_and_finite_height_is_clean() {
        let element = TestElement::new(f32::INFINITY, 10.0);
        let mut info = LayoutInfo::new(element.into_handle());
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        assert!(!info.needs_measure());
        assert!(!info.needs_measure());
    }

    #[test]
    fn auto_size_with_infinite_height_is_dirty() {
        let element = TestElement::new(f32::INFINITY, f32::INFINITY);
        let mut info = LayoutInfo::new(element.into_handle());
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        assert!(info.needs_measure());
    }

    #[test]
    fn fixed_declarations_skip_the_lazy_check() {
        let element = TestElement::fixed(20.0, 10.0);
        let mut info = LayoutInfo::new(element.into_handle());
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        assert!(!info.needs_measure());
    }

    #[test]
    fn constrain_applies_element_limits() {
        let element = TestElement::new(20.0, 10.0).with_limits(SizeLimits::width(10.0, 50.0));
        let info = LayoutInfo::new(element.into_handle());
        assert_eq!(info.constrain(-5.0, Axis::Horizontal), 10.0);
        assert_eq!(info.constrain(5.0, Axis::Horizontal), 10.0);
        assert_eq!(info.constrain(30.0, Axis::Horizontal), 30.0);
        assert_eq!(info.constrain(60.0, Axis::Horizontal), 50.0);
        assert_eq!(info.constrain(60.0, Axis::Vertical), 60.0);
    }

    #[test]
    fn detach_unsubscribes_idempotently() {
        let element = TestElement::new(20.0, 10.0);
        let probe = element.probe();
        let mut info = LayoutInfo::new(element.into_handle());
        assert!(probe.is_subscribed());
        info.detach();
        assert!(!probe.is_subscribed());
        assert!(!info.is_attached());
        info.detach();
        assert!(!info.is_attached());
    }

    #[test]
    fn measured_size_change_flags_rearrangement() {
        let element = TestElement::fixed(20.0, 10.0);
        let probe = element.probe();
        let mut info = LayoutInfo::new(element.into_handle());
        info.measure(UNCONSTRAINED, UNCONSTRAINED);
        info.arrange(Rect::new(0.0, 0.0, 20.0, 10.0));
        assert!(!info.needs_arrange());

        probe.invalidate();
        info.measure(15.0, UNCONSTRAINED);
        assert_eq!(info.measured(), Size::new(15.0, 10.0));
        assert!(info.needs_arrange());
    }
}
