//! The element contract: what the engine requires from any tracked child.
//!
//! Elements are owned by the host view tree. The engine holds cloned
//! handles only while an element is tracked and never manages element
//! lifetime; identity, not structure, is what makes two elements distinct.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::geometry::{Rect, Size, SizeLimits};

static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identity for an element.
///
/// Ids come from a process-wide counter and are never reused, so removing
/// an element and adding a structurally identical one always produces a
/// distinct child as far as tracking is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh id.
    pub fn new() -> Self {
        Self(ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Reconstruct an id from its raw value, e.g. one the host tree carries.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// A declared size for one axis.
///
/// `Auto` means the host has not resolved the dimension; auto-sized
/// elements are remeasured whenever fresh constraint information arrives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Fixed(f32),
}

impl Dimension {
    /// Whether this dimension is unresolved.
    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }
}

/// Shared flag an element raises when its cached measurement is no longer
/// trustworthy.
///
/// Fire-and-forget: a raise is never acknowledged, and the only ordering
/// guarantee is that it is visible to the next measure query. Raising a
/// handle whose record was detached is harmless.
#[derive(Debug, Clone)]
pub struct InvalidationHandle {
    raised: Arc<AtomicBool>,
}

impl InvalidationHandle {
    pub fn new() -> Self {
        Self {
            raised: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal that the owner's measurement is stale.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }

    /// Whether the flag is currently raised.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }

    pub(crate) fn set(&self, raised: bool) {
        self.raised.store(raised, Ordering::Relaxed);
    }
}

impl Default for InvalidationHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The capability set the engine requires from any tracked child.
pub trait Element {
    /// Stable identity for tracking. Must not change while tracked.
    fn id(&self) -> ElementId;

    /// Compute the desired size under the given constraints. Either
    /// constraint may be [`UNCONSTRAINED`](crate::geometry::UNCONSTRAINED),
    /// in which case the element reports its natural size on that axis.
    fn measure(&mut self, width: f32, height: f32) -> Size;

    /// Commit a final rectangle.
    fn arrange(&mut self, bounds: Rect);

    /// The currently committed frame.
    fn frame(&self) -> Rect;

    /// Declared width, if the host has resolved one.
    fn declared_width(&self) -> Dimension {
        Dimension::Auto
    }

    /// Declared height, if the host has resolved one.
    fn declared_height(&self) -> Dimension {
        Dimension::Auto
    }

    /// Declared minimum/maximum sizes.
    fn limits(&self) -> SizeLimits {
        SizeLimits::NONE
    }

    /// Install the handle to raise when this element's measurement becomes
    /// invalid. Replaces any previously installed handle.
    fn subscribe(&mut self, handle: InvalidationHandle);

    /// Drop the installed invalidation handle, if any.
    fn unsubscribe(&mut self);
}

/// Shared handle to a tracked element.
pub type ElementHandle = Rc<RefCell<dyn Element>>;

/// Wrap a concrete element in a shared handle.
pub fn element_handle<E: Element + 'static>(element: E) -> ElementHandle {
    Rc::new(RefCell::new(element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = ElementId::new();
        let b = ElementId::new();
        let c = ElementId::new();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn id_raw_round_trip() {
        let id = ElementId::new();
        assert_eq!(ElementId::from_raw(id.raw()), id);
    }

    #[test]
    fn dimension_auto() {
        assert!(Dimension::Auto.is_auto());
        assert!(!Dimension::Fixed(12.0).is_auto());
        assert!(Dimension::default().is_auto());
    }

    #[test]
    fn invalidation_raise_is_visible_to_clones() {
        let handle = InvalidationHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_raised());
        clone.raise();
        assert!(handle.is_raised());
        handle.set(false);
        assert!(!clone.is_raised());
    }
}
