//! Test doubles for exercising layouts without a host view tree.
//!
//! [`TestElement`] implements the full element contract with a natural
//! size; its [`Probe`] stays in the test's hands after the element is
//! wrapped into a handle, exposing call counters and the invalidation
//! channel a real element would drive from its own content changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::element::{
    Dimension, Element, ElementHandle, ElementId, InvalidationHandle, element_handle,
};
use crate::geometry::{Rect, Size, SizeLimits};

/// Shared observation channel for a [`TestElement`].
///
/// Clone it out before wrapping the element; the counters and the
/// subscription slot remain visible from the test afterward.
#[derive(Clone, Default)]
pub struct Probe {
    measure_calls: Rc<Cell<usize>>,
    arrange_calls: Rc<Cell<usize>>,
    subscription: Rc<RefCell<Option<InvalidationHandle>>>,
}

impl Probe {
    /// How many times the element's measure primitive ran.
    pub fn measure_calls(&self) -> usize {
        self.measure_calls.get()
    }

    /// How many times the element's frame-commit primitive ran.
    pub fn arrange_calls(&self) -> usize {
        self.arrange_calls.get()
    }

    /// Raise the subscribed invalidation flag, as the element would on an
    /// internal content change. Does nothing when no record is subscribed.
    pub fn invalidate(&self) {
        if let Some(handle) = self.subscription.borrow().as_ref() {
            handle.raise();
        }
    }

    /// Whether a layout record is currently subscribed.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }
}

/// Call-counting stand-in for a host element.
pub struct TestElement {
    id: ElementId,
    natural: Size,
    declared_width: Dimension,
    declared_height: Dimension,
    limits: SizeLimits,
    frame: Rect,
    probe: Probe,
}

impl TestElement {
    /// An element whose natural size is `width` x `height`, with auto
    /// declared dimensions and no limits.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            id: ElementId::new(),
            natural: Size::new(width, height),
            declared_width: Dimension::Auto,
            declared_height: Dimension::Auto,
            limits: SizeLimits::NONE,
            frame: Rect::ZERO,
            probe: Probe::default(),
        }
    }

    /// An element with both dimensions declared fixed at its natural size.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self::new(width, height).with_declared(Dimension::Fixed(width), Dimension::Fixed(height))
    }

    pub fn with_declared(mut self, width: Dimension, height: Dimension) -> Self {
        self.declared_width = width;
        self.declared_height = height;
        self
    }

    pub fn with_limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The observation channel shared with this element.
    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }

    /// Wrap into the handle form the engine tracks.
    pub fn into_handle(self) -> ElementHandle {
        element_handle(self)
    }
}

impl Element for TestElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn measure(&mut self, width: f32, height: f32) -> Size {
        self.probe
            .measure_calls
            .set(self.probe.measure_calls.get() + 1);
        Size::new(
            self.natural.width.min(width),
            self.natural.height.min(height),
        )
    }

    fn arrange(&mut self, bounds: Rect) {
        self.probe
            .arrange_calls
            .set(self.probe.arrange_calls.get() + 1);
        self.frame = bounds;
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn declared_width(&self) -> Dimension {
        self.declared_width
    }

    fn declared_height(&self) -> Dimension {
        self.declared_height
    }

    fn limits(&self) -> SizeLimits {
        self.limits
    }

    fn subscribe(&mut self, handle: InvalidationHandle) {
        *self.probe.subscription.borrow_mut() = Some(handle);
    }

    fn unsubscribe(&mut self) {
        self.probe.subscription.borrow_mut().take();
    }
}
