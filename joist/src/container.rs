//! The generic layout container: element tracking, measurement gating, and
//! hit-testing.
//!
//! The structural-change pipeline here is fixed. Concrete layouts
//! specialize it only through the narrow hooks on
//! [`LayoutStrategy`](crate::manager::LayoutStrategy): the metadata
//! factory, the add/remove side-effect hooks, and the two content
//! algorithms.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::element::{ElementHandle, ElementId};
use crate::geometry::{Point, Size};
use crate::info::ItemInfo;
use crate::manager::LayoutStrategy;

#[derive(Debug, Clone, Copy)]
struct Cached {
    constraints: (f32, f32),
    size: Size,
}

/// Element tracking and measurement cache for one container control.
///
/// The mapping is keyed by element identity. Iteration order is
/// deterministic for a given mutation history, but removals use
/// swap-remove, so it is not insertion order once children have left.
pub struct Layout<I: ItemInfo> {
    items: IndexMap<ElementId, I>,
    cached: Option<Cached>,
}

impl<I: ItemInfo> Layout<I> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            cached: None,
        }
    }

    /// Number of tracked records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an element is currently tracked.
    pub fn contains(&self, id: ElementId) -> bool {
        self.items.contains_key(&id)
    }

    /// Record for a tracked element.
    pub fn get(&self, id: ElementId) -> Option<&I> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut I> {
        self.items.get_mut(&id)
    }

    /// Iterate records in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut I> {
        self.items.values_mut()
    }

    // =========================================================================
    // Structural changes
    // =========================================================================

    /// Track a newly added element.
    ///
    /// The strategy's factory may decline (`None`), which leaves the
    /// mapping untouched; the cached measurement is invalidated either
    /// way.
    pub fn on_add<S>(&mut self, strategy: &mut S, index: usize, element: &ElementHandle)
    where
        S: LayoutStrategy<Info = I>,
    {
        trace!(id = element.borrow().id().raw(), index, "child added");
        self.track(strategy, element);
    }

    /// Track an element inserted at a specific index. Tracking is
    /// identical to [`Layout::on_add`]; the index is the host's, carried
    /// for diagnostics.
    pub fn on_insert<S>(&mut self, strategy: &mut S, index: usize, element: &ElementHandle)
    where
        S: LayoutStrategy<Info = I>,
    {
        trace!(id = element.borrow().id().raw(), index, "child inserted");
        self.track(strategy, element);
    }

    /// Stop tracking a removed element. An untracked element is a mapping
    /// no-op, but the cached measurement is invalidated regardless.
    pub fn on_remove<S>(&mut self, strategy: &mut S, index: usize, element: &ElementHandle)
    where
        S: LayoutStrategy<Info = I>,
    {
        let id = element.borrow().id();
        trace!(id = id.raw(), index, "child removed");
        if let Some(mut info) = self.items.swap_remove(&id) {
            strategy.on_item_removed(&mut info);
            info.info_mut().detach();
        }
        self.invalidate_measurement();
    }

    /// Replace one element with another at the same host index: the old
    /// record is finalized, the new element is tracked, and the cache ends
    /// up invalidated once.
    pub fn on_update<S>(
        &mut self,
        strategy: &mut S,
        index: usize,
        new: &ElementHandle,
        old: &ElementHandle,
    ) where
        S: LayoutStrategy<Info = I>,
    {
        let old_id = old.borrow().id();
        trace!(
            old = old_id.raw(),
            new = new.borrow().id().raw(),
            index,
            "child replaced"
        );
        if let Some(mut info) = self.items.swap_remove(&old_id) {
            strategy.on_item_removed(&mut info);
            info.info_mut().detach();
        }
        self.track(strategy, new);
    }

    /// Stop tracking every element, finalizing each record as in removal.
    /// The cache is invalidated once at the end.
    pub fn on_clear<S>(&mut self, strategy: &mut S)
    where
        S: LayoutStrategy<Info = I>,
    {
        debug!(count = self.items.len(), "clearing tracked children");
        for (_, mut info) in self.items.drain(..) {
            strategy.on_item_removed(&mut info);
            info.info_mut().detach();
        }
        self.invalidate_measurement();
    }

    fn track<S>(&mut self, strategy: &mut S, element: &ElementHandle)
    where
        S: LayoutStrategy<Info = I>,
    {
        let id = element.borrow().id();
        // A re-added identity is a replacement. Finalize the old record
        // before the new one subscribes, so the detach cannot clobber the
        // fresh subscription.
        if let Some(mut displaced) = self.items.swap_remove(&id) {
            strategy.on_item_removed(&mut displaced);
            displaced.info_mut().detach();
        }
        if let Some(mut info) = strategy.create_item_info(element) {
            strategy.on_item_added(&mut info);
            self.items.insert(id, info);
        }
        self.invalidate_measurement();
    }

    // =========================================================================
    // Measurement gate
    // =========================================================================

    /// Decide whether a full measurement pass is required under the given
    /// constraints.
    ///
    /// Changed constraints (or a structurally invalidated cache) mark
    /// every record stale before answering, since every child's available
    /// space may have shifted. Otherwise the pass is needed only when
    /// some record reports it must be remeasured.
    pub fn needs_measure_pass(&mut self, width: f32, height: f32) -> bool {
        let constraints_changed = match &self.cached {
            Some(cached) => cached.constraints != (width, height),
            None => true,
        };
        if constraints_changed {
            trace!(width, height, "constraints changed; all records stale");
            for item in self.items.values_mut() {
                item.info_mut().mark_stale();
            }
            return true;
        }
        let stale = self
            .items
            .values_mut()
            .any(|item| item.info_mut().needs_measure());
        if stale {
            trace!("stale record forces remeasure");
        }
        stale
    }

    /// Size from the last completed measurement pass, if still cached.
    pub fn cached_size(&self) -> Option<Size> {
        self.cached.map(|cached| cached.size)
    }

    /// Record the result of a completed measurement pass.
    pub fn store_measurement(&mut self, width: f32, height: f32, size: Size) {
        self.cached = Some(Cached {
            constraints: (width, height),
            size,
        });
    }

    /// Drop the cached measurement so the next pass recomputes.
    pub fn invalidate_measurement(&mut self) {
        self.cached = None;
    }

    // =========================================================================
    // Hit-testing
    // =========================================================================

    /// Find the first tracked record whose bounds contain `point`.
    ///
    /// The scan runs in mapping-iteration order, so tie-breaks among
    /// overlapping bounds are deterministic for a given mutation history
    /// but otherwise arbitrary. Layouts that need a real priority rule
    /// rank their records explicitly instead.
    pub fn find(&self, point: Point) -> Option<&I> {
        self.items
            .values()
            .find(|item| item.info().bounds().contains(point))
    }

    /// Convenience over [`Layout::find`]: the hit element itself.
    pub fn find_child_element(&self, point: Point) -> Option<ElementHandle> {
        self.find(point).map(|item| item.info().element().clone())
    }
}

impl<I: ItemInfo> Default for Layout<I> {
    fn default() -> Self {
        Self::new()
    }
}
