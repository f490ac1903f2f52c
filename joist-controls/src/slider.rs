//! Slider-track internals: track, fill, and thumb placement along a value
//! range.

use joist::{Axis, ElementHandle, ItemInfo, Layout, LayoutInfo, LayoutStrategy, Point, Rect, Size};
use tracing::trace;

/// Role a child plays inside the slider track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderPart {
    Track,
    Fill,
    Thumb,
}

const ROLES: [SliderPart; 3] = [SliderPart::Track, SliderPart::Fill, SliderPart::Thumb];

/// Layout record plus the part role the child was assigned on arrival.
pub struct SliderPartInfo {
    info: LayoutInfo,
    part: SliderPart,
}

impl SliderPartInfo {
    /// The assigned role.
    pub fn part(&self) -> SliderPart {
        self.part
    }
}

impl ItemInfo for SliderPartInfo {
    fn info(&self) -> &LayoutInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut LayoutInfo {
        &mut self.info
    }
}

/// Places the three slider parts: the track spans the bounds, the fill
/// runs from the left edge to the value position, and the thumb centers
/// on that position, clamped inside the track.
///
/// The first three children become track, fill, and thumb in arrival
/// order; a removed part's role goes to the next child that arrives.
/// Children beyond the three roles are not tracked at all.
pub struct SliderTrackLayout {
    value: f32,
    maximum: f32,
    assigned: [bool; 3],
}

impl SliderTrackLayout {
    pub fn new() -> Self {
        Self {
            value: 0.0,
            maximum: 100.0,
            assigned: [false; 3],
        }
    }

    /// Current value, always within `0..=maximum`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the value; out-of-range input clamps and NaN collapses to zero.
    pub fn set_value(&mut self, value: f32) {
        self.value = value.max(0.0).min(self.maximum);
    }

    /// Upper end of the value range.
    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Set the range maximum, re-clamping the current value.
    pub fn set_maximum(&mut self, maximum: f32) {
        self.maximum = maximum.max(0.0);
        self.value = self.value.min(self.maximum);
    }

    /// Fraction of the range the current value covers.
    fn ratio(&self) -> f32 {
        if self.maximum > 0.0 {
            self.value / self.maximum
        } else {
            0.0
        }
    }

    /// Which part a point hits, preferring thumb over fill over track.
    ///
    /// The generic hit-test returns the first record in mapping order;
    /// slider parts overlap by construction, so this query ranks them the
    /// way they stack visually.
    pub fn part_at(&self, layout: &Layout<SliderPartInfo>, point: Point) -> Option<SliderPart> {
        const PRIORITY: [SliderPart; 3] = [SliderPart::Thumb, SliderPart::Fill, SliderPart::Track];
        PRIORITY.into_iter().find(|part| {
            layout
                .iter()
                .any(|item| item.part == *part && item.info.bounds().contains(point))
        })
    }
}

impl Default for SliderTrackLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutStrategy for SliderTrackLayout {
    type Info = SliderPartInfo;

    fn create_item_info(&mut self, element: &ElementHandle) -> Option<SliderPartInfo> {
        let slot = self.assigned.iter().position(|taken| !taken)?;
        self.assigned[slot] = true;
        trace!(part = ?ROLES[slot], "slider part assigned");
        Some(SliderPartInfo {
            info: LayoutInfo::new(element.clone()),
            part: ROLES[slot],
        })
    }

    fn on_item_removed(&mut self, info: &mut SliderPartInfo) {
        let slot = ROLES.iter().position(|role| *role == info.part).unwrap_or(0);
        self.assigned[slot] = false;
    }

    fn measure_content(
        &mut self,
        layout: &mut Layout<SliderPartInfo>,
        width: f32,
        height: f32,
    ) -> Size {
        // Parts overlap, so the slider is as large as its largest part.
        let mut size = Size::ZERO;
        for item in layout.iter_mut() {
            let info = item.info_mut();
            if info.needs_measure() {
                info.measure(width, height);
            }
            let measured = info.measured();
            size.width = size.width.max(info.constrain(measured.width, Axis::Horizontal));
            size.height = size.height.max(info.constrain(measured.height, Axis::Vertical));
        }
        size
    }

    fn arrange_content(&mut self, layout: &mut Layout<SliderPartInfo>, bounds: Rect) -> Size {
        let ratio = self.ratio();
        let mut consumed = Size::ZERO;
        for item in layout.iter_mut() {
            let part = item.part;
            let info = item.info_mut();
            let measured = info.measured();
            let height = info
                .constrain(measured.height, Axis::Vertical)
                .min(bounds.height);
            let y = bounds.y + (bounds.height - height) / 2.0;
            let rect = match part {
                SliderPart::Track => Rect::new(bounds.x, y, bounds.width, height),
                SliderPart::Fill => Rect::new(bounds.x, y, bounds.width * ratio, height),
                SliderPart::Thumb => {
                    let width = info.constrain(measured.width, Axis::Horizontal);
                    // Center the thumb on the value position, clamped so it
                    // never leaves the track.
                    let center = bounds.x + bounds.width * ratio;
                    let max_x = (bounds.x + bounds.width - width).max(bounds.x);
                    let x = (center - width / 2.0).clamp(bounds.x, max_x);
                    Rect::new(x, y, width, height)
                }
            };
            info.arrange(rect);
            consumed.width = consumed.width.max(rect.width);
            consumed.height = consumed.height.max(rect.height);
        }
        consumed
    }
}
