//! Linear stacking: toolbars (horizontal) and stack panels (vertical).

use joist::{Axis, ElementHandle, Layout, LayoutInfo, LayoutStrategy, Rect, Size, UNCONSTRAINED};
use tracing::trace;

/// Alignment of children on the cross axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrossAxisAlignment {
    /// Align to the start of the cross axis.
    #[default]
    Start,
    /// Center on the cross axis.
    Center,
    /// Align to the end of the cross axis.
    End,
    /// Stretch to fill the cross axis.
    Stretch,
}

/// Stacks children along one axis with optional spacing between them.
///
/// Children keep their measured size on the main axis; the cross axis
/// follows the alignment rule. Children whose cached measurement is still
/// valid are not remeasured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackLayout {
    axis: Axis,
    spacing: f32,
    align: CrossAxisAlignment,
}

impl StackLayout {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            align: CrossAxisAlignment::Start,
        }
    }

    /// Vertical stack.
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Horizontal stack, the toolbar shape.
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// Gap between adjacent children on the main axis.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Cross-axis alignment rule.
    pub fn align_items(mut self, align: CrossAxisAlignment) -> Self {
        self.align = align;
        self
    }
}

/// Measured size clamped to the element's declared limits.
fn clamped_size(info: &LayoutInfo) -> Size {
    let measured = info.measured();
    Size::new(
        info.constrain(measured.width, Axis::Horizontal),
        info.constrain(measured.height, Axis::Vertical),
    )
}

impl LayoutStrategy for StackLayout {
    type Info = LayoutInfo;

    fn create_item_info(&mut self, element: &ElementHandle) -> Option<LayoutInfo> {
        Some(LayoutInfo::new(element.clone()))
    }

    fn measure_content(
        &mut self,
        layout: &mut Layout<LayoutInfo>,
        width: f32,
        height: f32,
    ) -> Size {
        // Children get the full cross-axis budget and an open main axis.
        let (child_width, child_height) = match self.axis {
            Axis::Horizontal => (UNCONSTRAINED, height),
            Axis::Vertical => (width, UNCONSTRAINED),
        };
        let mut main = 0.0_f32;
        let mut cross = 0.0_f32;
        let mut count = 0usize;
        for info in layout.iter_mut() {
            if info.needs_measure() {
                info.measure(child_width, child_height);
            }
            let size = clamped_size(info);
            main += self.axis.main(size);
            cross = cross.max(self.axis.cross(size));
            count += 1;
        }
        if count > 1 {
            main += self.spacing * (count - 1) as f32;
        }
        trace!(count, main, cross, "stack measured");
        self.axis.pack(main, cross)
    }

    fn arrange_content(&mut self, layout: &mut Layout<LayoutInfo>, bounds: Rect) -> Size {
        let start = match self.axis {
            Axis::Horizontal => bounds.x,
            Axis::Vertical => bounds.y,
        };
        let cross_budget = self.axis.cross(bounds.size());
        let mut offset = start;
        let mut cross_used = 0.0_f32;
        let mut first = true;
        for info in layout.iter_mut() {
            if !first {
                offset += self.spacing;
            }
            first = false;
            let size = clamped_size(info);
            let main = self.axis.main(size);
            let cross = match self.align {
                CrossAxisAlignment::Stretch => cross_budget,
                _ => self.axis.cross(size),
            };
            let cross_offset = match self.align {
                CrossAxisAlignment::Start | CrossAxisAlignment::Stretch => 0.0,
                CrossAxisAlignment::Center => ((cross_budget - cross) / 2.0).max(0.0),
                CrossAxisAlignment::End => (cross_budget - cross).max(0.0),
            };
            let child = match self.axis {
                Axis::Horizontal => Rect::new(offset, bounds.y + cross_offset, main, cross),
                Axis::Vertical => Rect::new(bounds.x + cross_offset, offset, cross, main),
            };
            info.arrange(child);
            offset += main;
            cross_used = cross_used.max(cross);
        }
        self.axis.pack(offset - start, cross_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joist::SizeLimits;
    use joist::testing::TestElement;

    fn tracked(layout: &mut Layout<LayoutInfo>, stack: &mut StackLayout, sizes: &[(f32, f32)]) {
        for (i, (w, h)) in sizes.iter().enumerate() {
            let handle = TestElement::fixed(*w, *h).into_handle();
            layout.on_add(stack, i, &handle);
        }
    }

    #[test]
    fn vertical_stack_sums_heights_and_maxes_widths() {
        let mut stack = StackLayout::vertical();
        let mut layout = Layout::new();
        tracked(&mut layout, &mut stack, &[(10.0, 10.0), (20.0, 5.0), (5.0, 20.0)]);

        let size = stack.measure_content(&mut layout, 100.0, 100.0);
        assert_eq!(size, Size::new(20.0, 35.0));
    }

    #[test]
    fn spacing_counts_gaps_between_children_only() {
        let mut stack = StackLayout::vertical().spacing(5.0);
        let mut layout = Layout::new();
        tracked(&mut layout, &mut stack, &[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);

        let size = stack.measure_content(&mut layout, 100.0, 100.0);
        assert_eq!(size, Size::new(10.0, 40.0));
    }

    #[test]
    fn horizontal_stack_sums_widths() {
        let mut stack = StackLayout::horizontal().spacing(2.0);
        let mut layout = Layout::new();
        tracked(&mut layout, &mut stack, &[(10.0, 10.0), (20.0, 5.0)]);

        let size = stack.measure_content(&mut layout, 100.0, 100.0);
        assert_eq!(size, Size::new(32.0, 10.0));

        let consumed = stack.arrange_content(&mut layout, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(consumed, Size::new(32.0, 10.0));
        let bounds: Vec<Rect> = layout.iter().map(|info| info.bounds()).collect();
        assert_eq!(bounds[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(bounds[1], Rect::new(12.0, 0.0, 20.0, 5.0));
    }

    #[test]
    fn cross_alignment_positions_children() {
        let cases = [
            (CrossAxisAlignment::Start, 0.0, 10.0),
            (CrossAxisAlignment::Center, 45.0, 10.0),
            (CrossAxisAlignment::End, 90.0, 10.0),
            (CrossAxisAlignment::Stretch, 0.0, 100.0),
        ];
        for (align, expected_x, expected_width) in cases {
            let mut stack = StackLayout::vertical().align_items(align);
            let mut layout = Layout::new();
            tracked(&mut layout, &mut stack, &[(10.0, 10.0)]);
            stack.measure_content(&mut layout, 100.0, 100.0);
            stack.arrange_content(&mut layout, Rect::new(0.0, 0.0, 100.0, 100.0));

            let bounds = layout.iter().next().map(|info| info.bounds());
            assert_eq!(
                bounds,
                Some(Rect::new(expected_x, 0.0, expected_width, 10.0)),
                "{align:?}"
            );
        }
    }

    #[test]
    fn clean_children_are_not_remeasured() {
        let mut stack = StackLayout::vertical();
        let mut layout = Layout::new();
        let element = TestElement::fixed(10.0, 10.0);
        let probe = element.probe();
        let handle = element.into_handle();
        layout.on_add(&mut stack, 0, &handle);

        stack.measure_content(&mut layout, 100.0, 100.0);
        stack.measure_content(&mut layout, 100.0, 100.0);
        assert_eq!(probe.measure_calls(), 1);
    }

    #[test]
    fn limits_clamp_the_aggregate() {
        let mut stack = StackLayout::vertical();
        let mut layout = Layout::new();
        let handle = TestElement::fixed(60.0, 10.0)
            .with_limits(SizeLimits::width(0.0, 50.0))
            .into_handle();
        layout.on_add(&mut stack, 0, &handle);

        let size = stack.measure_content(&mut layout, 100.0, 100.0);
        assert_eq!(size, Size::new(50.0, 10.0));

        stack.arrange_content(&mut layout, Rect::new(0.0, 0.0, 100.0, 100.0));
        let bounds = layout.iter().next().map(|info| info.bounds());
        assert_eq!(bounds, Some(Rect::new(0.0, 0.0, 50.0, 10.0)));
    }
}
