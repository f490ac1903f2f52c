//! Concrete layouts built on the joist engine.
//!
//! Each layout here is a [`LayoutStrategy`](joist::LayoutStrategy) bound
//! into a [`LayoutManager`](joist::LayoutManager) by the control that owns
//! it: linear stacking for toolbars and stack panels, and the slider's
//! track/fill/thumb placement.

// Linear stacking (toolbars, stack panels)
pub mod stack;

// Slider track internals
pub mod slider;

pub use slider::{SliderPart, SliderPartInfo, SliderTrackLayout};
pub use stack::{CrossAxisAlignment, StackLayout};
