//! Colour picker widget
//!
//! A square whose horizontal axis is red gain and vertical axis is blue gain,
//! both spanning `[0, ratio)`, with a ring marker on the current chromaticity.

mod color_picker;
mod gradient;

pub use color_picker::{ColorPicker, DEFAULT_RATIO};
pub use gradient::{chromaticity_gradient, marker_ring};
