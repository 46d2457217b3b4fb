//! Illuminant compositor
//!
//! Mixes per-pixel illuminant weights with their chromaticities, divides the
//! resulting illuminant out of the raw capture and encodes the corrected image
//! for display, both in camera space and after the camera-to-display matrix.

mod encode;
mod illuminant;
mod render;


pub use encode::{encode_display, encode_gamma, encode_linear, ColorMatrix, DISPLAY_GAMMA};
pub use illuminant::{divide_out, mix_illuminant_map, ILLUMINANT_EPSILON};
pub use render::{composite, composite_timed, Rendered};
