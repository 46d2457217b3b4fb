use image::RgbImage;
use tracing::instrument;

use super::encode::{encode_display, encode_linear, ColorMatrix};
use super::illuminant::{divide_out, mix_illuminant_map};
use crate::relight::common::error::Result;
use crate::relight::scene::{Chromaticity, LinearImage, MixMap, RawImage};
use crate::relight::timing::{RenderTimings, Timer};

/// Output of one compositor pass.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Corrected image in camera space, linear, in [0, 1].
    pub linear: LinearImage,
    /// `linear`, gamma encoded to 8 bits.
    pub corrected: RgbImage,
    /// `linear` through the camera-to-display matrix, gamma encoded to 8 bits.
    pub display: RgbImage,
}

/// White balance `raw` against the illuminant described by `mix_maps` and
/// `chromaticities`.
///
/// Counts and dimensions are checked when a scene is loaded; a mismatch here is
/// a caller error and is reported rather than panicking.
pub fn composite(
    mix_maps: &[MixMap],
    chromaticities: &[Chromaticity],
    raw: &RawImage,
    cam_to_display: &ColorMatrix,
) -> Result<Rendered> {
    let mut timings = RenderTimings::new();
    composite_timed(mix_maps, chromaticities, raw, cam_to_display, &mut timings)
}

/// [`composite`], recording the duration of each step into `timings`.
#[instrument(skip_all, fields(illuminants = mix_maps.len(), width = raw.width(), height = raw.height()))]
pub fn composite_timed(
    mix_maps: &[MixMap],
    chromaticities: &[Chromaticity],
    raw: &RawImage,
    cam_to_display: &ColorMatrix,
    timings: &mut RenderTimings,
) -> Result<Rendered> {
    let timer = Timer::start("mix_illuminant");
    let illuminant = mix_illuminant_map(mix_maps, chromaticities)?;
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);

    let timer = Timer::start("divide");
    let linear = divide_out(raw, &illuminant)?;
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);

    let timer = Timer::start("encode_raw");
    let corrected = encode_linear(&linear);
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);

    let timer = Timer::start("encode_display");
    let display = encode_display(&linear, cam_to_display);
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);

    Ok(Rendered {
        linear,
        corrected,
        display,
    })
}
