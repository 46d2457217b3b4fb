use tracing::trace;

use crate::relight::common::error::{RelightError, Result};
use crate::relight::scene::{Chromaticity, LinearImage, MixMap, RawImage};

/// Smallest illuminant value a raw channel is divided by.
pub const ILLUMINANT_EPSILON: f32 = 1e-6;

/// Combine N weight maps with N chromaticities into a dense (R, G, B)
/// illuminant map. Green is the constant 1.0.
///
/// `illum[p] = sum_i mix_maps[i][p] * chromaticities[i]` for the red and blue
/// channels.
pub fn mix_illuminant_map(
    mix_maps: &[MixMap],
    chromaticities: &[Chromaticity],
) -> Result<LinearImage> {
    if mix_maps.is_empty() || mix_maps.len() != chromaticities.len() {
        return Err(RelightError::IlluminantCountMismatch {
            mix_maps: mix_maps.len(),
            chromaticities: chromaticities.len(),
        });
    }

    let (width, height) = mix_maps[0].dimensions();
    let mut red_blue = vec![[0.0f32; 2]; width as usize * height as usize];

    for (i, (map, chroma)) in mix_maps.iter().zip(chromaticities).enumerate() {
        if map.dimensions() != (width, height) {
            return Err(RelightError::DimensionMismatch {
                what: format!("mix map {i}"),
                expected: (width, height),
                found: map.dimensions(),
            });
        }
        trace!(illuminant = i, red = chroma.red, blue = chroma.blue, "Accumulating illuminant");
        for (acc, &w) in red_blue.iter_mut().zip(map.weights()) {
            acc[0] += w * chroma.red;
            acc[1] += w * chroma.blue;
        }
    }

    let pixels = red_blue.into_iter().map(|[r, b]| [r, 1.0, b]).collect();
    LinearImage::from_pixels(width, height, pixels)
}

/// `clamp(raw / max(illum, eps), 0, 1)` per channel.
pub fn divide_out(raw: &RawImage, illuminant: &LinearImage) -> Result<LinearImage> {
    if raw.dimensions() != illuminant.dimensions() {
        return Err(RelightError::DimensionMismatch {
            what: "illuminant map vs raw capture".to_string(),
            expected: raw.dimensions(),
            found: illuminant.dimensions(),
        });
    }

    let pixels = raw
        .pixels()
        .iter()
        .zip(illuminant.pixels())
        .map(|(r, l)| {
            let mut out = [0.0f32; 3];
            for c in 0..3 {
                let denom = if l[c].is_finite() {
                    l[c].max(ILLUMINANT_EPSILON)
                } else {
                    f32::MAX
                };
                out[c] = (r[c] / denom).max(0.0).min(1.0);
            }
            out
        })
        .collect();

    LinearImage::from_pixels(raw.width(), raw.height(), pixels)
}
