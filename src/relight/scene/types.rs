//! In-memory representation of a loaded scene.

use std::fmt;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::relight::common::error::{RelightError, Result};
use crate::relight::compositor::ColorMatrix;

/// Illuminant colour as (red-gain, blue-gain); green gain is fixed at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chromaticity {
    pub red: f32,
    pub blue: f32,
}

impl Chromaticity {
    pub const NEUTRAL: Chromaticity = Chromaticity { red: 1.0, blue: 1.0 };

    pub fn new(red: f32, blue: f32) -> Self {
        Self { red, blue }
    }

    /// Full (R, G, B) gain triple with green pinned to 1.0.
    pub fn to_rgb(self) -> [f32; 3] {
        [self.red, 1.0, self.blue]
    }

    /// Clamp both gains into `[0, max]`. Non-finite gains collapse to 0.
    pub fn clamped(self, max: f32) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.min(max).max(0.0) } else { 0.0 };
        Self {
            red: clamp(self.red),
            blue: clamp(self.blue),
        }
    }
}

impl From<[f32; 2]> for Chromaticity {
    fn from(v: [f32; 2]) -> Self {
        Self { red: v[0], blue: v[1] }
    }
}

impl fmt::Display for Chromaticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R: {:.2}, G: 1.0, B: {:.2}", self.red, self.blue)
    }
}

/// Dense linear RGB image, row-major, one `[r, g, b]` triple per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearImage {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

/// Demosaiced sensor capture normalised to [0, 1].
pub type RawImage = LinearImage;

impl LinearImage {
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Result<Self> {
        check_len("linear image", width, height, pixels.len())?;
        Ok(Self { width, height, pixels })
    }

    pub fn filled(width: u32, height: u32, rgb: [f32; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; width as usize * height as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[f32; 3]] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Per-pixel, non-negative weight of one illuminant.
#[derive(Debug, Clone, PartialEq)]
pub struct MixMap {
    width: u32,
    height: u32,
    weights: Vec<f32>,
}

impl MixMap {
    pub fn from_weights(width: u32, height: u32, weights: Vec<f32>) -> Result<Self> {
        check_len("mix map", width, height, weights.len())?;
        Ok(Self { width, height, weights })
    }

    pub fn filled(width: u32, height: u32, weight: f32) -> Self {
        Self {
            width,
            height,
            weights: vec![weight; width as usize * height as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Index-aligned mix maps and chromaticities.
///
/// Always holds at least one illuminant, every map has the same size and there
/// is exactly one chromaticity per map.
#[derive(Debug, Clone, PartialEq)]
pub struct IlluminantSet {
    mix_maps: Vec<MixMap>,
    chromaticities: Vec<Chromaticity>,
}

impl IlluminantSet {
    pub fn new(mix_maps: Vec<MixMap>, chromaticities: Vec<Chromaticity>) -> Result<Self> {
        if mix_maps.is_empty() || mix_maps.len() != chromaticities.len() {
            return Err(RelightError::IlluminantCountMismatch {
                mix_maps: mix_maps.len(),
                chromaticities: chromaticities.len(),
            });
        }

        let expected = mix_maps[0].dimensions();
        for (i, map) in mix_maps.iter().enumerate().skip(1) {
            if map.dimensions() != expected {
                return Err(RelightError::DimensionMismatch {
                    what: format!("mix map {i}"),
                    expected,
                    found: map.dimensions(),
                });
            }
        }

        Ok(Self {
            mix_maps,
            chromaticities,
        })
    }

    pub fn len(&self) -> usize {
        self.mix_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mix_maps.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mix_maps[0].dimensions()
    }

    pub fn mix_maps(&self) -> &[MixMap] {
        &self.mix_maps
    }

    pub fn chromaticities(&self) -> &[Chromaticity] {
        &self.chromaticities
    }
}

/// Display-only previews shown next to the re-rendered images.
#[derive(Debug, Clone)]
pub struct ReferenceImages {
    /// Display-referred input image.
    pub input: RgbImage,
    /// Precomputed output preview, resized to the input height.
    pub result: RgbImage,
}

/// Everything needed to render one scene.
#[derive(Debug, Clone)]
pub struct SceneResult {
    pub name: String,
    pub raw: RawImage,
    pub illuminants: IlluminantSet,
    pub references: ReferenceImages,
    pub cam_to_display: ColorMatrix,
}

impl SceneResult {
    /// Assemble a scene, rejecting mix maps that do not cover the raw image.
    pub fn new(
        name: impl Into<String>,
        raw: RawImage,
        illuminants: IlluminantSet,
        references: ReferenceImages,
    ) -> Result<Self> {
        if illuminants.dimensions() != raw.dimensions() {
            return Err(RelightError::DimensionMismatch {
                what: "mix maps vs raw capture".to_string(),
                expected: raw.dimensions(),
                found: illuminants.dimensions(),
            });
        }

        Ok(Self {
            name: name.into(),
            raw,
            illuminants,
            references,
            cam_to_display: ColorMatrix::CAM_TO_SRGB,
        })
    }

    pub fn illuminant_count(&self) -> usize {
        self.illuminants.len()
    }
}

fn check_len(what: &str, width: u32, height: u32, len: usize) -> Result<()> {
    let expected = width as usize * height as usize;
    if len != expected {
        return Err(RelightError::BufferLength {
            what: format!("{what} of {width}x{height}"),
            expected,
            found: len,
        });
    }
    Ok(())
}
