//! Scene reader backed by a result directory on disk.
//!
//! Previews are decoded with the `image` crate, the raw capture with the `tiff`
//! crate so that 16-bit samples reach us untouched, and the bundle as JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;
use tracing::{debug, info, instrument, warn};

use crate::relight::common::error::{Artifact, RelightError, Result};
use crate::relight::scene::bundle::MixBundle;
use crate::relight::scene::reader::SceneReader;
use crate::relight::scene::types::{LinearImage, RawImage, ReferenceImages, SceneResult};

/// Raw samples are 10-bit values stored in a wider container.
pub const RAW_WHITE_LEVEL: f32 = 1023.0;

pub struct DirectorySceneReader {
    root: PathBuf,
}

impl DirectorySceneReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact_path(&self, scene: &str, artifact: Artifact) -> PathBuf {
        self.root.join(artifact.file_name(scene))
    }

    /// Check that all four artifacts exist before decoding any of them.
    fn locate(&self, scene: &str) -> Result<[PathBuf; 4]> {
        let paths = Artifact::ALL.map(|artifact| self.artifact_path(scene, artifact));
        for (artifact, path) in Artifact::ALL.iter().zip(&paths) {
            if !path.is_file() {
                return Err(RelightError::MissingArtifact {
                    scene: scene.to_string(),
                    artifact: *artifact,
                    path: path.clone(),
                });
            }
        }
        Ok(paths)
    }
}

impl SceneReader for DirectorySceneReader {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn read_scene(&self, name: &str) -> Result<SceneResult> {
        let [input_path, result_path, raw_path, bundle_path] = self.locate(name)?;

        let input = read_preview(name, &input_path, Artifact::InputPreview)?;
        let result = read_preview(name, &result_path, Artifact::ResultPreview)?;
        let result = resize_to_height(&result, input.height());

        let raw = {
            let _span = tracing::debug_span!("decode_raw").entered();
            read_raw_tiff(name, &raw_path)?
        };

        let illuminants = MixBundle::read(name, &bundle_path)?
            .into_illuminants(name)
            .map_err(|e| bundle_error(name, e))?;

        let scene = SceneResult::new(name, raw, illuminants, ReferenceImages { input, result })
            .map_err(|e| bundle_error(name, e))?;
        info!(
            scene = name,
            width = scene.raw.width(),
            height = scene.raw.height(),
            illuminants = scene.illuminant_count(),
            "Loaded scene"
        );
        Ok(scene)
    }
}

/// Shape errors from assembling the bundle carry no scene name; attach it.
fn bundle_error(scene: &str, err: RelightError) -> RelightError {
    match err {
        RelightError::DimensionMismatch { .. } | RelightError::IlluminantCountMismatch { .. } => {
            RelightError::MalformedBundle {
                scene: scene.to_string(),
                reason: err.to_string(),
            }
        }
        other => other,
    }
}

/// Load one scene from `root`.
pub fn load(root: impl Into<PathBuf>, name: &str) -> Result<SceneResult> {
    DirectorySceneReader::new(root).read_scene(name)
}

/// Scale `image` to `height` rows, keeping its aspect ratio.
pub fn resize_to_height(image: &RgbImage, height: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if h == height || h == 0 {
        return image.clone();
    }
    let width = ((w as f64 / h as f64) * height as f64) as u32;
    imageops::resize(image, width.max(1), height, FilterType::Triangle)
}

fn read_preview(scene: &str, path: &Path, artifact: Artifact) -> Result<RgbImage> {
    let image = image::open(path).map_err(|e| RelightError::Decode {
        scene: scene.to_string(),
        artifact,
        reason: e.to_string(),
    })?;
    debug!(%artifact, width = image.width(), height = image.height(), "Decoded preview");
    Ok(image.to_rgb8())
}

fn read_raw_tiff(scene: &str, path: &Path) -> Result<RawImage> {
    let decode_err = |reason: String| RelightError::Decode {
        scene: scene.to_string(),
        artifact: Artifact::RawCapture,
        reason,
    };

    let file = File::open(path).map_err(|e| decode_err(e.to_string()))?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(|e| decode_err(e.to_string()))?;

    let (width, height) = decoder.dimensions().map_err(|e| decode_err(e.to_string()))?;
    let channels = match decoder.colortype().map_err(|e| decode_err(e.to_string()))? {
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => return Err(decode_err(format!("unsupported colour type {other:?}"))),
    };

    let samples: Vec<f32> = match decoder.read_image().map_err(|e| decode_err(e.to_string()))? {
        DecodingResult::U16(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::U8(buf) => buf.into_iter().map(f32::from).collect(),
        _ => return Err(decode_err("unsupported sample format".to_string())),
    };

    let expected = width as usize * height as usize * channels;
    if samples.len() != expected {
        return Err(decode_err(format!(
            "expected {expected} samples for {width}x{height}x{channels}, found {}",
            samples.len()
        )));
    }

    let mut saturated = 0usize;
    let pixels = samples
        .chunks_exact(channels)
        .map(|px| {
            let mut rgb = [0.0f32; 3];
            for (out, &v) in rgb.iter_mut().zip(px) {
                let n = v / RAW_WHITE_LEVEL;
                if n > 1.0 {
                    saturated += 1;
                }
                *out = n.min(1.0);
            }
            rgb
        })
        .collect();

    if saturated > 0 {
        warn!(scene, saturated, "Raw samples above white level clamped to 1.0");
    }
    debug!(width, height, channels, "Decoded raw capture");

    LinearImage::from_pixels(width, height, pixels)
}
