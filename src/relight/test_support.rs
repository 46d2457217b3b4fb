//! Shared fixtures for unit tests.

use std::collections::{HashMap, HashSet};

use image::RgbImage;

use crate::relight::common::error::{Artifact, RelightError, Result};
use crate::relight::scene::{
    Chromaticity, IlluminantSet, LinearImage, MixMap, ReferenceImages, SceneList, SceneReader,
    SceneResult,
};

/// In-memory scenes; names in `failing` behave like a missing raw capture.
pub struct MockReader {
    pub scenes: HashMap<String, SceneResult>,
    pub failing: HashSet<String>,
}

impl MockReader {
    pub fn new(scenes: Vec<SceneResult>, failing: &[&str]) -> Self {
        Self {
            scenes: scenes.into_iter().map(|s| (s.name.clone(), s)).collect(),
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SceneReader for MockReader {
    fn read_scene(&self, name: &str) -> Result<SceneResult> {
        if self.failing.contains(name) {
            return Err(RelightError::MissingArtifact {
                scene: name.to_string(),
                artifact: Artifact::RawCapture,
                path: format!("{name}.tiff").into(),
            });
        }
        Ok(self.scenes[name].clone())
    }
}

/// 3x2 scene with evenly split mix maps.
pub fn mock_scene(name: &str, chromas: &[[f32; 2]]) -> SceneResult {
    let (w, h) = (3, 2);
    let raw = LinearImage::from_pixels(
        w,
        h,
        (0..w * h)
            .map(|i| [0.1 * i as f32, 0.4, 0.05 * i as f32])
            .collect(),
    )
    .unwrap();
    let n = chromas.len();
    let maps = (0..n).map(|_| MixMap::filled(w, h, 1.0 / n as f32)).collect();
    let chromaticities = chromas.iter().copied().map(Chromaticity::from).collect();
    let illuminants = IlluminantSet::new(maps, chromaticities).unwrap();
    let references = ReferenceImages {
        input: RgbImage::new(w, h),
        result: RgbImage::new(w * 2, h),
    };
    SceneResult::new(name, raw, illuminants, references).unwrap()
}

/// kitchen (2 illuminants), hall (1), porch (2).
pub fn three_scenes(failing: &[&str]) -> (MockReader, SceneList) {
    let scenes = vec![
        mock_scene("kitchen", &[[1.2, 0.8], [0.7, 1.6]]),
        mock_scene("hall", &[[1.0, 1.0]]),
        mock_scene("porch", &[[2.0, 0.5], [0.9, 0.9]]),
    ];
    let list = SceneList::from_names(scenes.iter().map(|s| s.name.clone()).collect()).unwrap();
    (MockReader::new(scenes, failing), list)
}
