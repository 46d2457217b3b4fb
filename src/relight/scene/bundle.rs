//! Mixing-weight bundle stored next to each scene as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::relight::common::error::{RelightError, Result};
use crate::relight::scene::types::{Chromaticity, IlluminantSet, MixMap};

/// `mixmap` is shaped `[N][H][W]`, `chroma` is shaped `[N][2]` as (red, blue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixBundle {
    pub mixmap: Vec<Vec<Vec<f32>>>,
    pub chroma: Vec<[f32; 2]>,
}

impl MixBundle {
    pub fn read(scene: &str, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| RelightError::MalformedBundle {
            scene: scene.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        let bundle: MixBundle =
            serde_json::from_slice(&bytes).map_err(|e| RelightError::MalformedBundle {
                scene: scene.to_string(),
                reason: e.to_string(),
            })?;
        debug!(
            illuminants = bundle.mixmap.len(),
            chromaticities = bundle.chroma.len(),
            "Parsed mix bundle"
        );
        Ok(bundle)
    }

    /// Validate shapes and values and convert into an [`IlluminantSet`].
    pub fn into_illuminants(self, scene: &str) -> Result<IlluminantSet> {
        let malformed = |reason: String| RelightError::MalformedBundle {
            scene: scene.to_string(),
            reason,
        };

        if self.mixmap.is_empty() {
            return Err(malformed("no mix maps".to_string()));
        }

        let mut mix_maps = Vec::with_capacity(self.mixmap.len());
        for (i, rows) in self.mixmap.into_iter().enumerate() {
            let height = rows.len();
            let width = rows.first().map_or(0, Vec::len);
            if width == 0 || height == 0 {
                return Err(malformed(format!("mix map {i} is empty")));
            }

            let mut weights = Vec::with_capacity(width * height);
            for (y, row) in rows.into_iter().enumerate() {
                if row.len() != width {
                    return Err(malformed(format!(
                        "mix map {i} row {y} has {} columns, expected {width}",
                        row.len()
                    )));
                }
                weights.extend(row);
            }
            if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(malformed(format!("mix map {i} has invalid weight {bad}")));
            }

            mix_maps.push(MixMap::from_weights(width as u32, height as u32, weights)?);
        }

        if let Some(bad) = self.chroma.iter().flatten().find(|c| !c.is_finite()) {
            return Err(malformed(format!("invalid chromaticity component {bad}")));
        }
        let chromaticities = self.chroma.into_iter().map(Chromaticity::from).collect();

        IlluminantSet::new(mix_maps, chromaticities)
    }
}
