use tracing::{debug, error, info, instrument};

use crate::relight::common::error::{RelightError, Result};
use crate::relight::compositor::{composite_timed, Rendered};
use crate::relight::scene::{Chromaticity, SceneList, SceneReader, SceneResult};
use crate::relight::timing::RenderTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }
}

pub struct Session<R: SceneReader> {
    reader: R,
    scenes: SceneList,
    index: usize,
    scene: SceneResult,
    overrides: Vec<Chromaticity>,
    chroma_limit: f32,
    rendered: Rendered,
    timings: RenderTimings,
    render_count: u64,
}

impl<R: SceneReader> Session<R> {
    /// Load and render the first scene of `scenes`.
    ///
    /// Chromaticity edits are clamped to `[0, chroma_limit]`.
    pub fn open(reader: R, scenes: SceneList, chroma_limit: f32) -> Result<Self> {
        if !(chroma_limit.is_finite() && chroma_limit > 0.0) {
            return Err(RelightError::InvalidChromaLimit(chroma_limit));
        }
        let name = scenes.get(0).unwrap_or_default().to_string();
        let scene = reader.read_scene(&name)?;
        let overrides = scene.illuminants.chromaticities().to_vec();
        let mut timings = RenderTimings::new();
        let rendered = render(&scene, &overrides, &mut timings)?;

        Ok(Self {
            reader,
            scenes,
            index: 0,
            scene,
            overrides,
            chroma_limit,
            rendered,
            timings,
            render_count: 1,
        })
    }

    /// Switch to the scene at `index`, wrapping in both directions.
    ///
    /// The new scene is fully loaded and rendered before anything is replaced;
    /// on failure the current scene stays as it was.
    #[instrument(skip(self), fields(current = %self.scene.name))]
    pub fn select_scene(&mut self, index: i64) -> Result<()> {
        let index = self.scenes.wrap(index);
        let name = self.scenes.get(index).unwrap_or_default().to_string();
        info!(scene = %name, index, "Load Result");

        let scene = match self.reader.read_scene(&name) {
            Ok(scene) => scene,
            Err(e) => {
                error!(scene = %name, "Scene load failed: {}", e);
                return Err(e);
            }
        };
        let overrides = scene.illuminants.chromaticities().to_vec();
        let rendered = render(&scene, &overrides, &mut self.timings)?;

        self.index = index;
        self.scene = scene;
        self.overrides = overrides;
        self.rendered = rendered;
        self.render_count += 1;
        Ok(())
    }

    pub fn advance(&mut self, direction: Direction) -> Result<()> {
        self.select_scene(self.index as i64 + direction.step())
    }

    /// Override one illuminant's chromaticity and re-render.
    pub fn set_chromaticity(&mut self, illuminant: usize, value: Chromaticity) -> Result<()> {
        let count = self.overrides.len();
        let slot = self
            .overrides
            .get_mut(illuminant)
            .ok_or(RelightError::IlluminantIndex {
                index: illuminant,
                count,
            })?;
        *slot = value.clamped(self.chroma_limit);
        debug!(illuminant, "{}", slot);
        self.rerender()
    }

    /// Restore the chromaticities read when the scene was loaded.
    pub fn reset_chromaticities(&mut self) -> Result<()> {
        info!(scene = %self.scene.name, "Reset chromaticities");
        self.overrides = self.scene.illuminants.chromaticities().to_vec();
        self.rerender()
    }

    fn rerender(&mut self) -> Result<()> {
        self.rendered = render(&self.scene, &self.overrides, &mut self.timings)?;
        self.render_count += 1;
        Ok(())
    }

    pub fn scene(&self) -> &SceneResult {
        &self.scene
    }

    pub fn scene_name(&self) -> &str {
        &self.scene.name
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn scenes(&self) -> &SceneList {
        &self.scenes
    }

    pub fn illuminant_count(&self) -> usize {
        self.overrides.len()
    }

    /// Illuminants past the scene's count have no controls.
    pub fn is_illuminant_active(&self, illuminant: usize) -> bool {
        illuminant < self.overrides.len()
    }

    pub fn chromaticity(&self, illuminant: usize) -> Option<Chromaticity> {
        self.overrides.get(illuminant).copied()
    }

    pub fn chromaticities(&self) -> &[Chromaticity] {
        &self.overrides
    }

    /// Text readout of one illuminant, e.g. `R: 1.20, G: 1.0, B: 0.85`.
    pub fn readout(&self, illuminant: usize) -> Option<String> {
        self.chromaticity(illuminant).map(|c| c.to_string())
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    /// Incremented on every successful render.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn chroma_limit(&self) -> f32 {
        self.chroma_limit
    }

    /// Timings accumulated over every render of this session.
    pub fn timings(&self) -> &RenderTimings {
        &self.timings
    }
}

fn render(
    scene: &SceneResult,
    chromaticities: &[Chromaticity],
    timings: &mut RenderTimings,
) -> Result<Rendered> {
    let mut step = RenderTimings::new();
    let rendered = composite_timed(
        scene.illuminants.mix_maps(),
        chromaticities,
        &scene.raw,
        &scene.cam_to_display,
        &mut step,
    )?;
    debug!(
        scene = %scene.name,
        elapsed_ms = step.total_duration().as_secs_f64() * 1000.0,
        "Rendered"
    );
    timings.merge(&step);
    Ok(rendered)
}
