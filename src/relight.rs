//! Multi-illuminant relighting
//!
//! Loads precomputed decomposition results, lets the user retint each
//! illuminant and re-renders the white-balanced capture. Scene loading,
//! compositing, the session controller and the widgets are separate modules.

pub mod app;
pub mod common;
pub mod compositor;
pub mod config;
pub mod layout;
pub mod picker;
pub mod scene;
pub mod session;
pub mod timing;

#[cfg(test)]
mod test_support;

pub use common::{Artifact, RelightError, Result};

pub use scene::{
    Chromaticity,
    DirectorySceneReader,
    LinearImage,
    MixMap,
    SceneList,
    SceneReader,
    SceneResult,
};

pub use compositor::{
    composite,
    ColorMatrix,
    Rendered,
};

pub use config::{
    RelightConfig,
    RelightConfigBuilder,
    TiffCompression,
};

pub use session::{Direction, Session};
pub use app::{Control, DemoApp, FrameWriter, PngFrameWriter};
