use crate::relight::common::error::Result;
use crate::relight::scene::types::SceneResult;

/// Source of fully loaded scenes, keyed by scene name.
///
/// Implementations either return a complete, validated scene or an error; a
/// partially read scene is never handed out.
pub trait SceneReader {
    fn read_scene(&self, name: &str) -> Result<SceneResult>;
}
