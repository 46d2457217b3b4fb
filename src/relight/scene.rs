//! Scene loading module
//!
//! A scene is four files sharing a name under a result directory: an input
//! preview, an output preview, the demosaiced raw capture and a bundle of
//! mixing weights plus chromaticities. This module reads them into a
//! [`SceneResult`] and provides the navigation order from a scene list.

mod bundle;
mod directory_reader;
mod reader;
mod scene_list;
pub mod types;


pub use bundle::MixBundle;
pub use directory_reader::{load, resize_to_height, DirectorySceneReader, RAW_WHITE_LEVEL};
pub use reader::SceneReader;
pub use scene_list::SceneList;
pub use types::{
    Chromaticity, IlluminantSet, LinearImage, MixMap, RawImage, ReferenceImages, SceneResult,
};
