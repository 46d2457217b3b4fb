//! Run configuration types

use std::path::PathBuf;
use std::str::FromStr;

use crate::relight::picker::DEFAULT_RATIO;

/// Environment variable overriding the default result directory.
pub const ROOT_ENV: &str = "AID_ROOT";

const DEFAULT_ROOT: &str = "result";
const DEFAULT_SCENE_LIST: &str = "list.txt";
/// Picker side length, half of a display tile.
const DEFAULT_PICKER_SIZE: u32 = 128;

/// TIFF compression methods for the linear export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl FromStr for TiffCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "lzw" => Ok(Self::Lzw),
            "deflate-fast" => Ok(Self::DeflateFast),
            "deflate" | "deflate-balanced" => Ok(Self::DeflateBalanced),
            "deflate-best" => Ok(Self::DeflateBest),
            other => Err(format!("unknown compression '{other}'")),
        }
    }
}

/// Configuration for an interactive or batch relighting run
#[derive(Debug, Clone)]
pub struct RelightConfig {
    /// Directory holding the per-scene artifacts
    pub root: PathBuf,
    /// Text file with one scene name per line
    pub scene_list: PathBuf,
    /// Upper bound of both chromaticity axes
    pub picker_ratio: f32,
    /// Side length of each colour picker in pixels
    pub picker_size: u32,
    /// Where rendered frames are written, if anywhere
    pub output_dir: Option<PathBuf>,
    /// Also write the corrected linear image as 16-bit TIFF
    pub export_linear: bool,
    /// Compression for the linear TIFF export
    pub compression: TiffCompression,
}

impl Default for RelightConfig {
    fn default() -> Self {
        Self {
            root: std::env::var_os(ROOT_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
            scene_list: PathBuf::from(DEFAULT_SCENE_LIST),
            picker_ratio: DEFAULT_RATIO,
            picker_size: DEFAULT_PICKER_SIZE,
            output_dir: None,
            export_linear: false,
            compression: TiffCompression::None,
        }
    }
}

impl RelightConfig {
    pub fn builder() -> RelightConfigBuilder {
        RelightConfigBuilder::default()
    }
}

/// Builder for RelightConfig
#[derive(Default)]
pub struct RelightConfigBuilder {
    root: Option<PathBuf>,
    scene_list: Option<PathBuf>,
    picker_ratio: Option<f32>,
    picker_size: Option<u32>,
    output_dir: Option<Option<PathBuf>>,
    export_linear: Option<bool>,
    compression: Option<TiffCompression>,
}

impl RelightConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn scene_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.scene_list = Some(path.into());
        self
    }

    pub fn picker_ratio(mut self, ratio: f32) -> Self {
        self.picker_ratio = Some(ratio);
        self
    }

    pub fn picker_size(mut self, size: u32) -> Self {
        self.picker_size = Some(size);
        self
    }

    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn export_linear(mut self, enable: bool) -> Self {
        self.export_linear = Some(enable);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> RelightConfig {
        let default = RelightConfig::default();
        RelightConfig {
            root: self.root.unwrap_or(default.root),
            scene_list: self.scene_list.unwrap_or(default.scene_list),
            picker_ratio: self.picker_ratio.unwrap_or(default.picker_ratio),
            picker_size: self.picker_size.unwrap_or(default.picker_size),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            export_linear: self.export_linear.unwrap_or(default.export_linear),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = RelightConfig::builder()
            .root("scenes")
            .scene_list("order.txt")
            .picker_ratio(2.5)
            .output_dir(Some(PathBuf::from("frames")))
            .export_linear(true)
            .compression(TiffCompression::Lzw)
            .build();

        assert_eq!(config.root, PathBuf::from("scenes"));
        assert_eq!(config.scene_list, PathBuf::from("order.txt"));
        assert_eq!(config.picker_ratio, 2.5);
        assert_eq!(config.picker_size, 128);
        assert_eq!(config.output_dir, Some(PathBuf::from("frames")));
        assert!(config.export_linear);
        assert_eq!(config.compression, TiffCompression::Lzw);
    }

    #[test]
    fn test_builder_defaults() {
        let config = RelightConfig::builder().build();
        assert_eq!(config.scene_list, PathBuf::from("list.txt"));
        assert_eq!(config.picker_ratio, DEFAULT_RATIO);
        assert_eq!(config.output_dir, None);
        assert!(!config.export_linear);
        assert_eq!(config.compression, TiffCompression::None);
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!("LZW".parse(), Ok(TiffCompression::Lzw));
        assert_eq!("deflate".parse(), Ok(TiffCompression::DeflateBalanced));
        assert_eq!("deflate-best".parse(), Ok(TiffCompression::DeflateBest));
        assert!("zip".parse::<TiffCompression>().is_err());
    }
}
