use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The four per-scene files a scene is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `{name}_input_srgb.png`
    InputPreview,
    /// `{name}_result.png`
    ResultPreview,
    /// `{name}.tiff`
    RawCapture,
    /// `{name}.json`
    MixBundle,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Artifact::InputPreview,
        Artifact::ResultPreview,
        Artifact::RawCapture,
        Artifact::MixBundle,
    ];

    /// File name of this artifact for the given scene.
    pub fn file_name(self, scene: &str) -> String {
        match self {
            Artifact::InputPreview => format!("{scene}_input_srgb.png"),
            Artifact::ResultPreview => format!("{scene}_result.png"),
            Artifact::RawCapture => format!("{scene}.tiff"),
            Artifact::MixBundle => format!("{scene}.json"),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::InputPreview => write!(f, "input preview"),
            Artifact::ResultPreview => write!(f, "result preview"),
            Artifact::RawCapture => write!(f, "raw capture"),
            Artifact::MixBundle => write!(f, "mix bundle"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RelightError {
    #[error("scene '{scene}': missing {artifact} ({})", .path.display())]
    MissingArtifact {
        scene: String,
        artifact: Artifact,
        path: PathBuf,
    },

    #[error("scene '{scene}': failed to decode {artifact}: {reason}")]
    Decode {
        scene: String,
        artifact: Artifact,
        reason: String,
    },

    #[error("scene '{scene}': malformed mix bundle: {reason}")]
    MalformedBundle { scene: String, reason: String },

    #[error("dimension mismatch in {what}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        what: String,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("{what}: expected {expected} values, found {found}")]
    BufferLength {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("{chromaticities} chromaticities given for {mix_maps} mix maps")]
    IlluminantCountMismatch {
        mix_maps: usize,
        chromaticities: usize,
    },

    #[error("illuminant index {index} out of range, scene has {count}")]
    IlluminantIndex { index: usize, count: usize },

    #[error("chromaticity limit must be finite and positive, got {0}")]
    InvalidChromaLimit(f32),

    #[error("scene list {}: {reason}", .path.display())]
    SceneList { path: PathBuf, reason: String },

    #[error("invalid command '{0}'")]
    InvalidCommand(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to write output file: {0}")]
    OutputWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelightError {
    /// Name of the scene a load error refers to, if any.
    pub fn scene(&self) -> Option<&str> {
        match self {
            RelightError::MissingArtifact { scene, .. }
            | RelightError::Decode { scene, .. }
            | RelightError::MalformedBundle { scene, .. } => Some(scene),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelightError>;
