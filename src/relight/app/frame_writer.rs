use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{colortype, Compression, TiffEncoder};
use tracing::debug;

use crate::relight::common::error::{RelightError, Result};
use crate::relight::compositor::Rendered;
use crate::relight::config::TiffCompression;
use crate::relight::scene::LinearImage;

/// Sink for rendered frames.
pub trait FrameWriter {
    fn write_frame(&self, scene: &str, rendered: &Rendered) -> Result<()>;
}

/// Writes `{scene}_raw.png` and `{scene}_srgb.png`, plus
/// `{scene}_linear.tiff` when linear export is enabled.
pub struct PngFrameWriter {
    dir: PathBuf,
    export_linear: bool,
    compression: TiffCompression,
}

impl PngFrameWriter {
    /// Creates `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>, export_linear: bool, compression: TiffCompression) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            RelightError::OutputWrite(format!("{}: {}", dir.display(), e))
        })?;
        Ok(Self {
            dir,
            export_linear,
            compression,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FrameWriter for PngFrameWriter {
    fn write_frame(&self, scene: &str, rendered: &Rendered) -> Result<()> {
        let raw_path = self.dir.join(format!("{scene}_raw.png"));
        let srgb_path = self.dir.join(format!("{scene}_srgb.png"));

        for (image, path) in [(&rendered.corrected, &raw_path), (&rendered.display, &srgb_path)] {
            image.save(path).map_err(|e| {
                RelightError::OutputWrite(format!("{}: {}", path.display(), e))
            })?;
        }

        if self.export_linear {
            let tiff_path = self.dir.join(format!("{scene}_linear.tiff"));
            let mut file = std::fs::File::create(&tiff_path).map_err(|e| {
                RelightError::OutputWrite(format!("{}: {}", tiff_path.display(), e))
            })?;
            write_linear_tiff(&rendered.linear, &mut file, self.compression)?;
        }

        debug!(scene, dir = %self.dir.display(), "Wrote frame");
        Ok(())
    }
}

/// Encode a linear [0, 1] image as 16-bit RGB TIFF.
pub fn write_linear_tiff(
    image: &LinearImage,
    output: &mut dyn Write,
    compression: TiffCompression,
) -> Result<()> {
    debug!("Encoding linear TIFF: {}x{}", image.width(), image.height());

    let data: Vec<u16> = image
        .pixels()
        .iter()
        .flatten()
        .map(|&v| (v.max(0.0).min(1.0) * u16::MAX as f32).round() as u16)
        .collect();

    let compression = match compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    };

    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| RelightError::Encode(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<colortype::RGB16>(image.width(), image.height(), &data)
            .map_err(|e| RelightError::Encode(e.to_string()))?;
    }

    output.write_all(&buffer)?;
    Ok(())
}
