//! Rendering a drawing to a PNG file.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::CanvasConfig;
use crate::error::{ExportError, ExportResult};
use crate::renderer::{self, RasterImage};
use crate::state::DrawingState;
use crate::util::time;

pub const PNG_MIME_TYPE: &str = "image/png";

/// Somewhere encoded images can be stored: a directory, a media library, a
/// network share.
///
/// Returns a human-readable description of where the image ended up.
pub trait ImageSink: Send + Sync {
    fn persist(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> io::Result<String>;
}

/// Writes images as files into a directory, creating it on first use.
///
/// Existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct PicturesDirSink {
    dir: PathBuf,
}

impl PicturesDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform pictures directory, or the working directory when the
    /// platform has none
    pub fn platform_default() -> Self {
        Self::new(dirs::picture_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        match &config.export_dir {
            Some(dir) => Self::new(dir.clone()),
            None => Self::platform_default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for PicturesDirSink {
    fn persist(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> io::Result<String> {
        if !self.dir.exists() {
            log::info!("Creating export directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.dir.join(file_name);
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        file.write_all(bytes)?;
        file.flush()?;

        log::debug!("Wrote {} ({} bytes, {})", path.display(), bytes.len(), mime_type);
        Ok(path.display().to_string())
    }
}

/// What a successful export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: String,
    /// Where the sink stored the file
    pub location: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

/// Renders drawings at a requested size, encodes them as PNG and hands the
/// bytes to an [`ImageSink`].
#[derive(Clone)]
pub struct ExportPipeline {
    sink: Arc<dyn ImageSink>,
    file_prefix: String,
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("file_prefix", &self.file_prefix)
            .finish_non_exhaustive()
    }
}

impl ExportPipeline {
    pub fn new(sink: Arc<dyn ImageSink>) -> Self {
        Self {
            sink,
            file_prefix: "Drawing".to_string(),
        }
    }

    /// A pipeline writing into the configured export directory
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(Arc::new(PicturesDirSink::from_config(config)))
            .with_file_prefix(config.file_prefix.clone())
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// A fresh `<prefix>_<epoch-millis>.png` name
    pub fn file_name(&self) -> String {
        format!("{}_{}.png", self.file_prefix, time::timestamp_millis())
    }

    /// Renders `state` at `width x height` and stores it as a PNG.
    ///
    /// Nothing is rendered or stored when either dimension is not positive.
    pub fn export(
        &self,
        state: &DrawingState,
        width: i32,
        height: i32,
    ) -> ExportResult<ExportReceipt> {
        let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(ExportError::InvalidDimensions { width, height }),
        };

        log::debug!("Exporting {} strokes at {}x{}", state.history().len(), w, h);
        let image = renderer::render(state, w, h)?;
        let bytes = encode_png(&image)?;

        let file_name = self.file_name();
        let location = self
            .sink
            .persist(&bytes, &file_name, PNG_MIME_TYPE)
            .map_err(|err| ExportError::PersistenceFailed(err.to_string()))?;

        log::info!("Drawing saved: {} ({} bytes)", location, bytes.len());
        Ok(ExportReceipt {
            file_name,
            location,
            width: w,
            height: h,
            byte_len: bytes.len(),
        })
    }
}

/// Losslessly encodes a bitmap as PNG
pub fn encode_png(image: &RasterImage) -> ExportResult<Vec<u8>> {
    encode_rgba(image.as_raw(), image.width(), image.height())
}

// `raw` must hold `width * height` RGBA pixels
fn encode_rgba(raw: &[u8], width: u32, height: u32) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(raw, width, height, ExtendedColorType::Rgba8)
        .map_err(|err| ExportError::EncodingFailed(err.to_string()))?;

    if bytes.is_empty() {
        return Err(ExportError::EncodingFailed("encoder produced no output".to_string()));
    }
    Ok(bytes)
}
