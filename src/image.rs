use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ImportError;

// Static counter for generating unique IDs
static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(1);

/// A decoded raster shown underneath the strokes.
///
/// Pixels are straight (unpremultiplied) RGBA8 and shared, so cloning a
/// background into a state snapshot never copies them.
#[derive(Clone)]
pub struct BackgroundImage {
    id: usize,
    pixels: Arc<RgbaImage>,
}

impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("id", &self.id)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

// Two backgrounds are the same if they came from the same import
impl PartialEq for BackgroundImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl BackgroundImage {
    pub fn new(pixels: RgbaImage) -> Self {
        let id = NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            pixels: Arc::new(pixels),
        }
    }

    /// Wraps raw RGBA8 data. Returns `None` if the buffer length does not
    /// match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    /// Decodes an encoded image (PNG, JPEG, GIF, WebP, BMP)
    pub fn decode(bytes: &[u8]) -> Result<Self, ImportError> {
        let img = image::load_from_memory(bytes)
            .map_err(|err| ImportError::DecodeFailed(err.to_string()))?;
        log::debug!("Decoded background image: {}x{}", img.width(), img.height());
        Ok(Self::new(img.to_rgba8()))
    }

    /// Reads and decodes an image file
    pub fn open(path: &std::path::Path) -> Result<Self, ImportError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Stretches the image to exactly `width x height`, ignoring aspect ratio
    pub fn stretched(&self, width: u32, height: u32) -> RgbaImage {
        if self.pixels.width() == width && self.pixels.height() == height {
            return (*self.pixels).clone();
        }
        imageops::resize(&*self.pixels, width, height, FilterType::Triangle)
    }
}
