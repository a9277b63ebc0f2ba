//! Flattens a [`DrawingState`] into pixels.
//!
//! Composition order is fixed: white fill, then the background image
//! stretched to the target size, then every completed stroke oldest first,
//! then the stroke in progress. The same output feeds the on-screen canvas
//! and PNG export.
//!
//! Stroke points are drawn exactly where they were recorded. When the target
//! size differs from the canvas the strokes were drawn on, strokes are not
//! rescaled; only the background stretches.
//!
//! Strokes without a segment of non-zero length (see [`Stroke::is_dot`])
//! draw nothing, so a tap leaves no mark.

use egui::Color32;
use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

use crate::color::{BACKGROUND_FILL, Hsv};
use crate::error::RenderError;
use crate::image::BackgroundImage;
use crate::state::DrawingState;
use crate::stroke::Stroke;

/// A flattened, straight-alpha RGBA8 bitmap
#[derive(Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl RasterImage {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut pixels = RgbaImage::new(pixmap.width(), pixmap.height());
        for (dst, src) in pixels.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Color at `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|Rgba([r, g, b, a])| Color32::from_rgba_unmultiplied(*r, *g, *b, *a))
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba_image(self) -> RgbaImage {
        self.pixels
    }

    /// Converts into an egui image for uploading as a texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.as_raw(),
        )
    }
}

/// Compositor with a cache for the stretched background.
///
/// Stretching the background is the most expensive step, and during live
/// drawing it is the same for every frame. The cache is keyed on the image
/// identity and the target size, so results are identical with or without it.
#[derive(Default)]
pub struct Renderer {
    background_cache: Option<CachedBackground>,
}

struct CachedBackground {
    image_id: usize,
    width: u32,
    height: u32,
    pixmap: Pixmap,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes `state` into a `width x height` opaque bitmap
    pub fn render(
        &mut self,
        state: &DrawingState,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        pixmap.fill(skia_color(BACKGROUND_FILL));

        if let Some(background) = state.background() {
            let layer = self.background_layer(background, width, height)?;
            pixmap.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        for stroke in state.strokes() {
            draw_stroke(&mut pixmap, stroke);
        }

        Ok(RasterImage::from_pixmap(&pixmap))
    }

    /// Forgets the cached background layer
    pub fn invalidate(&mut self) {
        self.background_cache = None;
    }

    fn background_layer(
        &mut self,
        background: &BackgroundImage,
        width: u32,
        height: u32,
    ) -> Result<&Pixmap, RenderError> {
        let cached = self.background_cache.as_ref().is_some_and(|cache| {
            cache.image_id == background.id() && cache.width == width && cache.height == height
        });

        if !cached {
            log::debug!(
                "Stretching background {} from {}x{} to {}x{}",
                background.id(),
                background.width(),
                background.height(),
                width,
                height
            );
            self.background_cache = Some(CachedBackground {
                image_id: background.id(),
                width,
                height,
                pixmap: stretch_background(background, width, height)?,
            });
        }

        self.background_cache
            .as_ref()
            .map(|cache| &cache.pixmap)
            .ok_or(RenderError::InvalidDimensions { width, height })
    }
}

/// Composes `state` into a `width x height` opaque bitmap without caching
pub fn render(state: &DrawingState, width: u32, height: u32) -> Result<RasterImage, RenderError> {
    Renderer::new().render(state, width, height)
}

/// Draws the hue/saturation wheel that [`color::color_at`](crate::color::color_at)
/// inverts.
///
/// One wedge per degree of hue at full saturation, then white rings that get
/// more opaque towards the center. Outside the disk the image is transparent.
pub fn render_color_wheel(diameter: u32) -> Result<RasterImage, RenderError> {
    let mut pixmap = Pixmap::new(diameter, diameter).ok_or(RenderError::InvalidDimensions {
        width: diameter,
        height: diameter,
    })?;

    let radius = diameter as f32 / 2.0;
    let (cx, cy) = (radius, radius);

    for degree in 0..360 {
        // Wedges overlap slightly so anti-aliasing leaves no seams
        let start = (degree as f32 - 0.25).to_radians();
        let middle = (degree as f32 + 0.5).to_radians();
        let end = (degree as f32 + 1.25).to_radians();

        let mut pb = PathBuilder::new();
        pb.move_to(cx, cy);
        for angle in [start, middle, end] {
            pb.line_to(cx + radius * angle.cos(), cy + radius * angle.sin());
        }
        pb.close();

        if let Some(path) = pb.finish() {
            let paint = fill_paint(Hsv::new(degree as f32, 1.0, 1.0).to_color());
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    for step in (0..=100).step_by(5) {
        let fraction = step as f32 / 100.0;
        let ring_radius = radius * (1.0 - fraction);
        let alpha = (fraction * 0.5 * 255.0).round() as u8;

        if let Some(path) = PathBuilder::from_circle(cx, cy, ring_radius) {
            let paint = fill_paint(Color32::from_rgba_unmultiplied(255, 255, 255, alpha));
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    Ok(RasterImage::from_pixmap(&pixmap))
}

fn stretch_background(
    background: &BackgroundImage,
    width: u32,
    height: u32,
) -> Result<Pixmap, RenderError> {
    let stretched = background.stretched(width, height);
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(stretched.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Ok(pixmap)
}

fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke) {
    if stroke.is_dot() {
        return;
    }

    let Some((first, rest)) = stroke.points().split_first() else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for point in rest {
        pb.line_to(point.x, point.y);
    }

    let Some(path) = pb.finish() else {
        return;
    };

    let style = tiny_skia::Stroke {
        width: stroke.width(),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(&path, &fill_paint(stroke.color()), &style, Transform::identity(), None);
}

fn fill_paint(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn skia_color(color: Color32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}
