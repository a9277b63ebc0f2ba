//! Hue/saturation color wheel mapping and the stock palettes.
//!
//! The wheel is a disk where the angle around the center selects the hue and
//! the distance from the center selects the saturation. Brightness is always
//! full. Angles follow screen coordinates (y grows downwards), so hue
//! increases clockwise starting from the positive x axis.

use egui::{Color32, Pos2};

/// Fill color of an empty canvas. Erase mode paints with this color.
pub const BACKGROUND_FILL: Color32 = Color32::WHITE;

/// The row of swatches shown next to the canvas
pub const QUICK_PALETTE: [Color32; 5] = [
    Color32::RED,
    Color32::BLUE,
    Color32::GREEN,
    Color32::from_rgb(0xFF, 0x98, 0x00), // orange
    Color32::from_rgb(0x9C, 0x27, 0xB0), // purple
];

/// The swatch grid in the color picker
pub const BASIC_COLORS: [Color32; 16] = [
    Color32::BLACK,
    Color32::WHITE,
    Color32::RED,
    Color32::GREEN,
    Color32::BLUE,
    Color32::YELLOW,
    Color32::from_rgb(0x00, 0xFF, 0xFF), // cyan
    Color32::from_rgb(0xFF, 0x00, 0xFF), // magenta
    Color32::from_rgb(0xFF, 0x98, 0x00), // orange
    Color32::from_rgb(0x9C, 0x27, 0xB0), // purple
    Color32::from_rgb(0x79, 0x55, 0x48), // brown
    Color32::from_rgb(0x60, 0x7D, 0x8B), // blue grey
    Color32::from_rgb(0xE9, 0x1E, 0x63), // pink
    Color32::from_rgb(0x4C, 0xAF, 0x50), // light green
    Color32::from_rgb(0x21, 0x96, 0xF3), // light blue
    Color32::from_rgb(0xFF, 0x57, 0x22), // deep orange
];

/// A color in HSV space.
///
/// `hue` is in degrees `[0, 360)`, `saturation` and `value` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue: normalize_degrees(hue),
            saturation: saturation.clamp(0.0, 1.0),
            value: value.clamp(0.0, 1.0),
        }
    }

    /// Converts to an opaque 8-bit color
    pub fn to_color(self) -> Color32 {
        let [r, g, b] = hsv_to_rgb(self.hue, self.saturation, self.value);
        Color32::from_rgb(to_channel(r), to_channel(g), to_channel(b))
    }

    /// Converts from an 8-bit color, ignoring alpha.
    ///
    /// Grey colors have no defined hue and report `0.0`.
    pub fn from_color(color: Color32) -> Self {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        Self::new(hue, saturation, max)
    }
}

/// The HSV value the wheel shows at `position`.
///
/// Returns `None` when `position` lies outside the disk (or the disk has no
/// area). Callers are expected to test containment before picking.
pub fn hsv_at(position: Pos2, center: Pos2, radius: f32) -> Option<Hsv> {
    if radius.is_nan() || radius <= 0.0 {
        return None;
    }

    let dx = position.x - center.x;
    let dy = position.y - center.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance > radius {
        return None;
    }

    let angle = dy.atan2(dx).to_degrees();
    Some(Hsv::new(angle, distance / radius, 1.0))
}

/// The color the wheel shows at `position`, or `None` outside the disk
pub fn color_at(position: Pos2, center: Pos2, radius: f32) -> Option<Color32> {
    hsv_at(position, center, radius).map(Hsv::to_color)
}

/// True if `position` is inside the wheel (the rim counts as inside)
pub fn contains(position: Pos2, center: Pos2, radius: f32) -> bool {
    position.distance(center) <= radius
}

/// Where on the wheel `color` appears. Brightness is ignored.
pub fn position_for(color: Color32, center: Pos2, radius: f32) -> Pos2 {
    let hsv = Hsv::from_color(color);
    let angle = hsv.hue.to_radians();
    let distance = hsv.saturation * radius;
    Pos2::new(
        center.x + distance * angle.cos(),
        center.y + distance * angle.sin(),
    )
}

fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let m = value - chroma;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    [r + m, g + m, b + m]
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Pos2 = Pos2::new(100.0, 100.0);
    const RADIUS: f32 = 100.0;

    fn hue_distance(a: f32, b: f32) -> f32 {
        let diff = (a - b).abs() % 360.0;
        diff.min(360.0 - diff)
    }

    #[test]
    fn test_center_is_white() {
        assert_eq!(color_at(CENTER, CENTER, RADIUS), Some(Color32::WHITE));
    }

    #[test]
    fn test_rim_primaries() {
        // Right of center is hue 0 (red)
        assert_eq!(
            color_at(Pos2::new(200.0, 100.0), CENTER, RADIUS),
            Some(Color32::from_rgb(255, 0, 0))
        );
        // Below center is hue 90 in screen space
        let below = hsv_at(Pos2::new(100.0, 200.0), CENTER, RADIUS).unwrap();
        assert!((below.hue - 90.0).abs() < 1e-3);
        // Left of center is hue 180 (cyan)
        assert_eq!(
            color_at(Pos2::new(0.0, 100.0), CENTER, RADIUS),
            Some(Color32::from_rgb(0, 255, 255))
        );
        // Above center wraps to 270 rather than -90
        let above = hsv_at(Pos2::new(100.0, 0.0), CENTER, RADIUS).unwrap();
        assert!((above.hue - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_outside_disk_is_none() {
        assert_eq!(color_at(Pos2::new(201.0, 100.0), CENTER, RADIUS), None);
        assert_eq!(color_at(CENTER, CENTER, 0.0), None);
        assert_eq!(color_at(CENTER, CENTER, -5.0), None);
        assert_eq!(color_at(CENTER, CENTER, f32::NAN), None);
        assert!(!contains(Pos2::new(201.0, 100.0), CENTER, RADIUS));
        assert!(contains(Pos2::new(200.0, 100.0), CENTER, RADIUS));
    }

    #[test]
    fn test_saturation_follows_distance() {
        let half = hsv_at(Pos2::new(150.0, 100.0), CENTER, RADIUS).unwrap();
        assert!((half.saturation - 0.5).abs() < 1e-6);
        assert_eq!(half.value, 1.0);
    }

    #[test]
    fn test_pick_inverts_wheel() {
        for step in 0..36 {
            let angle = (step as f32 * 10.0 + 3.0).to_radians();
            for distance in [40.0_f32, 65.0, 90.0] {
                let position = Pos2::new(
                    CENTER.x + distance * angle.cos(),
                    CENTER.y + distance * angle.sin(),
                );
                let color = color_at(position, CENTER, RADIUS).unwrap();
                let picked = Hsv::from_color(color);

                let expected_hue = angle.to_degrees();
                assert!(
                    hue_distance(picked.hue, expected_hue) < 1.5,
                    "hue {} vs {}",
                    picked.hue,
                    expected_hue
                );
                assert!((picked.saturation - distance / RADIUS).abs() < 0.01);

                let back = position_for(color, CENTER, RADIUS);
                assert!(back.distance(position) < 2.0);
            }
        }
    }

    #[test]
    fn test_hsv_round_trip_on_palette() {
        for color in BASIC_COLORS {
            let hsv = Hsv::from_color(color);
            assert_eq!(hsv.to_color(), color);
        }
    }
}
