use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

use crate::color;
use crate::renderer;
use crate::texture_manager::TextureSlot;

/// Hue/saturation disk: click or drag inside it to pick a color.
#[derive(Debug)]
pub struct ColorWheel {
    diameter: u32,
    texture: TextureSlot,
}

impl ColorWheel {
    pub fn new(diameter: u32) -> Self {
        Self {
            diameter,
            texture: TextureSlot::new("color_wheel"),
        }
    }

    /// Draws the wheel with a marker on `selected`. Returns the picked
    /// color, if the user picked one this frame.
    pub fn show(&mut self, ui: &mut egui::Ui, selected: Color32) -> Option<Color32> {
        let size = Vec2::splat(self.diameter as f32);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let center = rect.center();
        let radius = rect.width() / 2.0;

        let diameter = self.diameter;
        let texture = self.texture.get_or_create(ui.ctx(), || {
            renderer::render_color_wheel(diameter).map(|image| image.to_color_image())
        });
        if let Some(texture) = texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            ui.painter().image(texture, rect, uv, Color32::WHITE);
        }

        let marker = color::position_for(selected, center, radius);
        ui.painter().circle_stroke(marker, 5.0, Stroke::new(2.0, Color32::BLACK));
        ui.painter().circle_stroke(marker, 3.0, Stroke::new(1.0, Color32::WHITE));

        if response.clicked() || response.dragged() {
            let picked = response
                .interact_pointer_pos()
                .and_then(|pos| color::color_at(pos, center, radius));
            if let Some(color) = picked {
                log::debug!("Picked {:?} from the wheel", color);
                return Some(color);
            }
        }
        None
    }
}
