use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::error::RenderError;

/// A named GPU texture that is uploaded once and then updated in place.
pub struct TextureSlot {
    name: String,
    handle: Option<TextureHandle>,
}

impl std::fmt::Debug for TextureSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureSlot")
            .field("name", &self.name)
            .field("loaded", &self.handle.is_some())
            .finish()
    }
}

impl TextureSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }

    pub fn id(&self) -> Option<TextureId> {
        self.handle.as_ref().map(TextureHandle::id)
    }

    /// Uploads `image`, replacing whatever the slot held
    pub fn update(&mut self, ctx: &Context, image: ColorImage) -> TextureId {
        match &mut self.handle {
            Some(handle) => {
                handle.set(image, TextureOptions::LINEAR);
                handle.id()
            }
            None => {
                let handle = ctx.load_texture(&self.name, image, TextureOptions::LINEAR);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
        }
    }

    /// Returns the loaded texture, generating it on first use.
    ///
    /// A failed generation is logged and retried next time.
    pub fn get_or_create<F>(&mut self, ctx: &Context, generator: F) -> Option<TextureId>
    where
        F: FnOnce() -> Result<ColorImage, RenderError>,
    {
        if let Some(id) = self.id() {
            return Some(id);
        }

        match generator() {
            Ok(image) => Some(self.update(ctx, image)),
            Err(err) => {
                log::error!("Failed to generate texture {}: {}", self.name, err);
                None
            }
        }
    }

    /// Drops the texture so the next `get_or_create` regenerates it
    pub fn invalidate(&mut self) {
        self.handle = None;
    }
}
