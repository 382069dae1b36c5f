use std::cell::Cell;

use crate::render::{
    RenderError, Renderer, ResourceSetDesc, ResourceSetId, TextureDesc, TextureFormat, TextureId,
};

use super::TextureSource;

/// An RGBA8 bitmap that uploads itself the first time it is drawn.
#[derive(Debug)]
pub struct BitmapTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    texture: Cell<Option<TextureId>>,
    set: Cell<Option<ResourceSetId>>,
}

impl BitmapTexture {
    /// Wraps tightly packed, straight-alpha sRGB pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTextureSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::PixelSizeMismatch { expected, actual: pixels.len() });
        }
        Ok(Self {
            width,
            height,
            pixels,
            texture: Cell::new(None),
            set: Cell::new(None),
        })
    }

    /// `cols`×`rows` checkerboard of `cell`-sized squares.
    pub fn checkerboard(cols: u32, rows: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Result<Self, RenderError> {
        let (Some(width), Some(height)) = (cols.checked_mul(cell), rows.checked_mul(cell)) else {
            return Err(RenderError::InvalidTextureSize {
                width: cols.saturating_mul(cell),
                height: rows.saturating_mul(cell),
            });
        };
        let byte_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(RenderError::InvalidTextureSize { width, height })?;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTextureSize { width, height });
        }
        let mut pixels = Vec::with_capacity(byte_len);
        for y in 0..height {
            for x in 0..width {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self::from_rgba8(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_realized(&self) -> bool {
        self.set.get().is_some()
    }

    /// Drops the GPU copy; the next `before_draw` uploads again.
    pub fn release(&self, renderer: &mut dyn Renderer) {
        if let Some(set) = self.set.take() {
            renderer.release_resource_set(set);
        }
        if let Some(texture) = self.texture.take() {
            renderer.release_texture(texture);
        }
    }

    fn realize(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        let texture = match self.texture.get() {
            Some(t) => t,
            None => {
                let desc = TextureDesc {
                    label: "striked bitmap texture",
                    width: self.width,
                    height: self.height,
                    format: TextureFormat::Rgba8,
                };
                let t = renderer.create_texture(desc, &self.pixels)?;
                self.texture.set(Some(t));
                t
            }
        };
        let set = renderer.create_resource_set(ResourceSetDesc::Texture { texture })?;
        self.set.set(Some(set));
        Ok(())
    }
}

impl TextureSource for BitmapTexture {
    fn before_draw(&self, renderer: &mut dyn Renderer) {
        if self.is_realized() {
            return;
        }
        match self.realize(renderer) {
            Ok(()) => log::debug!("bitmap texture {}x{} uploaded", self.width, self.height),
            Err(e) => log::warn!("bitmap texture upload failed, retrying next frame: {e}"),
        }
    }

    fn resource_set(&self) -> Option<ResourceSetId> {
        self.set.get()
    }
}
