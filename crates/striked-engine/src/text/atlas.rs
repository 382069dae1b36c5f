use std::cell::Cell;

use crate::coords::Vec2;
use crate::render::{
    Renderer, ResourceSetDesc, ResourceSetId, TextureDesc, TextureFormat, TextureId,
};

use super::{AtlasHandle, AtlasId};

const GLYPH_PADDING: u32 = 1; // texels between glyphs

// ── page ──────────────────────────────────────────────────────────────────

/// One R8 atlas page. Pixels stay on the CPU until the first [`realize`].
///
/// [`realize`]: AtlasPage::realize
#[derive(Debug)]
pub(crate) struct AtlasPage {
    id: AtlasId,
    size: u32,
    pixels: Vec<u8>,
    texture: Cell<Option<TextureId>>,
    set: Cell<Option<ResourceSetId>>,
}

impl AtlasPage {
    fn new(id: AtlasId, size: u32) -> Self {
        Self {
            id,
            size,
            pixels: vec![0; size as usize * size as usize],
            texture: Cell::new(None),
            set: Cell::new(None),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> AtlasId {
        self.id
    }

    /// The GPU handle, once uploaded.
    pub(crate) fn handle(&self) -> Option<AtlasHandle> {
        self.set.get().map(|set| AtlasHandle { id: self.id, set })
    }

    /// Uploads the page if it is not on the GPU yet. Failures are logged and
    /// retried on the next call.
    pub(crate) fn realize(&self, renderer: &mut dyn Renderer) {
        if self.set.get().is_some() {
            return;
        }

        let texture = match self.texture.get() {
            Some(t) => t,
            None => {
                let desc = TextureDesc {
                    label: "striked glyph atlas",
                    width: self.size,
                    height: self.size,
                    format: TextureFormat::R8,
                };
                match renderer.create_texture(desc, &self.pixels) {
                    Ok(t) => {
                        self.texture.set(Some(t));
                        t
                    }
                    Err(e) => {
                        log::warn!("atlas page {:?} upload failed: {e}", self.id);
                        return;
                    }
                }
            }
        };

        match renderer.create_resource_set(ResourceSetDesc::Texture { texture }) {
            Ok(set) => {
                log::debug!("atlas page {:?} realized", self.id);
                self.set.set(Some(set));
            }
            Err(e) => log::warn!("atlas page {:?} set creation failed: {e}", self.id),
        }
    }

    /// Drops the GPU copy. The page can be realized again later.
    pub(crate) fn release(&self, renderer: &mut dyn Renderer) {
        if let Some(set) = self.set.take() {
            renderer.release_resource_set(set);
        }
        if let Some(texture) = self.texture.take() {
            renderer.release_texture(texture);
        }
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.size + x) as usize]
    }
}

// ── packer ────────────────────────────────────────────────────────────────

/// Shelf packer producing atlas pages. Opens a new page when the current one
/// is full.
#[derive(Debug)]
pub(crate) struct AtlasBuilder {
    page_size: u32,
    pages: Vec<AtlasPage>,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl AtlasBuilder {
    pub(crate) fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            pages: Vec::new(),
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
        }
    }

    /// Copies a `w`×`h` bitmap into the atlas and returns where it landed.
    ///
    /// Returns `None` when the bitmap can never fit on a page.
    pub(crate) fn place(&mut self, bitmap: &[u8], w: u32, h: u32) -> Option<(AtlasId, Vec2)> {
        if w + 2 * GLYPH_PADDING > self.page_size || h + 2 * GLYPH_PADDING > self.page_size {
            return None;
        }

        if self.pages.is_empty() {
            self.open_page();
        }

        // Advance to a new shelf row when the glyph doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > self.page_size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.page_size {
            self.open_page();
        }

        let gx = self.cursor_x;
        let gy = self.cursor_y;
        let page = self.pages.last_mut()?;
        let stride = page.size as usize;
        for row in 0..h as usize {
            let src = &bitmap[row * w as usize..(row + 1) * w as usize];
            let dst = (gy as usize + row) * stride + gx as usize;
            page.pixels[dst..dst + w as usize].copy_from_slice(src);
        }

        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);

        Some((page.id, Vec2::new(gx as f32, gy as f32)))
    }

    pub(crate) fn finish(self) -> Vec<AtlasPage> {
        self.pages
    }

    fn open_page(&mut self) {
        let id = AtlasId(self.pages.len() as u32);
        self.pages.push(AtlasPage::new(id, self.page_size));
        self.cursor_x = GLYPH_PADDING;
        self.cursor_y = GLYPH_PADDING;
        self.row_height = 0;
    }
}
