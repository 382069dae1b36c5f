use std::cell::Cell;

use bytemuck::{Pod, Zeroable};

use super::{MaterialId, Renderer};

/// How a material's pipeline blends into the target.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// `src + dst * (1 - src.a)`; the canvas shader outputs premultiplied color.
    #[default]
    PremultipliedAlpha,
    /// `src + dst`.
    Additive,
}

#[derive(Debug, Clone)]
pub struct MaterialDesc {
    pub label: String,
    pub blend: BlendMode,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            label: "canvas material".to_string(),
            blend: BlendMode::PremultipliedAlpha,
        }
    }
}

/// A 2D material: the pipeline state a canvas is drawn with.
///
/// Materials start dirty. A dirty material has no usable pipeline yet and
/// suppresses every canvas draw that selects it until [`before_draw`]
/// succeeds.
///
/// [`before_draw`]: Material::before_draw
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    desc: MaterialDesc,
    dirty: Cell<bool>,
}

impl Material {
    pub fn new(id: MaterialId, desc: MaterialDesc) -> Self {
        Self { id, desc, dirty: Cell::new(true) }
    }

    #[inline]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.desc.label
    }

    #[inline]
    pub fn blend(&self) -> BlendMode {
        self.desc.blend
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Forces pipeline re-preparation on the next [`before_draw`](Self::before_draw).
    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Prepares the pipeline if dirty. Failures keep the material dirty.
    pub fn before_draw(&self, renderer: &mut dyn Renderer) {
        if !self.dirty.get() {
            return;
        }
        match renderer.prepare_material(self) {
            Ok(()) => {
                log::debug!("material '{}' prepared", self.desc.label);
                self.dirty.set(false);
            }
            Err(e) => log::warn!("material '{}' not ready: {e}", self.desc.label),
        }
    }
}

/// Per-draw payload for the canvas pipeline (push-constant equivalent).
///
/// Layout (80 bytes):
///
///  offset  0  position     [f32; 2]
///  offset  8  size         [f32; 2]
///  offset 16  color        [f32; 4]
///  offset 32  modulate     [f32; 4]
///  offset 48  font_region  [f32; 4]   atlas px: x0, y0, x1, y1
///  offset 64  font_range   f32
///  offset 68  is_font      f32
///  offset 72  use_texture  f32
///  offset 76  _pad         f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Material2DInfo {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    pub modulate: [f32; 4],
    pub font_region: [f32; 4],
    pub font_range: f32,
    pub is_font: f32,
    pub use_texture: f32,
    pub _pad: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;

    #[test]
    fn material_info_is_80_bytes() {
        assert_eq!(std::mem::size_of::<Material2DInfo>(), 80);
    }

    #[test]
    fn before_draw_clears_dirty_once_prepared() {
        let mut renderer = RecordingRenderer::new();
        let material = Material::new(MaterialId(7), MaterialDesc::default());
        assert!(material.is_dirty());

        material.before_draw(&mut renderer);
        material.before_draw(&mut renderer);

        assert!(!material.is_dirty());
        assert_eq!(renderer.prepared_materials, vec![MaterialId(7)]);
    }

    #[test]
    fn failed_preparation_keeps_material_dirty() {
        let mut renderer = RecordingRenderer::new();
        renderer.fail_material_preparation = true;
        let material = Material::new(MaterialId(1), MaterialDesc::default());

        material.before_draw(&mut renderer);

        assert!(material.is_dirty());
    }
}
