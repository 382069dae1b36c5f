use std::collections::HashSet;
use std::ops::AddAssign;
use std::rc::Rc;

use crate::render::{Material, QUAD_INDEX_COUNT, Renderer};
use crate::world::View2D;

use super::{Batch, BindingDefaults, CanvasPainter, resolve_binding_set};

/// What a canvas looks like. Re-run on every rebuild.
///
/// Implementations must re-issue all of their draw calls each time; the
/// batch is cleared before `draw_canvas` runs.
pub trait CanvasContent {
    fn draw_canvas(&mut self, painter: &mut CanvasPainter<'_>);
}

/// Adapts a closure into [`CanvasContent`]. See [`Canvas::from_fn`].
pub struct FnContent<F>(F);

impl<F> CanvasContent for FnContent<F>
where
    F: FnMut(&mut CanvasPainter<'_>),
{
    fn draw_canvas(&mut self, painter: &mut CanvasPainter<'_>) {
        (self.0)(painter)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CanvasState {
    /// Batch matches the content.
    Clean,
    /// Content changed; the next `before_draw` rebuilds.
    Dirty,
    /// Inside `draw_canvas`.
    Rebuilding,
}

/// Per-frame draw counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawStats {
    pub draw_calls: u32,
    /// Items left out this frame (e.g. glyphs whose atlas is not ready).
    pub skipped: u32,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.draw_calls += rhs.draw_calls;
        self.skipped += rhs.skipped;
    }
}

/// A 2D node that batches rects, lines, textures and text.
///
/// The batch is only rebuilt when the canvas is dirty; fonts and textures
/// it references are still bound every frame.
pub struct Canvas<C: CanvasContent> {
    content: C,
    batch: Batch,
    state: CanvasState,
    material: Option<Rc<Material>>,
    visible: bool,
    rebuilds: u64,
}

impl<F> Canvas<FnContent<F>>
where
    F: FnMut(&mut CanvasPainter<'_>),
{
    pub fn from_fn(draw: F) -> Self {
        Self::new(FnContent(draw))
    }
}

impl<C: CanvasContent> Canvas<C> {
    pub fn new(content: C) -> Self {
        Self {
            content,
            batch: Batch::new(),
            state: CanvasState::Dirty,
            material: None,
            visible: true,
            rebuilds: 0,
        }
    }

    /// Draws with `material` instead of the renderer default.
    pub fn with_material(mut self, material: Rc<Material>) -> Self {
        self.set_material(Some(material));
        self
    }

    pub fn set_material(&mut self, material: Option<Rc<Material>>) {
        self.material = material;
        self.mark_dirty();
    }

    #[inline]
    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    #[inline]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Mutable access to the content. Marks the canvas dirty.
    pub fn content_mut(&mut self) -> &mut C {
        self.mark_dirty();
        &mut self.content
    }

    #[inline]
    pub fn state(&self) -> CanvasState {
        self.state
    }

    #[inline]
    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    /// Number of rebuilds since creation.
    #[inline]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Entering the tree always forces one rebuild.
    pub fn on_enter_tree(&mut self) {
        self.mark_dirty();
    }

    /// Requests a rebuild on the next [`before_draw`](Self::before_draw).
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.state = CanvasState::Dirty;
    }

    #[inline]
    pub fn update_canvas(&mut self) {
        self.mark_dirty();
    }

    /// Empties the batch without touching the state.
    #[inline]
    pub fn clear_canvas(&mut self) {
        self.batch.clear();
    }

    /// Prepares the material while it is dirty, rebuilds if the canvas is
    /// dirty, then binds every font and texture in the batch.
    pub fn before_draw(&mut self, renderer: &mut dyn Renderer) {
        if let Some(material) = &self.material {
            material.before_draw(renderer);
        }
        if self.state == CanvasState::Dirty {
            self.rebuild();
        }
        self.bind_resources(renderer);
    }

    /// Issues one draw per batch item. Items whose resources are not ready
    /// are skipped; a missing or dirty material skips the whole canvas.
    pub fn on_draw_2d(&self, renderer: &mut dyn Renderer, view: &View2D) -> DrawStats {
        let mut stats = DrawStats::default();

        let Some(material) = self.material.clone().or_else(|| renderer.default_2d_material())
        else {
            return stats;
        };
        if material.is_dirty() || self.batch.is_empty() {
            return stats;
        }

        renderer.set_material(&material);
        renderer.set_viewport(view.viewport);
        let index = renderer.index_default_buffer();
        renderer.bind_buffers(None, index);

        let defaults = BindingDefaults {
            world: view.world_set,
            texture: renderer.default_texture_set(),
        };

        for item in &self.batch {
            let Some(sets) = resolve_binding_set(item, &defaults) else {
                log::trace!("skipping {item:?}: atlas not ready");
                stats.skipped += 1;
                continue;
            };
            renderer.set_resource_sets(&sets);
            renderer.push_constant(&item.material_info());
            renderer.draw_index_instanced(QUAD_INDEX_COUNT);
            stats.draw_calls += 1;
        }

        stats
    }

    /// Drops the batch. Re-entering the tree rebuilds it.
    pub fn dispose(&mut self) {
        self.batch.clear();
        self.state = CanvasState::Dirty;
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn rebuild(&mut self) {
        self.state = CanvasState::Rebuilding;
        self.batch.clear();
        self.content.draw_canvas(&mut CanvasPainter::new(&mut self.batch));

        self.rebuilds += 1;
        self.state = CanvasState::Clean;
        log::debug!("canvas rebuilt: {} items", self.batch.len());
    }

    fn bind_resources(&self, renderer: &mut dyn Renderer) {
        let mut seen: HashSet<*const ()> = HashSet::new();

        for item in &self.batch {
            if let Some(font) = item.font() {
                if seen.insert(Rc::as_ptr(font).cast::<()>()) {
                    font.bind(renderer);
                }
            } else if let Some(texture) = item.texture() {
                if seen.insert(Rc::as_ptr(texture).cast::<()>()) {
                    texture.before_draw(renderer);
                }
            }
        }
    }
}
