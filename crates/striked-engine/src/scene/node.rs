use crate::canvas::{Canvas, CanvasContent, DrawStats};
use crate::render::{Renderer, ResourceSetId};
use crate::world::View2D;

/// Hooks a stage calls on 2D nodes, in this order per frame:
/// `before_draw` on every node, then `on_draw_2d` on visible ones.
pub trait Drawable2D {
    /// Called once when the node is added to a stage.
    fn on_enter_tree(&mut self) {}

    fn before_draw(&mut self, renderer: &mut dyn Renderer);

    fn on_draw_2d(&self, renderer: &mut dyn Renderer, view: &View2D) -> DrawStats;

    fn is_visible(&self) -> bool {
        true
    }

    /// Requests a rebuild of whatever the node caches.
    fn invalidate(&mut self) {}

    fn dispose(&mut self) {}
}

/// Hooks a stage calls on 3D nodes. `camera` is the camera uniform set.
pub trait Drawable3D {
    fn on_enter_tree(&mut self) {}

    fn before_draw(&mut self, renderer: &mut dyn Renderer) {
        let _ = renderer;
    }

    fn on_draw_3d(&self, renderer: &mut dyn Renderer, camera: ResourceSetId) -> DrawStats {
        let _ = (renderer, camera);
        DrawStats::default()
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn dispose(&mut self) {}
}

impl<C: CanvasContent> Drawable2D for Canvas<C> {
    fn on_enter_tree(&mut self) {
        Canvas::on_enter_tree(self);
    }

    fn before_draw(&mut self, renderer: &mut dyn Renderer) {
        Canvas::before_draw(self, renderer);
    }

    fn on_draw_2d(&self, renderer: &mut dyn Renderer, view: &View2D) -> DrawStats {
        Canvas::on_draw_2d(self, renderer, view)
    }

    fn is_visible(&self) -> bool {
        Canvas::is_visible(self)
    }

    fn invalidate(&mut self) {
        self.update_canvas();
    }

    fn dispose(&mut self) {
        Canvas::dispose(self);
    }
}
