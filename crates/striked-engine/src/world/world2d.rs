use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::render::{RenderError, Renderer, ResourceSetId};

use super::UniformGate;

/// Slot 0 uniform for canvas pipelines. Matches `World2D` in `canvas.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

/// What a canvas needs from the 2D world to draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View2D {
    /// Logical px.
    pub viewport: Viewport,
    /// World uniform set, bound to slot 0 of every canvas draw.
    pub world_set: ResourceSetId,
}

/// 2D world state: the viewport uniform shared by all canvases.
#[derive(Debug)]
pub struct World2D {
    viewport: UniformGate<ViewportUniform>,
    current: Viewport,
}

impl Default for World2D {
    fn default() -> Self {
        Self::new()
    }
}

impl World2D {
    pub fn new() -> Self {
        Self {
            viewport: UniformGate::new("striked world2d uniform"),
            current: Viewport::default(),
        }
    }

    /// Refreshes the viewport uniform and returns the view canvases draw with.
    pub fn update(
        &mut self,
        renderer: &mut dyn Renderer,
        viewport: Viewport,
    ) -> Result<View2D, RenderError> {
        let uniform = ViewportUniform {
            viewport: [viewport.width, viewport.height],
            _pad: [0.0; 2],
        };
        let world_set = self.viewport.sync(renderer, &uniform)?;
        self.current = viewport;
        Ok(View2D { viewport, world_set })
    }

    /// The last view produced by [`update`](Self::update).
    pub fn view(&self) -> Option<View2D> {
        self.viewport.resource_set().map(|world_set| View2D {
            viewport: self.current,
            world_set,
        })
    }

    pub fn dispose(&mut self, renderer: &mut dyn Renderer) {
        self.viewport.dispose(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;

    #[test]
    fn view_tracks_latest_viewport() {
        let mut renderer = RecordingRenderer::new();
        let mut world = World2D::new();
        assert!(world.view().is_none());

        let first = world.update(&mut renderer, Viewport::new(800.0, 600.0)).unwrap();
        let second = world.update(&mut renderer, Viewport::new(1024.0, 768.0)).unwrap();

        assert_eq!(first.world_set, second.world_set);
        assert_eq!(second.viewport, Viewport::new(1024.0, 768.0));
        assert_eq!(renderer.buffer_uploads, 2);
    }

    #[test]
    fn unchanged_viewport_skips_upload() {
        let mut renderer = RecordingRenderer::new();
        let mut world = World2D::new();
        world.update(&mut renderer, Viewport::new(800.0, 600.0)).unwrap();
        world.update(&mut renderer, Viewport::new(800.0, 600.0)).unwrap();
        assert_eq!(renderer.buffer_uploads, 1);
    }
}
