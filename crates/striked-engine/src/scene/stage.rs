use crate::canvas::DrawStats;
use crate::coords::Viewport;
use crate::render::{RenderError, Renderer};
use crate::world::{CameraInfo, World2D, World3D};

use super::{Drawable2D, Drawable3D};

/// Position of a node in its stage list.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeIndex(usize);

/// Ordered set of drawables plus the world uniforms they share.
///
/// Per frame: world uniforms update, every node gets `before_draw`, then
/// visible 3D nodes draw followed by visible 2D nodes, each list in
/// insertion order.
pub struct Stage {
    world_2d: World2D,
    world_3d: World3D,
    nodes_2d: Vec<Box<dyn Drawable2D>>,
    nodes_3d: Vec<Box<dyn Drawable3D>>,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self {
            world_2d: World2D::new(),
            world_3d: World3D::new(),
            nodes_2d: Vec::new(),
            nodes_3d: Vec::new(),
        }
    }

    pub fn add_2d(&mut self, node: impl Drawable2D + 'static) -> NodeIndex {
        let mut node = Box::new(node);
        node.on_enter_tree();
        self.nodes_2d.push(node);
        NodeIndex(self.nodes_2d.len() - 1)
    }

    pub fn add_3d(&mut self, node: impl Drawable3D + 'static) -> NodeIndex {
        let mut node = Box::new(node);
        node.on_enter_tree();
        self.nodes_3d.push(node);
        NodeIndex(self.nodes_3d.len() - 1)
    }

    /// Marks a 2D node for rebuild. Unknown indices are ignored.
    pub fn invalidate_2d(&mut self, index: NodeIndex) {
        if let Some(node) = self.nodes_2d.get_mut(index.0) {
            node.invalidate();
        }
    }

    #[inline]
    pub fn len_2d(&self) -> usize {
        self.nodes_2d.len()
    }

    #[inline]
    pub fn len_3d(&self) -> usize {
        self.nodes_3d.len()
    }

    /// Runs one frame against `renderer`.
    ///
    /// Without a camera the 3D pass is skipped. Errors only come from world
    /// uniform allocation; nothing is drawn in that case.
    pub fn frame(
        &mut self,
        renderer: &mut dyn Renderer,
        viewport: Viewport,
        camera: Option<&CameraInfo>,
    ) -> Result<DrawStats, RenderError> {
        let view = self.world_2d.update(renderer, viewport)?;
        if let Some(camera) = camera {
            self.world_3d.update(renderer, camera)?;
        }

        for node in &mut self.nodes_3d {
            node.before_draw(renderer);
        }
        for node in &mut self.nodes_2d {
            node.before_draw(renderer);
        }

        let mut stats = DrawStats::default();

        if let (Some(_), Some(camera_set)) = (camera, self.world_3d.resource_set()) {
            for node in self.nodes_3d.iter().filter(|n| n.is_visible()) {
                stats += node.on_draw_3d(renderer, camera_set);
            }
        }
        for node in self.nodes_2d.iter().filter(|n| n.is_visible()) {
            stats += node.on_draw_2d(renderer, &view);
        }

        Ok(stats)
    }

    /// Disposes every node and releases world uniforms.
    pub fn dispose(&mut self, renderer: &mut dyn Renderer) {
        for node in &mut self.nodes_2d {
            node.dispose();
        }
        for node in &mut self.nodes_3d {
            node.dispose();
        }
        self.nodes_2d.clear();
        self.nodes_3d.clear();
        self.world_2d.dispose(renderer);
        self.world_3d.dispose(renderer);
    }
}
