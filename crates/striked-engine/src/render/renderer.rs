use std::rc::Rc;

use crate::coords::Viewport;

use super::{
    BufferDesc, BufferId, Material, Material2DInfo, MaterialDesc, RenderError, ResourceSetDesc,
    ResourceSetId, TextureDesc, TextureId,
};

/// Index count of one canvas quad (two triangles).
pub const QUAD_INDEX_COUNT: u32 = 6;

/// Immediate-mode renderer consumed by canvases, fonts, textures and world gates.
///
/// Draw-state calls (`set_*`, `bind_buffers`, `push_constant`,
/// `draw_index_instanced`) are recorded in call order and executed in that
/// order; a backend must not reorder them. Resource creation is synchronous.
///
/// The trait is object safe; engine code always takes `&mut dyn Renderer`.
pub trait Renderer {
    /// Material used by canvases that do not carry their own.
    fn default_2d_material(&self) -> Option<Rc<Material>>;

    /// 1x1 white texture set, bound wherever a slot has nothing better.
    fn default_texture_set(&self) -> ResourceSetId;

    /// Shared quad index buffer ([`QUAD_INDEX_COUNT`] indices).
    fn index_default_buffer(&self) -> BufferId;

    fn create_material(&mut self, desc: MaterialDesc) -> Rc<Material>;

    /// Builds whatever GPU state `material` needs. Called while it is dirty.
    fn prepare_material(&mut self, material: &Material) -> Result<(), RenderError>;

    fn set_material(&mut self, material: &Material);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Binds an optional vertex buffer and the index buffer for following draws.
    fn bind_buffers(&mut self, vertex: Option<BufferId>, index: BufferId);

    /// Binds resource sets to slots `0..sets.len()`.
    fn set_resource_sets(&mut self, sets: &[ResourceSetId]);

    /// Per-draw payload for the next `draw_index_instanced`.
    fn push_constant(&mut self, info: &Material2DInfo);

    /// Issues one instanced indexed draw (one instance).
    fn draw_index_instanced(&mut self, index_count: u32);

    fn create_buffer(&mut self, desc: BufferDesc) -> BufferId;

    fn update_buffer(&mut self, buffer: BufferId, offset: u64, data: &[u8])
        -> Result<(), RenderError>;

    fn create_texture(&mut self, desc: TextureDesc, pixels: &[u8])
        -> Result<TextureId, RenderError>;

    fn create_resource_set(&mut self, desc: ResourceSetDesc)
        -> Result<ResourceSetId, RenderError>;

    fn release_buffer(&mut self, buffer: BufferId);

    fn release_texture(&mut self, texture: TextureId);

    fn release_resource_set(&mut self, set: ResourceSetId);
}
