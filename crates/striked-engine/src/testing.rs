//! Test doubles for the renderer, font and texture seams.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::coords::{Vec2, Viewport};
use crate::render::{
    BufferDesc, BufferId, Material, Material2DInfo, MaterialDesc, MaterialId, RenderError,
    Renderer, ResourceSetDesc, ResourceSetId, TextureDesc, TextureId,
};
use crate::text::{AtlasHandle, AtlasId, FontSource, GlyphInfo};
use crate::texture::TextureSource;

/// Draw-state calls, in the order they were issued.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetMaterial(MaterialId),
    SetViewport(Viewport),
    BindBuffers(Option<BufferId>, BufferId),
    SetResourceSets(Vec<ResourceSetId>),
    PushConstant(Material2DInfo),
    Draw(u32),
}

/// CPU-only [`Renderer`] that records what it was asked to do.
pub(crate) struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub default_material: Option<Rc<Material>>,
    pub prepared_materials: Vec<MaterialId>,
    pub fail_material_preparation: bool,
    pub fail_texture_creation: bool,
    pub created_buffers: usize,
    pub created_textures: usize,
    pub buffer_uploads: usize,
    pub draw_calls: usize,
    pub released_buffers: Vec<BufferId>,
    pub released_textures: Vec<TextureId>,
    pub released_sets: Vec<ResourceSetId>,
    default_set: ResourceSetId,
    index_buffer: BufferId,
    next_id: u32,
    next_material: u32,
}

impl RecordingRenderer {
    pub(crate) fn new() -> Self {
        let mut renderer = Self {
            calls: Vec::new(),
            default_material: None,
            prepared_materials: Vec::new(),
            fail_material_preparation: false,
            fail_texture_creation: false,
            created_buffers: 0,
            created_textures: 0,
            buffer_uploads: 0,
            draw_calls: 0,
            released_buffers: Vec::new(),
            released_textures: Vec::new(),
            released_sets: Vec::new(),
            default_set: ResourceSetId(0),
            index_buffer: BufferId(0),
            next_id: 1,
            next_material: 1,
        };

        let material = Rc::new(Material::new(MaterialId(0), MaterialDesc::default()));
        material.before_draw(&mut renderer);
        renderer.prepared_materials.clear();
        renderer.default_material = Some(material);
        renderer
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Renderer for RecordingRenderer {
    fn default_2d_material(&self) -> Option<Rc<Material>> {
        self.default_material.clone()
    }

    fn default_texture_set(&self) -> ResourceSetId {
        self.default_set
    }

    fn index_default_buffer(&self) -> BufferId {
        self.index_buffer
    }

    fn create_material(&mut self, desc: MaterialDesc) -> Rc<Material> {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        Rc::new(Material::new(id, desc))
    }

    fn prepare_material(&mut self, material: &Material) -> Result<(), RenderError> {
        if self.fail_material_preparation {
            return Err(RenderError::UnknownMaterial(material.id()));
        }
        self.prepared_materials.push(material.id());
        Ok(())
    }

    fn set_material(&mut self, material: &Material) {
        self.calls.push(Call::SetMaterial(material.id()));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push(Call::SetViewport(viewport));
    }

    fn bind_buffers(&mut self, vertex: Option<BufferId>, index: BufferId) {
        self.calls.push(Call::BindBuffers(vertex, index));
    }

    fn set_resource_sets(&mut self, sets: &[ResourceSetId]) {
        self.calls.push(Call::SetResourceSets(sets.to_vec()));
    }

    fn push_constant(&mut self, info: &Material2DInfo) {
        self.calls.push(Call::PushConstant(*info));
    }

    fn draw_index_instanced(&mut self, index_count: u32) {
        self.draw_calls += 1;
        self.calls.push(Call::Draw(index_count));
    }

    fn create_buffer(&mut self, _desc: BufferDesc) -> BufferId {
        self.created_buffers += 1;
        BufferId(self.next())
    }

    fn update_buffer(&mut self, buffer: BufferId, _offset: u64, _data: &[u8]) -> Result<(), RenderError> {
        if self.released_buffers.contains(&buffer) {
            return Err(RenderError::UnknownBuffer(buffer));
        }
        self.buffer_uploads += 1;
        Ok(())
    }

    fn create_texture(&mut self, desc: TextureDesc, pixels: &[u8]) -> Result<TextureId, RenderError> {
        if self.fail_texture_creation {
            return Err(RenderError::InvalidTextureSize { width: desc.width, height: desc.height });
        }
        if pixels.len() != desc.byte_len() {
            return Err(RenderError::PixelSizeMismatch { expected: desc.byte_len(), actual: pixels.len() });
        }
        self.created_textures += 1;
        Ok(TextureId(self.next()))
    }

    fn create_resource_set(&mut self, _desc: ResourceSetDesc) -> Result<ResourceSetId, RenderError> {
        Ok(ResourceSetId(self.next()))
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        self.released_buffers.push(buffer);
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.released_textures.push(texture);
    }

    fn release_resource_set(&mut self, set: ResourceSetId) {
        self.released_sets.push(set);
    }
}

// ── fonts ─────────────────────────────────────────────────────────────────

/// Font with hand-written metrics. Every glyph lives on atlas 0.
#[derive(Debug, Default)]
pub(crate) struct FakeFont {
    glyphs: HashMap<char, GlyphInfo>,
    atlases: HashMap<AtlasId, ResourceSetId>,
    binds: Cell<u32>,
}

impl FakeFont {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_glyph(mut self, c: char, advance: f32, bearing: Vec2, size: Vec2) -> Self {
        self.glyphs.insert(
            c,
            GlyphInfo { advance, bearing, size, region: Vec2::zero(), atlas: AtlasId(0) },
        );
        self
    }

    pub(crate) fn with_atlas(mut self, id: AtlasId, set: ResourceSetId) -> Self {
        self.atlases.insert(id, set);
        self
    }

    pub(crate) fn bind_count(&self) -> u32 {
        self.binds.get()
    }
}

impl FontSource for FakeFont {
    fn glyph(&self, c: char) -> GlyphInfo {
        self.glyphs.get(&c).copied().unwrap_or(GlyphInfo::missing())
    }

    fn atlas(&self, id: AtlasId) -> Option<AtlasHandle> {
        self.atlases.get(&id).map(|&set| AtlasHandle { id, set })
    }

    fn bind(&self, _renderer: &mut dyn Renderer) {
        self.binds.set(self.binds.get() + 1);
    }
}

// ── textures ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct FakeTexture {
    set: Option<ResourceSetId>,
    before_draws: Cell<u32>,
}

impl FakeTexture {
    pub(crate) fn unrealized() -> Self {
        Self::default()
    }

    pub(crate) fn realized(set: ResourceSetId) -> Self {
        Self { set: Some(set), before_draws: Cell::new(0) }
    }

    pub(crate) fn before_draw_count(&self) -> u32 {
        self.before_draws.get()
    }
}

impl TextureSource for FakeTexture {
    fn before_draw(&self, _renderer: &mut dyn Renderer) {
        self.before_draws.set(self.before_draws.get() + 1);
    }

    fn resource_set(&self) -> Option<ResourceSetId> {
        self.set
    }
}
