//! wgpu implementation of [`Renderer`].
//!
//! Resources live in slot vectors addressed by the opaque ids handed out to
//! callers. Draw state is recorded during the tree walk and replayed into a
//! single render pass by [`WgpuRenderer::flush`]. Push constants are emulated
//! as one `Material2DInfo` instance per draw.

mod common;
mod pipeline;

use std::collections::HashMap;
use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::render::{
    BlendMode, BufferDesc, BufferId, BufferUsage, Material, Material2DInfo, MaterialDesc,
    MaterialId, RenderCtx, RenderError, RenderTarget, Renderer, ResourceSetDesc, ResourceSetId,
    TextureDesc, TextureFormat, TextureId,
};

use common::{QUAD_INDICES, QUAD_VERTICES, aligned_size};
use pipeline::Layouts;

// ── slots ─────────────────────────────────────────────────────────────────

const INDEX_BITS: u32 = 24;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slab. Released indices are reused; the id handed out packs
/// the slot's generation above the index so a stale id never resolves to
/// the slot's next occupant.
struct Slots<T> {
    entries: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), free: Vec::new() }
    }
}

impl<T> Slots<T> {
    fn insert(&mut self, value: T) -> u32 {
        let index = match self.free.pop() {
            Some(index) => {
                self.entries[index as usize].value = Some(value);
                index
            }
            None => {
                self.entries.push(Slot { generation: 0, value: Some(value) });
                (self.entries.len() - 1) as u32
            }
        };
        let generation = self.entries[index as usize].generation;
        (generation << INDEX_BITS) | index
    }

    fn slot(&self, id: u32) -> Option<&Slot<T>> {
        self.entries
            .get((id & INDEX_MASK) as usize)
            .filter(|slot| slot.generation == id >> INDEX_BITS)
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.slot(id).and_then(|slot| slot.value.as_ref())
    }

    fn remove(&mut self, id: u32) -> Option<T> {
        self.slot(id)?;
        let index = id & INDEX_MASK;
        let slot = &mut self.entries[index as usize];
        let value = slot.value.take()?;
        // Generations wrap within the bits left above the index.
        slot.generation = (slot.generation + 1) & (u32::MAX >> INDEX_BITS);
        self.free.push(index);
        Some(value)
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.entries.len()
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct PreparedMaterial {
    blend: BlendMode,
    label: String,
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
}

#[derive(Debug, Clone)]
enum Recorded {
    Material(MaterialId),
    Viewport(Viewport),
    Buffers { vertex: Option<BufferId>, index: BufferId },
    Sets(Vec<ResourceSetId>),
    Draw { index_count: u32, instance: u32 },
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Immediate-mode canvas renderer over wgpu.
///
/// Usage per frame: [`begin_frame`](Self::begin_frame), run the scene tree
/// walk against `&mut dyn Renderer`, then [`flush`](Self::flush) into the
/// frame's render target.
pub struct WgpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    frame_viewport: Viewport,
    scale_factor: f32,

    layouts: Layouts,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    sampler: wgpu::Sampler,

    buffers: Slots<wgpu::Buffer>,
    textures: Slots<GpuTexture>,
    sets: Slots<wgpu::BindGroup>,
    materials: HashMap<MaterialId, PreparedMaterial>,
    next_material: u32,

    default_material: Rc<Material>,
    default_texture_set: ResourceSetId,
    quad_vbo: wgpu::Buffer,
    quad_ibo: BufferId,

    commands: Vec<Recorded>,
    instances: Vec<Material2DInfo>,
    pending_instance: Option<u32>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl WgpuRenderer {
    /// Creates the renderer and its default resources (white texture set,
    /// quad buffers, prepared default material).
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, RenderError> {
        let layouts = Layouts::new(device);
        let pipeline_layout = layouts.pipeline_layout(device);
        let shader = pipeline::canvas_shader(device);
        let sampler = pipeline::linear_sampler(device);

        let mut buffers = Slots::default();
        let mut textures = Slots::default();
        let mut sets = Slots::default();

        let white = TextureDesc {
            label: "striked default white texture",
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8,
        };
        let white = upload_texture(device, queue, &white, &[255, 255, 255, 255])?;
        let white_set = texture_bind_group(device, &layouts.texture, &white.view, &sampler);
        textures.insert(white);
        let default_texture_set = ResourceSetId(sets.insert(white_set));

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("striked quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = BufferId(buffers.insert(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("striked quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            },
        )));

        let default_material = Rc::new(Material::new(
            MaterialId(0),
            MaterialDesc {
                label: "striked default canvas material".to_string(),
                blend: BlendMode::PremultipliedAlpha,
            },
        ));

        let mut renderer = Self {
            device: device.clone(),
            queue: queue.clone(),
            surface_format,
            frame_viewport: Viewport::new(1.0, 1.0),
            scale_factor: 1.0,
            layouts,
            pipeline_layout,
            shader,
            sampler,
            buffers,
            textures,
            sets,
            materials: HashMap::new(),
            next_material: 1,
            default_material: default_material.clone(),
            default_texture_set,
            quad_vbo,
            quad_ibo,
            commands: Vec::new(),
            instances: Vec::new(),
            pending_instance: None,
            instance_vbo: None,
            instance_capacity: 0,
        };

        default_material.before_draw(&mut renderer);
        Ok(renderer)
    }

    /// Starts recording a frame. Rebuilds pipelines if the surface format changed.
    pub fn begin_frame(&mut self, ctx: &RenderCtx<'_>) {
        self.frame_viewport = ctx.viewport;
        self.scale_factor = ctx.scale_factor.max(0.01);
        self.commands.clear();
        self.instances.clear();
        self.pending_instance = None;

        if ctx.surface_format != self.surface_format {
            log::debug!(
                "surface format changed {:?} -> {:?}; rebuilding pipelines",
                self.surface_format,
                ctx.surface_format
            );
            self.surface_format = ctx.surface_format;
            for prepared in self.materials.values_mut() {
                prepared.pipeline = pipeline::canvas_pipeline(
                    &self.device,
                    &self.pipeline_layout,
                    &self.shader,
                    self.surface_format,
                    prepared.blend,
                    &prepared.label,
                );
                prepared.format = self.surface_format;
            }
        }
    }

    /// Number of draw calls recorded since [`begin_frame`](Self::begin_frame).
    pub fn recorded_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Recorded::Draw { .. }))
            .count()
    }

    /// Replays the recorded frame into `target` and resets the recording.
    pub fn flush(&mut self, target: &mut RenderTarget<'_>) {
        if self.recorded_draws() == 0 {
            self.commands.clear();
            self.instances.clear();
            return;
        }

        // Mutating methods must happen before borrowing slots immutably.
        self.ensure_instance_capacity(self.instances.len());
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        self.queue
            .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("striked canvas pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
            rpass.set_vertex_buffer(1, instance_vbo.slice(..));

            let mut has_pipeline = false;
            let mut has_index = false;
            let mut sets_bound = false;

            for cmd in &self.commands {
                match cmd {
                    Recorded::Material(id) => {
                        has_pipeline = match self.materials.get(id) {
                            Some(prepared) if prepared.format == self.surface_format => {
                                rpass.set_pipeline(&prepared.pipeline);
                                true
                            }
                            _ => false,
                        };
                    }
                    Recorded::Viewport(v) => {
                        let w = v.width.min(self.frame_viewport.width).max(1.0);
                        let h = v.height.min(self.frame_viewport.height).max(1.0);
                        rpass.set_viewport(
                            0.0,
                            0.0,
                            w * self.scale_factor,
                            h * self.scale_factor,
                            0.0,
                            1.0,
                        );
                    }
                    Recorded::Buffers { vertex, index } => {
                        let vertex = vertex.and_then(|id| self.buffers.get(id.0));
                        rpass.set_vertex_buffer(0, vertex.unwrap_or(&self.quad_vbo).slice(..));
                        has_index = match self.buffers.get(index.0) {
                            Some(ibo) => {
                                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                                true
                            }
                            None => false,
                        };
                    }
                    Recorded::Sets(list) => {
                        sets_bound = true;
                        for (slot, id) in list.iter().enumerate() {
                            match self.sets.get(id.0) {
                                Some(group) => rpass.set_bind_group(slot as u32, group, &[]),
                                None => sets_bound = false,
                            }
                        }
                    }
                    Recorded::Draw { index_count, instance } => {
                        if has_pipeline && has_index && sets_bound {
                            rpass.draw_indexed(0..*index_count, 0, *instance..*instance + 1);
                        }
                    }
                }
            }
        }

        self.commands.clear();
        self.instances.clear();
    }

    fn ensure_instance_capacity(&mut self, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<Material2DInfo>()) as u64;
        self.instance_vbo = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("striked instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

impl Renderer for WgpuRenderer {
    fn default_2d_material(&self) -> Option<Rc<Material>> {
        Some(self.default_material.clone())
    }

    fn default_texture_set(&self) -> ResourceSetId {
        self.default_texture_set
    }

    fn index_default_buffer(&self) -> BufferId {
        self.quad_ibo
    }

    fn create_material(&mut self, desc: MaterialDesc) -> Rc<Material> {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        Rc::new(Material::new(id, desc))
    }

    fn prepare_material(&mut self, material: &Material) -> Result<(), RenderError> {
        let pipeline = pipeline::canvas_pipeline(
            &self.device,
            &self.pipeline_layout,
            &self.shader,
            self.surface_format,
            material.blend(),
            material.label(),
        );
        self.materials.insert(
            material.id(),
            PreparedMaterial {
                blend: material.blend(),
                label: material.label().to_string(),
                format: self.surface_format,
                pipeline,
            },
        );
        Ok(())
    }

    fn set_material(&mut self, material: &Material) {
        self.commands.push(Recorded::Material(material.id()));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(Recorded::Viewport(viewport));
    }

    fn bind_buffers(&mut self, vertex: Option<BufferId>, index: BufferId) {
        self.commands.push(Recorded::Buffers { vertex, index });
    }

    fn set_resource_sets(&mut self, sets: &[ResourceSetId]) {
        self.commands.push(Recorded::Sets(sets.to_vec()));
    }

    fn push_constant(&mut self, info: &Material2DInfo) {
        self.instances.push(*info);
        self.pending_instance = Some((self.instances.len() - 1) as u32);
    }

    fn draw_index_instanced(&mut self, index_count: u32) {
        let instance = match self.pending_instance.take() {
            Some(i) => i,
            None => {
                self.instances.push(Material2DInfo::default());
                (self.instances.len() - 1) as u32
            }
        };
        self.commands.push(Recorded::Draw { index_count, instance });
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> BufferId {
        let usage = match desc.usage {
            BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM,
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        } | wgpu::BufferUsages::COPY_DST;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: aligned_size(desc.size),
            usage,
            mapped_at_creation: false,
        });
        log::debug!("created buffer '{}' ({} bytes)", desc.label, desc.size);
        BufferId(self.buffers.insert(buffer))
    }

    fn update_buffer(
        &mut self,
        buffer: BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        let target = self.buffers.get(buffer.0).ok_or(RenderError::UnknownBuffer(buffer))?;
        self.queue.write_buffer(target, offset, data);
        Ok(())
    }

    fn create_texture(
        &mut self,
        desc: TextureDesc,
        pixels: &[u8],
    ) -> Result<TextureId, RenderError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if desc.width > max || desc.height > max {
            return Err(RenderError::InvalidTextureSize {
                width: desc.width,
                height: desc.height,
            });
        }
        let texture = upload_texture(&self.device, &self.queue, &desc, pixels)?;
        log::debug!("created texture '{}' {}x{}", desc.label, desc.width, desc.height);
        Ok(TextureId(self.textures.insert(texture)))
    }

    fn create_resource_set(&mut self, desc: ResourceSetDesc) -> Result<ResourceSetId, RenderError> {
        let group = match desc {
            ResourceSetDesc::Uniform { buffer } => {
                let target =
                    self.buffers.get(buffer.0).ok_or(RenderError::UnknownBuffer(buffer))?;
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("striked uniform set"),
                    layout: &self.layouts.uniform,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: target.as_entire_binding(),
                    }],
                })
            }
            ResourceSetDesc::Texture { texture } => {
                let target = self
                    .textures
                    .get(texture.0)
                    .ok_or(RenderError::UnknownTexture(texture))?;
                texture_bind_group(&self.device, &self.layouts.texture, &target.view, &self.sampler)
            }
        };
        Ok(ResourceSetId(self.sets.insert(group)))
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        if buffer == self.quad_ibo {
            return;
        }
        if let Some(b) = self.buffers.remove(buffer.0) {
            b.destroy();
        }
    }

    fn release_texture(&mut self, texture: TextureId) {
        if let Some(t) = self.textures.remove(texture.0) {
            t.texture.destroy();
        }
    }

    fn release_resource_set(&mut self, set: ResourceSetId) {
        if set == self.default_texture_set {
            return;
        }
        self.sets.remove(set.0);
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    desc: &TextureDesc,
    pixels: &[u8],
) -> Result<GpuTexture, RenderError> {
    if desc.width == 0 || desc.height == 0 {
        return Err(RenderError::InvalidTextureSize {
            width: desc.width,
            height: desc.height,
        });
    }
    if pixels.len() != desc.byte_len() {
        return Err(RenderError::PixelSizeMismatch {
            expected: desc.byte_len(),
            actual: pixels.len(),
        });
    }

    let format = match desc.format {
        TextureFormat::R8 => wgpu::TextureFormat::R8Unorm,
        TextureFormat::Rgba8 => wgpu::TextureFormat::Rgba8UnormSrgb,
    };
    let size = wgpu::Extent3d {
        width: desc.width,
        height: desc.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(desc.label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(desc.width * desc.format.bytes_per_pixel()),
            rows_per_image: Some(desc.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Ok(GpuTexture { texture, view })
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("striked texture set"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_slot_is_reused_under_a_new_id() {
        let mut slots = Slots::default();
        let a = slots.insert("a");
        let b = slots.insert("b");
        assert_eq!(slots.remove(a), Some("a"));
        assert!(slots.get(a).is_none());
        assert_eq!(slots.get(b), Some(&"b"));

        let c = slots.insert("c");
        assert_ne!(c, a);
        assert_eq!(c & INDEX_MASK, a & INDEX_MASK);
        assert!(slots.get(a).is_none());
        assert_eq!(slots.get(c), Some(&"c"));
        assert_eq!(slots.capacity(), 2);
    }

    #[test]
    fn stale_id_cannot_release_the_new_occupant() {
        let mut slots = Slots::default();
        let a = slots.insert(1);
        slots.remove(a);
        let b = slots.insert(2);

        assert_eq!(slots.remove(a), None);
        assert_eq!(slots.get(b), Some(&2));
    }

    #[test]
    fn release_and_realize_cycles_do_not_grow() {
        let mut slots = Slots::default();
        for i in 0..100 {
            let id = slots.insert(i);
            assert_eq!(slots.remove(id), Some(i));
        }
        assert_eq!(slots.capacity(), 1);
    }
}
