//! Shared GPU types for the canvas pipeline.

use bytemuck::{Pod, Zeroable};

use crate::render::{BlendMode, Material2DInfo};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    let dst_factor = match mode {
        BlendMode::PremultipliedAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendMode::Additive => wgpu::BlendFactor::One,
    };
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── per-draw instance ─────────────────────────────────────────────────────

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    1 => Float32x2, // position
    2 => Float32x2, // size
    3 => Float32x4, // color
    4 => Float32x4, // modulate
    5 => Float32x4, // font_region
    6 => Float32x4  // font_range, is_font, use_texture, pad
];

/// `Material2DInfo` is uploaded as one instance per draw call.
pub(super) fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Material2DInfo>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    }
}

/// Rounds a buffer size up to wgpu's copy alignment.
#[inline]
pub(super) fn aligned_size(size: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    size.max(align).div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_attributes_cover_material_info() {
        let last = INSTANCE_ATTRS[INSTANCE_ATTRS.len() - 1];
        assert_eq!(last.offset + 16, std::mem::size_of::<Material2DInfo>() as u64);
    }

    #[test]
    fn aligned_size_rounds_up() {
        assert_eq!(aligned_size(0), 4);
        assert_eq!(aligned_size(5), 8);
        assert_eq!(aligned_size(80), 80);
    }
}
