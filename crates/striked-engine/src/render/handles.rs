//! Opaque GPU resource handles and creation descriptors.
//!
//! Handles are plain ids into renderer-owned slabs. Copying a handle never
//! extends or shortens the lifetime of the resource behind it.

/// Identifies a GPU buffer owned by a [`Renderer`](super::Renderer).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub(crate) u32);

/// Identifies a GPU texture owned by a [`Renderer`](super::Renderer).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub(crate) u32);

/// Identifies a bound group of GPU resources (a wgpu bind group).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceSetId(pub(crate) u32);

/// Identifies a material (pipeline) known to a renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MaterialId(pub(crate) u32);

macro_rules! raw_id {
    ($($ty:ident),*) => {$(
        impl $ty {
            /// Wraps a renderer-defined slot index.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }
    )*};
}

raw_id!(BufferId, TextureId, ResourceSetId, MaterialId);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    Uniform,
    Vertex,
    Index,
}

#[derive(Debug, Clone)]
pub struct BufferDesc {
    pub label: &'static str,
    pub size: u64,
    pub usage: BufferUsage,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureFormat {
    /// Single channel, used by signed-distance glyph atlases.
    R8,
    /// Straight-alpha RGBA bitmaps.
    Rgba8,
}

impl TextureFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureDesc {
    /// Number of bytes a tightly packed upload for this texture must contain.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel() as usize
    }
}

/// What a resource set binds. The variant selects the bind-group layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResourceSetDesc {
    /// A uniform buffer (world / camera data), slot 0 layout.
    Uniform { buffer: BufferId },
    /// A sampled texture plus the renderer's linear sampler, slot 1/2 layout.
    Texture { texture: TextureId },
}
