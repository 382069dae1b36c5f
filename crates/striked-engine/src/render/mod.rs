//! Renderer seam and the wgpu backend.
//!
//! Everything above this module (canvas, text, textures, world gates) talks
//! to a `&mut dyn Renderer` and only ever holds opaque handles. The wgpu
//! backend records draw state during the tree walk and replays it into one
//! render pass per frame.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using the world-2D viewport uniform.

mod ctx;
mod error;
mod handles;
mod material;
mod renderer;
pub mod backend;

pub use backend::WgpuRenderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::RenderError;
pub use handles::{
    BufferDesc, BufferId, BufferUsage, MaterialId, ResourceSetDesc, ResourceSetId, TextureDesc,
    TextureFormat, TextureId,
};
pub use material::{BlendMode, Material, Material2DInfo, MaterialDesc};
pub use renderer::{QUAD_INDEX_COUNT, Renderer};
