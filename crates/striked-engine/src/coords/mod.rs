//! Geometry types shared by the canvas core, text layout and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The canvas shader converts to NDC using the world-2D viewport uniform.

mod rect;
mod vec2;
mod vec4;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use vec4::Vec4;
pub use viewport::Viewport;
