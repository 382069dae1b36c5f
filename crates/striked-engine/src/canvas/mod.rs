//! 2D canvas core: draw items, batching, binding resolution and the
//! dirty-tracked rebuild pipeline.
//!
//! Per frame, the scene walk calls [`Canvas::before_draw`] (rebuild when
//! dirty, pre-bind fonts/textures) and then [`Canvas::on_draw_2d`] (one
//! instanced quad draw per item, in insertion order).

mod batch;
mod binding;
#[allow(clippy::module_inception)]
mod canvas;
mod item;
mod painter;

pub use batch::Batch;
pub use binding::{BindingDefaults, resolve_binding_set};
pub use canvas::{Canvas, CanvasContent, CanvasState, DrawStats, FnContent};
pub use item::{DrawItem, RectItem};
pub use painter::CanvasPainter;
