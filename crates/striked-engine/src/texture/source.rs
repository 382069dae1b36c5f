use std::fmt::Debug;

use crate::render::{Renderer, ResourceSetId};

/// Query interface of a texture, as consumed by canvases.
pub trait TextureSource: Debug {
    /// Gives the texture a chance to upload itself. Called every frame while
    /// a canvas references it.
    fn before_draw(&self, renderer: &mut dyn Renderer);

    /// The GPU set sampling this texture, or `None` while unrealized.
    fn resource_set(&self) -> Option<ResourceSetId>;
}
