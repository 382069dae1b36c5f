//! Color model shared between the canvas core and renderers.
//!
//! Canvas colors are straight-alpha linear RGBA floats. Premultiplication
//! happens in the canvas shader, which pairs with the premultiplied blend
//! state used by the default material.

pub mod color;

pub use color::Color;
