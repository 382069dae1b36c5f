//! Scene hooks and the stage that drives them each frame.

mod node;
mod stage;

pub use node::{Drawable2D, Drawable3D};
pub use stage::{NodeIndex, Stage};
