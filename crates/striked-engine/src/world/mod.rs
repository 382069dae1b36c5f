//! World uniforms shared by every drawable in a stage.
//!
//! Both worlds sit on [`UniformGate`], which only re-uploads when the value
//! actually changed between frames.

mod camera;
mod gate;
mod world2d;
mod world3d;

pub use camera::CameraInfo;
pub use gate::UniformGate;
pub use world2d::{View2D, World2D};
pub use world3d::World3D;
