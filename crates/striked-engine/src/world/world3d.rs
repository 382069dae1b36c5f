use crate::render::{RenderError, Renderer, ResourceSetId};

use super::{CameraInfo, UniformGate};

/// 3D world state: the active camera uniform.
#[derive(Debug)]
pub struct World3D {
    camera: UniformGate<CameraInfo>,
}

impl Default for World3D {
    fn default() -> Self {
        Self::new()
    }
}

impl World3D {
    pub fn new() -> Self {
        Self { camera: UniformGate::new("striked camera uniform") }
    }

    /// Uploads `camera` if it changed since the last frame.
    pub fn update(
        &mut self,
        renderer: &mut dyn Renderer,
        camera: &CameraInfo,
    ) -> Result<bool, RenderError> {
        self.camera.update(renderer, camera)
    }

    /// Camera set for 3D materials, once the first update succeeded.
    #[inline]
    pub fn resource_set(&self) -> Option<ResourceSetId> {
        self.camera.resource_set()
    }

    pub fn dispose(&mut self, renderer: &mut dyn Renderer) {
        self.camera.dispose(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;

    #[test]
    fn static_camera_uploads_once() {
        let mut renderer = RecordingRenderer::new();
        let mut world = World3D::new();
        let cam = CameraInfo::default();

        assert_eq!(world.update(&mut renderer, &cam), Ok(true));
        assert_eq!(world.update(&mut renderer, &cam), Ok(false));
        assert_eq!(renderer.buffer_uploads, 1);
    }

    #[test]
    fn moving_camera_uploads_every_frame() {
        let mut renderer = RecordingRenderer::new();
        let mut world = World3D::new();
        let mut cam = CameraInfo::default();

        for i in 0..4 {
            cam.view[3][0] = i as f32;
            world.update(&mut renderer, &cam).unwrap();
        }
        assert_eq!(renderer.buffer_uploads, 4);
    }
}
