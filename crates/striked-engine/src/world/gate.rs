use bytemuck::Pod;

use crate::render::{
    BufferDesc, BufferId, BufferUsage, RenderError, Renderer, ResourceSetDesc, ResourceSetId,
};

/// GPU side of a gate, created on the first [`UniformGate::update`].
#[derive(Debug, Copy, Clone, PartialEq)]
struct GateResources {
    buffer: BufferId,
    set: ResourceSetId,
}

/// Uploads a uniform value only when it differs from the last uploaded one.
///
/// The backing buffer and its resource set are allocated lazily on first
/// use and live until [`dispose`](Self::dispose).
#[derive(Debug)]
pub struct UniformGate<T: Pod + PartialEq> {
    label: &'static str,
    last: Option<T>,
    resources: Option<GateResources>,
}

impl<T: Pod + PartialEq> UniformGate<T> {
    pub fn new(label: &'static str) -> Self {
        Self { label, last: None, resources: None }
    }

    /// Returns `Ok(true)` when `value` was uploaded this call.
    ///
    /// On failure the cached value is left untouched so the next call retries.
    pub fn update(&mut self, renderer: &mut dyn Renderer, value: &T) -> Result<bool, RenderError> {
        let resources = self.ensure_resources(renderer)?;

        if self.last.as_ref() == Some(value) {
            return Ok(false);
        }

        renderer.update_buffer(resources.buffer, 0, bytemuck::bytes_of(value))?;
        self.last = Some(*value);
        Ok(true)
    }

    /// Like [`update`](Self::update) but yields the set the uniform lives in.
    pub fn sync(&mut self, renderer: &mut dyn Renderer, value: &T) -> Result<ResourceSetId, RenderError> {
        self.update(renderer, value)?;
        Ok(self.ensure_resources(renderer)?.set)
    }

    /// The set binding the uniform buffer, once allocated.
    #[inline]
    pub fn resource_set(&self) -> Option<ResourceSetId> {
        self.resources.map(|r| r.set)
    }

    #[inline]
    pub fn last_uploaded(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Releases GPU resources. A later `update` allocates them again.
    pub fn dispose(&mut self, renderer: &mut dyn Renderer) {
        if let Some(res) = self.resources.take() {
            renderer.release_resource_set(res.set);
            renderer.release_buffer(res.buffer);
        }
        self.last = None;
    }

    fn ensure_resources(&mut self, renderer: &mut dyn Renderer) -> Result<GateResources, RenderError> {
        if let Some(res) = self.resources {
            return Ok(res);
        }

        let buffer = renderer.create_buffer(BufferDesc {
            label: self.label,
            size: std::mem::size_of::<T>() as u64,
            usage: BufferUsage::Uniform,
        });
        let set = match renderer.create_resource_set(ResourceSetDesc::Uniform { buffer }) {
            Ok(set) => set,
            Err(e) => {
                renderer.release_buffer(buffer);
                return Err(e);
            }
        };

        log::debug!("uniform gate '{}' allocated", self.label);
        let res = GateResources { buffer, set };
        self.resources = Some(res);
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;

    #[test]
    fn equal_values_upload_once() {
        let mut renderer = RecordingRenderer::new();
        let mut gate = UniformGate::<[f32; 4]>::new("test gate");

        assert_eq!(gate.update(&mut renderer, &[1.0, 2.0, 3.0, 4.0]), Ok(true));
        assert_eq!(gate.update(&mut renderer, &[1.0, 2.0, 3.0, 4.0]), Ok(false));

        assert_eq!(renderer.buffer_uploads, 1);
        assert_eq!(renderer.created_buffers, 1);
    }

    #[test]
    fn differing_values_upload_each_time() {
        let mut renderer = RecordingRenderer::new();
        let mut gate = UniformGate::<[f32; 2]>::new("test gate");

        for i in 0..3 {
            assert_eq!(gate.update(&mut renderer, &[i as f32, 0.0]), Ok(true));
        }

        assert_eq!(renderer.buffer_uploads, 3);
        assert_eq!(renderer.created_buffers, 1);
        assert_eq!(gate.last_uploaded(), Some(&[2.0, 0.0]));
    }

    #[test]
    fn resource_set_is_created_lazily() {
        let mut renderer = RecordingRenderer::new();
        let mut gate = UniformGate::<[f32; 2]>::new("test gate");
        assert!(gate.resource_set().is_none());

        gate.update(&mut renderer, &[0.0, 0.0]).unwrap();
        assert!(gate.resource_set().is_some());
    }

    #[test]
    fn dispose_releases_and_forgets() {
        let mut renderer = RecordingRenderer::new();
        let mut gate = UniformGate::<[f32; 2]>::new("test gate");
        gate.update(&mut renderer, &[0.0, 0.0]).unwrap();

        gate.dispose(&mut renderer);

        assert!(gate.resource_set().is_none());
        assert_eq!(renderer.released_buffers.len(), 1);
        assert_eq!(renderer.released_sets.len(), 1);
        assert_eq!(gate.update(&mut renderer, &[0.0, 0.0]), Ok(true));
    }
}
