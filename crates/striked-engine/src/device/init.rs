use super::GraphicsBackend;

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Restricts the instance to one backend. `None` tries all of them.
    ///
    /// Set it to [`GraphicsBackend::platform_default`] to pin the native API.
    pub preferred_backend: Option<GraphicsBackend>,

    /// Enables API validation and debug labels.
    pub debug: bool,

    /// Wait for vertical blank (`Fifo`). Without it the lowest-latency
    /// supported mode is picked.
    pub vsync: bool,

    /// Prefer an sRGB surface format when available.
    ///
    /// The canvas shader writes linear color and relies on sRGB encode.
    pub prefer_srgb: bool,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            preferred_backend: None,
            debug: cfg!(debug_assertions),
            vsync: true,
            prefer_srgb: true,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    pub(crate) fn instance_flags(&self) -> wgpu::InstanceFlags {
        if self.debug {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::empty()
        }
    }
}
