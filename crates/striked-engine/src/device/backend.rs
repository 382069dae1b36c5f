/// Graphics API a device is created on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GraphicsBackend {
    Vulkan,
    Metal,
    Direct3D12,
    OpenGl,
    BrowserWebGpu,
}

impl GraphicsBackend {
    /// The backend each platform is expected to run best on.
    pub const fn platform_default() -> Self {
        if cfg!(target_arch = "wasm32") {
            GraphicsBackend::BrowserWebGpu
        } else if cfg!(windows) {
            GraphicsBackend::Direct3D12
        } else if cfg!(any(target_os = "macos", target_os = "ios")) {
            GraphicsBackend::Metal
        } else {
            GraphicsBackend::Vulkan
        }
    }

    /// Whether this backend can exist on the current platform at all.
    pub const fn is_supported_on_platform(self) -> bool {
        match self {
            GraphicsBackend::Vulkan => !cfg!(target_arch = "wasm32"),
            GraphicsBackend::Metal => cfg!(any(target_os = "macos", target_os = "ios")),
            GraphicsBackend::Direct3D12 => cfg!(windows),
            GraphicsBackend::OpenGl => true,
            GraphicsBackend::BrowserWebGpu => cfg!(target_arch = "wasm32"),
        }
    }

    pub fn to_backends(self) -> wgpu::Backends {
        match self {
            GraphicsBackend::Vulkan => wgpu::Backends::VULKAN,
            GraphicsBackend::Metal => wgpu::Backends::METAL,
            GraphicsBackend::Direct3D12 => wgpu::Backends::DX12,
            GraphicsBackend::OpenGl => wgpu::Backends::GL,
            GraphicsBackend::BrowserWebGpu => wgpu::Backends::BROWSER_WEBGPU,
        }
    }
}

/// Backends to create the instance with. `None` lets wgpu try every backend.
pub(crate) fn backends_for(preferred: Option<GraphicsBackend>) -> wgpu::Backends {
    preferred.map_or(wgpu::Backends::all(), GraphicsBackend::to_backends)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_default_is_supported() {
        assert!(GraphicsBackend::platform_default().is_supported_on_platform());
    }

    #[test]
    fn opengl_is_always_available() {
        assert!(GraphicsBackend::OpenGl.is_supported_on_platform());
    }

    #[test]
    fn backend_maps_to_single_flag() {
        assert_eq!(GraphicsBackend::Vulkan.to_backends(), wgpu::Backends::VULKAN);
        assert_eq!(GraphicsBackend::Direct3D12.to_backends(), wgpu::Backends::DX12);
        assert_eq!(backends_for(None), wgpu::Backends::all());
        assert_eq!(backends_for(Some(GraphicsBackend::Metal)), wgpu::Backends::METAL);
    }
}
