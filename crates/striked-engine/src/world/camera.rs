use bytemuck::{Pod, Zeroable};

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Camera uniform consumed by 3D materials (slot 0).
///
/// Matrices are column-major. Layout is 144 bytes, std140 compatible.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraInfo {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub far: f32,
    pub near: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub _pad: f32,
}

impl Default for CameraInfo {
    fn default() -> Self {
        Self::perspective(IDENTITY, std::f32::consts::FRAC_PI_3, 1.0, 0.1, 1000.0)
    }
}

impl CameraInfo {
    /// Right-handed perspective with a `0..1` depth range.
    pub fn perspective(view: [[f32; 4]; 4], fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov * 0.5).tan();
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        let depth = near - far;

        let projection = [
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, far / depth, -1.0],
            [0.0, 0.0, near * far / depth, 0.0],
        ];

        Self { view, projection, far, near, fov, _pad: 0.0 }
    }

    /// Same view, projection rebuilt for a new aspect ratio.
    pub fn with_aspect(self, aspect: f32) -> Self {
        Self::perspective(self.view, self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_144_bytes() {
        assert_eq!(std::mem::size_of::<CameraInfo>(), 144);
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let cam = CameraInfo::perspective(IDENTITY, 1.0, 1.0, 0.5, 10.0);
        let p = cam.projection;
        // Point on the near plane at z = -near.
        let z = -0.5;
        let clip_z = p[2][2] * z + p[3][2];
        let clip_w = p[2][3] * z;
        assert!((clip_z / clip_w).abs() < 1e-6);
    }

    #[test]
    fn aspect_change_is_structural_change() {
        let a = CameraInfo::default();
        assert_eq!(a, a.with_aspect(1.0));
        assert_ne!(a, a.with_aspect(2.0));
    }
}
