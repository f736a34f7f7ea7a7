use glam::{Mat4, Vec3};

/// Camera construction parameters.
///
/// Defaults frame the origin from `(0, 0, 5)` looking down -Z with +Y up,
/// an orthographic volume sized as if by a 60° vertical field of view at the
/// eye distance.
#[derive(Debug, Clone)]
pub struct CameraDesc {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians) the ortho volume emulates.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 60f32.to_radians(),
            znear: 0.01,
            zfar: 10.0,
        }
    }
}

/// Fixed-target orthographic camera.
///
/// The ortho half-height is `distance(eye, center) * tan(fovy / 2)`, so the
/// framing matches what a perspective camera with the same fovy would show at
/// the target plane; the half-width follows the viewport aspect ratio.
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    desc: CameraDesc,
    viewport: (f32, f32),
    view: Mat4,
    proj: Mat4,
}

impl OrthoCamera {
    pub fn new(desc: CameraDesc, viewport_width: f32, viewport_height: f32) -> Self {
        let view = Mat4::look_at_rh(desc.eye, desc.center, desc.up);
        let mut camera = Self {
            desc,
            viewport: (0.0, 0.0),
            view,
            proj: Mat4::IDENTITY,
        };
        camera.set_viewport(viewport_width, viewport_height);
        camera
    }

    /// Updates the viewport and reprojects if the dimensions changed.
    ///
    /// Returns `true` iff the projection was recomputed. Degenerate viewports
    /// (zero or negative extent) are ignored, keeping the last valid
    /// projection.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        if self.viewport == (width, height) {
            return false;
        }

        self.viewport = (width, height);

        let distance = (self.desc.eye - self.desc.center).length();
        let half_h = distance * (self.desc.fovy * 0.5).tan();
        let half_w = half_h * (width / height);
        self.proj = Mat4::orthographic_rh(
            -half_w,
            half_w,
            -half_h,
            half_h,
            self.desc.znear,
            self.desc.zfar,
        );
        true
    }

    #[inline]
    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }

    /// Column-major 4x4 for the GPU uniform.
    #[inline]
    pub fn view_proj_array(&self) -> [[f32; 4]; 4] {
        self.view_proj().to_cols_array_2d()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn camera() -> OrthoCamera {
        OrthoCamera::new(CameraDesc::default(), 1024.0, 1024.0)
    }

    // ── reprojection gating ───────────────────────────────────────────────

    #[test]
    fn same_viewport_does_not_reproject() {
        let mut cam = camera();
        assert!(!cam.set_viewport(1024.0, 1024.0));
    }

    #[test]
    fn new_viewport_reprojects() {
        let mut cam = camera();
        let before = cam.view_proj();
        assert!(cam.set_viewport(2048.0, 1024.0));
        assert_ne!(cam.view_proj(), before);
    }

    #[test]
    fn degenerate_viewport_is_ignored() {
        let mut cam = camera();
        let before = cam.view_proj();
        assert!(!cam.set_viewport(0.0, 768.0));
        assert_eq!(cam.view_proj(), before);
        assert_eq!(cam.viewport(), (1024.0, 1024.0));
    }

    // ── projection behavior ───────────────────────────────────────────────

    #[test]
    fn target_maps_to_ndc_center() {
        let cam = camera();
        let clip = cam.view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
    }

    #[test]
    fn wider_viewport_shrinks_x() {
        // Same world point, twice the aspect: half the NDC x magnitude.
        let square = camera();
        let mut wide = camera();
        wide.set_viewport(2048.0, 1024.0);

        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let sx = (square.view_proj() * p).x;
        let wx = (wide.view_proj() * p).x;
        assert!((wx - sx * 0.5).abs() < 1e-6);
    }

    #[test]
    fn ortho_ignores_depth_for_scale() {
        // Orthographic: x/y are unaffected by distance from the eye.
        let cam = camera();
        let near = cam.view_proj() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        let far = cam.view_proj() * Vec4::new(1.0, 1.0, -2.0, 1.0);
        assert!((near.x - far.x).abs() < 1e-6);
        assert!((near.y - far.y).abs() < 1e-6);
    }
}
