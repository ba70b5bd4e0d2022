use cgmath::{ortho, perspective, Deg, Matrix4, Point3, Vector3};

pub const DEMO_FOV_DEGREES: f32 = 45.0;
pub const DEMO_NEAR: f32 = 1.0;
pub const DEMO_FAR: f32 = 100.0;

/// Viewport extents with a zero height bumped to one, so a minimized window
/// never yields a division by zero.
pub fn viewport(width: u32, height: u32) -> (u32, u32) {
    (width, height.max(1))
}

pub fn benchmark_projection() -> Matrix4<f32> {
    ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
}

/// Camera at (0, -3, 0) looking at the origin with +Z up.
pub fn demo_view_projection(width: u32, height: u32) -> Matrix4<f32> {
    let (width, height) = viewport(width, height);
    let aspect = width as f32 / height as f32;
    let projection = perspective(Deg(DEMO_FOV_DEGREES), aspect, DEMO_NEAR, DEMO_FAR);
    let view = Matrix4::look_at_rh(
        Point3::new(0.0, -3.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::unit_z(),
    );
    projection * view
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn clip(m: Matrix4<f32>, p: [f32; 3]) -> Vector4<f32> {
        m * Vector4::new(p[0], p[1], p[2], 1.0)
    }

    #[test]
    fn zero_height_is_clamped() {
        assert_eq!(viewport(640, 0), (640, 1));
        assert_eq!(viewport(640, 480), (640, 480));
        let m = demo_view_projection(640, 0);
        assert!(m.x.x.is_finite());
    }

    #[test]
    fn benchmark_projection_only_flips_depth() {
        let expected = Matrix4::from_nonuniform_scale(1.0, 1.0, -1.0);
        assert_eq!(benchmark_projection(), expected);
        assert_ne!(benchmark_projection(), Matrix4::identity());
    }

    #[test]
    fn origin_lands_in_the_middle_of_the_demo_view() {
        let c = clip(demo_view_projection(512, 512), [0.0, 0.0, 0.0]);
        let ndc = c / c.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn plus_z_is_up_on_screen() {
        let m = demo_view_projection(512, 512);
        let top = clip(m, [0.0, 0.0, 1.0]);
        let right = clip(m, [1.0, 0.0, 0.0]);
        assert!(top.y / top.w > 0.0);
        assert!(right.x / right.w > 0.0);
    }

    #[test]
    fn unit_sphere_fits_the_demo_view() {
        let m = demo_view_projection(512, 512);
        for p in [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, -1.0]] {
            let c = clip(m, p);
            assert!((c.x / c.w).abs() < 1.0);
            assert!((c.y / c.w).abs() < 1.0);
        }
    }
}
