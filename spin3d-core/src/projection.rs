//! Perspective projection to screen space

use nalgebra::Point3;

/// Size of the raster surface in device pixels (or cells)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// A projected point.
///
/// `depth` is the perspective factor, not a z-buffer value: it grows as
/// the source point's z shrinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Project a point with a simple perspective divide.
///
/// There is no near-plane clipping. As `fov + point.z` approaches zero the
/// depth factor diverges.
pub fn project(point: &Point3<f32>, zoom: f32, fov: f32, width: f32, height: f32) -> Projected {
    let depth = fov / (fov + point.z);
    Projected {
        x: point.x * depth * zoom + width / 2.0,
        y: point.y * depth * zoom + height / 2.0,
        depth,
    }
}

/// Camera configuration for one frame
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov: f32,
    /// Pixels per world unit at depth 1
    pub zoom: f32,
    pub viewport: Viewport,
}

impl Camera {
    pub fn new(fov: f32, zoom: f32, viewport: Viewport) -> Self {
        Self {
            fov,
            zoom,
            viewport,
        }
    }

    /// Project a 3D point to 2D screen space
    pub fn project(&self, point: &Point3<f32>) -> Projected {
        project(
            point,
            self.zoom,
            self.fov,
            self.viewport.width,
            self.viewport.height,
        )
    }

    pub fn project_all(&self, points: &[Point3<f32>]) -> Vec<Projected> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_center() {
        for fov in [1.0, 4.0, 600.0] {
            let p = project(&Point3::origin(), 1.0, fov, 800.0, 600.0);
            assert_eq!((p.x, p.y), (400.0, 300.0));
            assert_eq!(p.depth, 1.0);
        }
    }

    #[test]
    fn test_nearer_points_have_larger_depth() {
        let near = project(&Point3::new(1.0, 1.0, -1.0), 1.0, 4.0, 0.0, 0.0);
        let far = project(&Point3::new(1.0, 1.0, 1.0), 1.0, 4.0, 0.0, 0.0);
        assert!(near.depth > 1.0 && far.depth < 1.0);
        assert!(near.x > far.x);
    }

    #[test]
    fn test_zoom_scales_offset_from_center() {
        let camera = Camera::new(4.0, 100.0, Viewport::new(200.0, 100.0));
        let p = camera.project(&Point3::new(0.5, -0.25, 0.0));
        assert!((p.x - 150.0).abs() < 1e-4);
        assert!((p.y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_depth_diverges_at_camera_plane() {
        let p = project(&Point3::new(1.0, 0.0, -4.0), 1.0, 4.0, 0.0, 0.0);
        assert!(!p.depth.is_finite());
    }
}
