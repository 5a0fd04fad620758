//! Rotation state and point rotation

use nalgebra::{Point3, Rotation3, Vector3};

/// Accumulated spin of the shape, one Euler angle per axis in radians.
///
/// Angles grow without bound; the trigonometry downstream does not care.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    /// Pose a freshly built viewer starts in, tilted so three faces show
    pub const INITIAL_POSE: RotationState = RotationState::new(0.45, 0.6, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Add per-axis angle increments
    pub fn advance(&mut self, dx: f32, dy: f32, dz: f32) {
        *self = RotationState::new(self.x + dx, self.y + dy, self.z + dz);
    }
}

pub fn rotate_x(p: &Point3<f32>, angle: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(p.x, p.y * cos - p.z * sin, p.y * sin + p.z * cos)
}

pub fn rotate_y(p: &Point3<f32>, angle: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(p.x * cos + p.z * sin, p.y, -p.x * sin + p.z * cos)
}

pub fn rotate_z(p: &Point3<f32>, angle: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z)
}

/// Rotate about X, then the result about Y, then that about Z.
///
/// The order is part of the contract: swapping axes changes how the shape
/// tumbles.
pub fn rotate(p: &Point3<f32>, rotation: &RotationState) -> Point3<f32> {
    let p = rotate_x(p, rotation.x);
    let p = rotate_y(&p, rotation.y);
    rotate_z(&p, rotation.z)
}

/// Transform builder for whole point sets
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state.
    ///
    /// Equivalent to [`rotate`]: the X rotation is applied first.
    pub fn rotation_matrix(rotation: &RotationState) -> Rotation3<f32> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z);

        rz * ry * rx
    }

    /// Rotate every point, then scale the result uniformly
    pub fn rotate_all(
        points: &[Point3<f32>],
        rotation: &RotationState,
        scale: f32,
    ) -> Vec<Point3<f32>> {
        let matrix = Self::rotation_matrix(rotation);
        points.iter().map(|p| matrix * (p * scale)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: &Point3<f32>, b: &Point3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_advance_accumulates_per_axis() {
        let mut state = RotationState::zero();
        state.advance(0.5, 0.25, -1.0);
        assert_eq!(state, RotationState::new(0.5, 0.25, -1.0));

        state.advance(0.25, 0.25, 0.5);
        assert_eq!(state, RotationState::new(0.75, 0.5, -0.5));

        state.advance(0.0, 0.0, 0.0);
        assert_eq!(state, RotationState::new(0.75, 0.5, -0.5));
        assert_ne!(RotationState::INITIAL_POSE, RotationState::zero());
    }

    #[test]
    fn test_identity_rotation() {
        let p = Point3::new(0.3, -1.2, 2.5);
        assert_eq!(rotate(&p, &RotationState::zero()), p);

        let matrix = Transform::rotation_matrix(&RotationState::zero());
        assert!(close(&(matrix * p), &p));
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let p = rotate(
            &Point3::new(1.0, 0.0, 0.0),
            &RotationState::new(0.0, FRAC_PI_2, 0.0),
        );
        assert!(close(&p, &Point3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_axis_order_matters() {
        let p = Point3::new(1.0, 0.0, 0.0);
        let xy = rotate(&p, &RotationState::new(FRAC_PI_2, FRAC_PI_2, 0.0));
        let yx = rotate_x(&rotate_y(&p, FRAC_PI_2), FRAC_PI_2);
        assert!(!close(&xy, &yx));
    }

    #[test]
    fn test_matrix_agrees_with_stepwise_rotation() {
        let rotation = RotationState::new(0.4, -1.1, 2.3);
        let matrix = Transform::rotation_matrix(&rotation);
        for p in [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-0.5, 0.7, 1.9),
        ] {
            assert!(close(&(matrix * p), &rotate(&p, &rotation)));
        }
    }

    #[test]
    fn test_rotate_all_scales() {
        let points = [Point3::new(1.0, 0.0, 0.0)];
        let out = Transform::rotate_all(&points, &RotationState::zero(), 2.0);
        assert!(close(&out[0], &Point3::new(2.0, 0.0, 0.0)));
    }
}
