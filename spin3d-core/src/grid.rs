//! Floor grid drawn behind the shape

use nalgebra::Point3;

use crate::color::Hsla;
use crate::draw::{DrawList, Point2, Stroke};
use crate::projection::Camera;
use crate::transform::{rotate_x, rotate_y};

/// Fixed pitch applied to the floor so it reads as a plane, not a line
pub const GRID_TILT: f32 = 0.35;
const GRID_HALF_EXTENT: f32 = 1.8;
const GRID_LINES: usize = 11;
/// Height of the floor plane. Screen y grows downward.
const GRID_FLOOR_Y: f32 = 1.6;

/// Line segments of the floor plane, before rotation
pub fn floor_lines() -> Vec<(Point3<f32>, Point3<f32>)> {
    let step = 2.0 * GRID_HALF_EXTENT / (GRID_LINES - 1) as f32;
    let mut lines = Vec::with_capacity(GRID_LINES * 2);
    for i in 0..GRID_LINES {
        let t = -GRID_HALF_EXTENT + i as f32 * step;
        lines.push((
            Point3::new(t, GRID_FLOOR_Y, -GRID_HALF_EXTENT),
            Point3::new(t, GRID_FLOOR_Y, GRID_HALF_EXTENT),
        ));
        lines.push((
            Point3::new(-GRID_HALF_EXTENT, GRID_FLOOR_Y, t),
            Point3::new(GRID_HALF_EXTENT, GRID_FLOOR_Y, t),
        ));
    }
    lines
}

fn place(p: &Point3<f32>, yaw: f32) -> Point3<f32> {
    rotate_x(&rotate_y(p, yaw), GRID_TILT)
}

/// Record the grid. It turns with the shape's yaw, then tilts toward the
/// viewer, and ignores the shape's size.
pub fn render_grid(
    list: &mut DrawList,
    lines: &[(Point3<f32>, Point3<f32>)],
    yaw: f32,
    camera: &Camera,
    hue: f32,
) {
    let stroke = Stroke::new(Hsla::new(hue, 40.0, 55.0, 0.12), 1.0);

    for (a, b) in lines {
        let pa = camera.project(&place(a, yaw));
        let pb = camera.project(&place(b, yaw));
        list.line(Point2::new(pa.x, pa.y), Point2::new(pb.x, pb.y), stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::projection::Viewport;

    #[test]
    fn test_floor_lines_lie_on_plane() {
        let lines = floor_lines();
        assert_eq!(lines.len(), GRID_LINES * 2);
        assert!(lines
            .iter()
            .all(|(a, b)| a.y == GRID_FLOOR_Y && b.y == GRID_FLOOR_Y));
    }

    #[test]
    fn test_grid_stays_in_front_of_camera_plane() {
        let lines = floor_lines();
        for step in 0..32 {
            let yaw = step as f32 * 0.2;
            for (a, b) in &lines {
                assert!(4.0 + place(a, yaw).z > 0.5);
                assert!(4.0 + place(b, yaw).z > 0.5);
            }
        }
    }

    #[test]
    fn test_near_edge_sits_lower_on_screen() {
        let near = place(&Point3::new(0.0, GRID_FLOOR_Y, -GRID_HALF_EXTENT), 0.0);
        let far = place(&Point3::new(0.0, GRID_FLOOR_Y, GRID_HALF_EXTENT), 0.0);
        assert!(near.y > far.y);
    }

    #[test]
    fn test_one_line_command_per_segment() {
        let camera = Camera::new(4.0, 50.0, Viewport::new(200.0, 200.0));
        let mut list = DrawList::new();
        render_grid(&mut list, &floor_lines(), 0.3, &camera, 0.0);
        assert_eq!(list.len(), GRID_LINES * 2);
        assert!(list.iter().all(|c| matches!(c, DrawCommand::Line { .. })));
    }
}
