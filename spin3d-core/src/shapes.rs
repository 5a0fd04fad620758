//! Shape builder for the selectable primitives
//!
//! Polyhedra are hand-specified with counter-clockwise winding seen from
//! outside, so the right-hand face normal points outward. Curved shapes are
//! sampled into point clouds.

use nalgebra::Point3;
use std::f32::consts::{PI, TAU};
use std::fmt;

use crate::geometry::{Mesh, PointCloud, ShapeData};

pub const TORUS_MAJOR_RADIUS: f32 = 1.0;
pub const TORUS_TUBE_RADIUS: f32 = 0.42;
pub const TORUS_RADIAL_STEPS: usize = 18;
pub const TORUS_TUBULAR_STEPS: usize = 26;

pub const SPHERE_RADIUS: f32 = 1.25;
pub const SPHERE_LAT_STEPS: usize = 14;
pub const SPHERE_LON_STEPS: usize = 24;

/// The selectable primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Cube,
    Pyramid,
    #[serde(rename = "octa")]
    Octahedron,
    Torus,
    Sphere,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Cube,
        ShapeKind::Pyramid,
        ShapeKind::Octahedron,
        ShapeKind::Torus,
        ShapeKind::Sphere,
    ];

    /// Resolve a selection name. Anything unrecognized is a sphere.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "cube" => ShapeKind::Cube,
            "pyramid" => ShapeKind::Pyramid,
            "octa" => ShapeKind::Octahedron,
            "torus" => ShapeKind::Torus,
            _ => ShapeKind::Sphere,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::Octahedron => "octa",
            ShapeKind::Torus => "torus",
            ShapeKind::Sphere => "sphere",
        }
    }

    pub fn build(self) -> ShapeData {
        match self {
            ShapeKind::Cube => ShapeData::Polygon(cube()),
            ShapeKind::Pyramid => ShapeData::Polygon(pyramid()),
            ShapeKind::Octahedron => ShapeData::Polygon(octahedron()),
            ShapeKind::Torus => ShapeData::Points(torus(
                TORUS_MAJOR_RADIUS,
                TORUS_TUBE_RADIUS,
                TORUS_RADIAL_STEPS,
                TORUS_TUBULAR_STEPS,
            )),
            ShapeKind::Sphere => ShapeData::Points(sphere(
                SPHERE_RADIUS,
                SPHERE_LAT_STEPS,
                SPHERE_LON_STEPS,
            )),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the shape for a selection name
pub fn build_shape(name: &str) -> ShapeData {
    ShapeKind::from_name(name).build()
}

fn points(coords: &[[f32; 3]]) -> Vec<Point3<f32>> {
    coords.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect()
}

/// Cube spanning -1..1 on every axis
pub fn cube() -> Mesh {
    let vertices = points(&[
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ]);
    let faces = vec![
        vec![4, 5, 6, 7], // +z
        vec![0, 3, 2, 1], // -z
        vec![1, 2, 6, 5], // +x
        vec![0, 4, 7, 3], // -x
        vec![3, 7, 6, 2], // +y
        vec![0, 1, 5, 4], // -y
    ];
    Mesh::new(vertices, faces)
}

/// Square pyramid. Screen y grows downward, so the apex sits at negative y.
pub fn pyramid() -> Mesh {
    let vertices = points(&[
        [-1.0, 0.8, -1.0],
        [1.0, 0.8, -1.0],
        [1.0, 0.8, 1.0],
        [-1.0, 0.8, 1.0],
        [0.0, -1.2, 0.0],
    ]);
    let faces = vec![
        vec![0, 3, 2, 1], // base
        vec![2, 3, 4],
        vec![1, 2, 4],
        vec![0, 1, 4],
        vec![3, 0, 4],
    ];
    Mesh::new(vertices, faces)
}

/// Regular octahedron with its vertices on the axes
pub fn octahedron() -> Mesh {
    let r = 1.3;
    let vertices = points(&[
        [r, 0.0, 0.0],
        [-r, 0.0, 0.0],
        [0.0, r, 0.0],
        [0.0, -r, 0.0],
        [0.0, 0.0, r],
        [0.0, 0.0, -r],
    ]);
    // One face per octant
    let faces = vec![
        vec![0, 2, 4],
        vec![1, 4, 2],
        vec![0, 4, 3],
        vec![1, 3, 4],
        vec![0, 5, 2],
        vec![1, 2, 5],
        vec![0, 3, 5],
        vec![1, 5, 3],
    ];
    Mesh::new(vertices, faces)
}

/// Sample a torus around the y axis.
///
/// Yields `radial_steps * tubular_steps` points; both angles sweep one full
/// turn without repeating the seam.
pub fn torus(
    major_radius: f32,
    tube_radius: f32,
    radial_steps: usize,
    tubular_steps: usize,
) -> PointCloud {
    let mut points = Vec::with_capacity(radial_steps * tubular_steps);
    for i in 0..radial_steps {
        let u = i as f32 / radial_steps as f32 * TAU;
        for j in 0..tubular_steps {
            let v = j as f32 / tubular_steps as f32 * TAU;
            let ring = major_radius + tube_radius * v.cos();
            points.push(Point3::new(
                ring * u.cos(),
                tube_radius * v.sin(),
                ring * u.sin(),
            ));
        }
    }
    PointCloud::new(points)
}

/// Sample a sphere on a latitude/longitude grid.
///
/// Yields `(lat_steps + 1) * (lon_steps + 1)` points: polar angle over
/// `[0, PI]`, azimuth over `[0, 2*PI]`, both endpoints included.
pub fn sphere(radius: f32, lat_steps: usize, lon_steps: usize) -> PointCloud {
    let mut points = Vec::with_capacity((lat_steps + 1) * (lon_steps + 1));
    for i in 0..=lat_steps {
        let theta = i as f32 / lat_steps.max(1) as f32 * PI;
        for j in 0..=lon_steps {
            let phi = j as f32 / lon_steps.max(1) as f32 * TAU;
            points.push(Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ));
        }
    }
    PointCloud::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::face_normal;

    fn mesh_of(kind: ShapeKind) -> Mesh {
        match kind.build() {
            ShapeData::Polygon(mesh) => mesh,
            ShapeData::Points(_) => panic!("{kind} should be a mesh"),
        }
    }

    #[test]
    fn test_cube_counts() {
        let cube = mesh_of(ShapeKind::Cube);
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 6);
        assert_eq!(cube.edges().len(), 12);
    }

    #[test]
    fn test_polyhedra_satisfy_euler() {
        for (kind, expected_edges) in [
            (ShapeKind::Cube, 12),
            (ShapeKind::Pyramid, 8),
            (ShapeKind::Octahedron, 12),
        ] {
            let mesh = mesh_of(kind);
            let v = mesh.vertices().len() as i64;
            let e = mesh.edges().len() as i64;
            let f = mesh.faces().len() as i64;
            assert_eq!(e, expected_edges, "{kind}");
            assert_eq!(v - e + f, 2, "{kind}");
        }
    }

    #[test]
    fn test_polyhedra_normals_point_outward() {
        for kind in [ShapeKind::Cube, ShapeKind::Pyramid, ShapeKind::Octahedron] {
            let mesh = mesh_of(kind);
            let v = mesh.vertices();
            let centroid = v.iter().fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords)
                / v.len() as f32;
            for face in mesh.faces() {
                let normal = face_normal(&v[face[0]], &v[face[1]], &v[face[2]]);
                let outward = v[face[0]].coords - centroid;
                assert!(normal.dot(&outward) > 0.0, "{kind} face {face:?}");
            }
        }
    }

    #[test]
    fn test_torus_point_count() {
        let cloud = torus(1.0, 0.4, 18, 26);
        assert_eq!(cloud.len(), 468);
    }

    #[test]
    fn test_sphere_points_on_surface() {
        let cloud = sphere(2.0, 6, 8);
        assert_eq!(cloud.len(), 7 * 9);
        for p in &cloud.points {
            assert!((p.coords.norm() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unknown_names_fall_back_to_sphere() {
        assert_eq!(ShapeKind::from_name("sphere"), ShapeKind::Sphere);
        assert_eq!(ShapeKind::from_name("dodecahedron"), ShapeKind::Sphere);
        assert_eq!(ShapeKind::from_name(""), ShapeKind::Sphere);
        assert_eq!(ShapeKind::from_name("Octa"), ShapeKind::Octahedron);
        assert!(matches!(build_shape("teapot"), ShapeData::Points(_)));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_name(kind.name()), kind);
        }
    }
}
