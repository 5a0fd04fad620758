//! Geometry primitives for 3D rendering

use nalgebra::{Point3, Vector3};
use std::collections::BTreeSet;

use crate::error::{Result, Spin3dError};

/// An unordered vertex pair, stored with the smaller index first
pub type Edge = (usize, usize);

/// A polygon mesh with faces given as vertex index loops
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    faces: Vec<Vec<usize>>,
    edges: Vec<Edge>,
}

impl Mesh {
    /// Build a mesh from the crate's own index tables.
    ///
    /// Indices are only checked in debug builds. Faces from outside the
    /// crate go through [`Mesh::try_new`].
    pub(crate) fn new(vertices: Vec<Point3<f32>>, faces: Vec<Vec<usize>>) -> Self {
        debug_assert!(
            faces.iter().flatten().all(|&i| i < vertices.len()),
            "face index out of bounds"
        );
        let edges = derive_edges(&faces);
        Self {
            vertices,
            faces,
            edges,
        }
    }

    /// Build a mesh, rejecting out-of-range indices and faces with fewer
    /// than three vertices.
    pub fn try_new(vertices: Vec<Point3<f32>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        for (face_index, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Spin3dError::DegenerateFace {
                    face: face_index,
                    len: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= vertices.len()) {
                return Err(Spin3dError::IndexOutOfBounds {
                    face: face_index,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self::new(vertices, faces))
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Deduplicated edges, sorted by their canonical pair
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Collect every consecutive vertex pair of every face (wrapping last to
/// first), keyed by the canonical (min, max) pair.
fn derive_edges(faces: &[Vec<usize>]) -> Vec<Edge> {
    let mut set = BTreeSet::new();
    for face in faces {
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            set.insert((a.min(b), a.max(b)));
        }
    }
    set.into_iter().collect()
}

/// Unconnected points
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    pub points: Vec<Point3<f32>>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The geometry currently on screen.
///
/// Replaced wholesale whenever a different primitive is selected.
#[derive(Debug, Clone)]
pub enum ShapeData {
    Polygon(Mesh),
    Points(PointCloud),
}

impl ShapeData {
    /// Number of vertices or points
    pub fn point_count(&self) -> usize {
        match self {
            ShapeData::Polygon(mesh) => mesh.vertices().len(),
            ShapeData::Points(cloud) => cloud.len(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ShapeData::Polygon(_) => "polygon",
            ShapeData::Points(_) => "points",
        }
    }
}

/// Unit normal of the plane through `a`, `b`, `c`.
///
/// Follows the right-hand rule on the winding `a -> b -> c`. Degenerate
/// (collinear) input yields the zero vector.
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;

    edge1
        .cross(&edge2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}
