//! Flat shading, back-face tests and painter's ordering for meshes

use nalgebra::{Point3, Unit, Vector3};
use std::fmt;
use std::str::FromStr;

use crate::color::Hsla;
use crate::draw::{DrawList, Point2, Stroke};
use crate::error::Spin3dError;
use crate::geometry::{face_normal, Mesh};
use crate::projection::Projected;

/// Lowest brightness a lit face can get, so no face goes fully black
pub const BRIGHTNESS_FLOOR: f32 = 0.12;

/// Point radius per pixel-per-unit of zoom at depth 1
const POINT_RADIUS: f32 = 0.014;

pub fn view_direction() -> Vector3<f32> {
    Vector3::z()
}

/// How meshes are drawn. Point clouds ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Solid,
    Wire,
}

impl RenderMode {
    pub fn token(self) -> &'static str {
        match self {
            RenderMode::Solid => "solid",
            RenderMode::Wire => "wire",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Solid => RenderMode::Wire,
            RenderMode::Wire => RenderMode::Solid,
        }
    }
}

impl FromStr for RenderMode {
    type Err = Spin3dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(RenderMode::Solid),
            "wire" | "wireframe" => Ok(RenderMode::Wire),
            other => Err(Spin3dError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Per-face values recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceShade {
    /// Index into the mesh's face list
    pub face: usize,
    pub normal: Vector3<f32>,
    pub brightness: f32,
    pub facing: f32,
    /// Mean z of the rotated vertices
    pub depth: f32,
}

impl FaceShade {
    pub fn is_back_facing(&self) -> bool {
        self.facing <= 0.0
    }
}

/// Shade one face from its rotated (pre-projection) vertices.
///
/// The normal comes from the first three indices only.
pub fn shade_face(
    index: usize,
    face: &[usize],
    rotated: &[Point3<f32>],
    light: &Unit<Vector3<f32>>,
) -> FaceShade {
    let normal = face_normal(&rotated[face[0]], &rotated[face[1]], &rotated[face[2]]);
    let depth = face.iter().map(|&i| rotated[i].z).sum::<f32>() / face.len() as f32;

    FaceShade {
        face: index,
        normal,
        brightness: normal.dot(light.as_ref()).max(BRIGHTNESS_FLOOR),
        facing: normal.dot(&view_direction()),
        depth,
    }
}

/// Shade every face, in face order
pub fn shade_faces(
    mesh: &Mesh,
    rotated: &[Point3<f32>],
    light: &Unit<Vector3<f32>>,
) -> Vec<FaceShade> {
    mesh.faces()
        .iter()
        .enumerate()
        .map(|(i, face)| shade_face(i, face, rotated, light))
        .collect()
}

/// Order faces by ascending depth.
///
/// The sort is stable, so faces at equal depth keep their mesh order. This
/// is only correct for convex, non-intersecting shapes.
pub fn painter_sort(shades: &mut [FaceShade]) {
    shades.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}

fn to_screen(projected: &[Projected], face: &[usize]) -> Vec<Point2> {
    face.iter()
        .map(|&i| Point2::new(projected[i].x, projected[i].y))
        .collect()
}

pub fn solid_fill(hue: f32, brightness: f32) -> Hsla {
    Hsla::new(hue, 62.0, 22.0 + brightness * 38.0, 1.0)
}

pub fn solid_outline() -> Stroke {
    Stroke::new(Hsla::new(0.0, 0.0, 100.0, 0.12), 1.0)
}

pub fn wire_face_stroke(hue: f32) -> Stroke {
    Stroke::new(Hsla::new(hue, 85.0, 60.0, 0.35), 1.0)
}

pub fn wire_edge_stroke(hue: f32) -> Stroke {
    Stroke::new(Hsla::new(hue, 90.0, 80.0, 0.9), 1.5)
}

/// Record a mesh into `list`.
///
/// `rotated` and `projected` are indexed like the mesh's vertices. Wire
/// mode strokes every face outline and then every unique edge again in a
/// brighter style; both passes belong to the look.
pub fn render_mesh(
    list: &mut DrawList,
    mesh: &Mesh,
    rotated: &[Point3<f32>],
    projected: &[Projected],
    mode: RenderMode,
    hue: f32,
    light: &Unit<Vector3<f32>>,
) {
    let mut shades = shade_faces(mesh, rotated, light);
    painter_sort(&mut shades);

    match mode {
        RenderMode::Solid => {
            for shade in shades.iter().filter(|s| !s.is_back_facing()) {
                let points = to_screen(projected, &mesh.faces()[shade.face]);
                list.polygon(
                    points,
                    Some(solid_fill(hue, shade.brightness)),
                    Some(solid_outline()),
                );
            }
        }
        RenderMode::Wire => {
            let stroke = wire_face_stroke(hue);
            for shade in &shades {
                let points = to_screen(projected, &mesh.faces()[shade.face]);
                list.polygon(points, None, Some(stroke));
            }

            let edge_stroke = wire_edge_stroke(hue);
            for &(a, b) in mesh.edges() {
                list.line(
                    Point2::new(projected[a].x, projected[a].y),
                    Point2::new(projected[b].x, projected[b].y),
                    edge_stroke,
                );
            }
        }
    }
}

/// Record a point cloud as discs, farthest first.
///
/// Radius and alpha both grow with the depth factor.
pub fn render_points(list: &mut DrawList, projected: &[Projected], hue: f32, zoom: f32) {
    let mut order: Vec<&Projected> = projected.iter().collect();
    order.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    for p in order {
        let radius = (p.depth * zoom * POINT_RADIUS).max(0.5);
        let alpha = (0.2 + (p.depth - 0.7) * 1.1).clamp(0.15, 1.0);
        list.circle(
            Point2::new(p.x, p.y),
            radius,
            Hsla::new(hue, 85.0, 65.0, alpha),
        );
    }
}
