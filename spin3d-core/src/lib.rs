//! Spin3D Core Library - Shape building and the software render pipeline
//!
//! Shapes are rotated, perspective-projected, flat-shaded and depth-sorted
//! into a list of 2D drawing primitives. Hosts (terminal, canvas) only
//! execute that list and forward user input.

pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod projection;
pub mod shading;
pub mod shapes;
pub mod transform;

// Re-export commonly used types
pub use color::Hsla;
pub use config::ViewerConfig;
pub use draw::{DrawCommand, DrawList, Point2, Stroke};
pub use error::{Result, Spin3dError};
pub use frame::{Frame, RenderState, Viewer};
pub use geometry::{Mesh, PointCloud, ShapeData};
pub use input::Input;
pub use projection::{project, Camera, Projected, Viewport};
pub use shading::RenderMode;
pub use shapes::{build_shape, ShapeKind};
pub use transform::{rotate, RotationState, Transform};
