//! Viewer configuration

use nalgebra::{Unit, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, Spin3dError};
use crate::shading::RenderMode;
use crate::shapes::ShapeKind;

/// Per-axis multipliers on the spin rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisWeights {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self {
            x: 0.7,
            y: 1.0,
            z: 0.35,
        }
    }
}

/// Control values the viewer starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialControls {
    pub shape: ShapeKind,
    pub mode: RenderMode,
    /// Spin speed, 0 to 100
    pub speed: f32,
    pub size: f32,
    /// Hue in degrees
    pub hue: f32,
    pub glow: bool,
}

impl Default for InitialControls {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Cube,
            mode: RenderMode::Solid,
            speed: 40.0,
            size: 1.0,
            hue: 205.0,
            glow: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Perspective distance in world units
    pub fov: f32,
    pub nominal_frame_ms: f64,
    /// Largest per-tick delta, in nominal frames
    pub max_delta: f32,
    /// Radians per nominal frame at full speed
    pub base_rate: f32,
    pub axis_weights: AxisWeights,
    /// Normalized on use
    pub light_direction: [f32; 3],
    pub input_capacity: usize,
    /// Radians per pixel of pointer drag
    pub drag_sensitivity: f32,
    /// Zoom change per wheel unit
    pub wheel_sensitivity: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Pixels per world unit, as a fraction of the shorter viewport side
    pub fit_ratio: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub initial: InitialControls,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov: 5.0,
            nominal_frame_ms: 1000.0 / 60.0,
            max_delta: 1.5,
            base_rate: 0.045,
            axis_weights: AxisWeights::default(),
            light_direction: [-0.45, -0.6, 0.65],
            input_capacity: 64,
            drag_sensitivity: 0.01,
            wheel_sensitivity: 0.001,
            zoom_min: 0.3,
            zoom_max: 4.0,
            fit_ratio: 0.22,
            size_min: 0.3,
            size_max: 1.8,
            initial: InitialControls::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<()> {
            Err(Spin3dError::InvalidConfig {
                field,
                reason: reason.into(),
            })
        }

        if !(self.fov > 0.0) {
            return invalid("fov", "must be positive");
        }
        if !(self.nominal_frame_ms > 0.0) {
            return invalid("nominal_frame_ms", "must be positive");
        }
        if !(self.max_delta > 0.0) {
            return invalid("max_delta", "must be positive");
        }
        if self.input_capacity == 0 {
            return invalid("input_capacity", "must hold at least one command");
        }
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max) {
            return invalid("zoom_min", "must be positive and not above zoom_max");
        }
        if !(self.size_min > 0.0 && self.size_min <= self.size_max) {
            return invalid("size_min", "must be positive and not above size_max");
        }
        if Vector3::from(self.light_direction).norm() == 0.0 {
            return invalid("light_direction", "must not be the zero vector");
        }
        if !(0.0..=100.0).contains(&self.initial.speed) {
            return invalid("initial.speed", "must be between 0 and 100");
        }
        Ok(())
    }

    pub fn light(&self) -> Unit<Vector3<f32>> {
        Unit::new_normalize(Vector3::from(self.light_direction))
    }
}
