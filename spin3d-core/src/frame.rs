//! Frame driver: timing, input application, rotation integration and the
//! per-frame render pipeline

use nalgebra::{Point3, Unit, Vector3};

use crate::color::Hsla;
use crate::config::ViewerConfig;
use crate::draw::{DrawCommand, DrawList};
use crate::error::Result;
use crate::geometry::ShapeData;
use crate::grid;
use crate::input::{Input, InputQueue};
use crate::projection::{Camera, Viewport};
use crate::shading::{self, RenderMode};
use crate::shapes::ShapeKind;
use crate::transform::{RotationState, Transform};

pub const BACKGROUND: Hsla = Hsla::new(225.0, 30.0, 6.0, 1.0);
/// Alpha of the fade rectangle in glow mode
pub const GLOW_FADE: f32 = 0.22;

/// Turns host timestamps into clamped per-tick deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    nominal_frame_ms: f64,
    max_delta: f32,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new(nominal_frame_ms: f64, max_delta: f32) -> Self {
        Self {
            nominal_frame_ms,
            max_delta,
            last: None,
        }
    }

    /// Elapsed time since the previous tick in nominal frames, clamped to
    /// `[0, max_delta]`. The first tick counts as one frame.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last {
            None => 1.0,
            Some(last) => ((now_ms - last) / self.nominal_frame_ms).max(0.0) as f32,
        };
        self.last = Some(now_ms);
        delta.min(self.max_delta)
    }
}

/// Counts ticks and publishes the count once per real second
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<f64>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick. Returns the new rate when a second has elapsed.
    pub fn tick(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now_ms);

        if now_ms - start >= 1000.0 {
            // This tick opens the next window
            self.fps = self.frames;
            self.frames = 1;
            self.window_start = Some(now_ms);
            Some(self.fps)
        } else {
            self.frames += 1;
            None
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Last pointer position while a drag is in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub x: f32,
    pub y: f32,
}

/// Everything input can change; read once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub rotation: RotationState,
    pub zoom: f32,
    pub size: f32,
    pub mode: RenderMode,
    pub hue: f32,
    /// 0 to 100
    pub speed: f32,
    pub glow: bool,
    pub shape: ShapeKind,
    pub drag: Option<DragState>,
}

impl RenderState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let initial = &config.initial;
        Self {
            rotation: RotationState::INITIAL_POSE,
            zoom: 1.0,
            size: initial.size.clamp(config.size_min, config.size_max),
            mode: initial.mode,
            hue: initial.hue.rem_euclid(360.0),
            speed: initial.speed.clamp(0.0, 100.0),
            glow: initial.glow,
            shape: initial.shape,
            drag: None,
        }
    }

    /// Advance the spin by `delta` nominal frames
    pub fn integrate(&mut self, delta: f32, config: &ViewerConfig) {
        let step = self.speed / 100.0 * config.base_rate * delta;
        let w = config.axis_weights;
        self.rotation.advance(step * w.x, step * w.y, step * w.z);
    }
}

/// Output of one tick
#[derive(Debug, Clone)]
pub struct Frame {
    pub draw_list: DrawList,
    /// Set once per second when the rate is republished
    pub fps: Option<u32>,
    pub mode_label: String,
    pub delta: f32,
}

/// The single owning context of the viewer.
///
/// Hosts push [`Input`] at any time and call [`Viewer::tick`] once per
/// display refresh. Queued input is applied at the start of the next tick,
/// before the spin is integrated, so a tick never sees a half-applied
/// change.
#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    state: RenderState,
    shape: ShapeData,
    grid: Vec<(Point3<f32>, Point3<f32>)>,
    light: Unit<Vector3<f32>>,
    clock: FrameClock,
    fps: FpsCounter,
    queue: InputQueue,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let state = RenderState::from_config(&config);
        let shape = state.shape.build();
        tracing::info!(shape = %state.shape, mode = %state.mode, "viewer ready");

        Ok(Self {
            light: config.light(),
            clock: FrameClock::new(config.nominal_frame_ms, config.max_delta),
            queue: InputQueue::new(config.input_capacity),
            fps: FpsCounter::new(),
            grid: grid::floor_lines(),
            shape,
            state,
            config,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn shape(&self) -> &ShapeData {
        &self.shape
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Queue input for the next tick
    pub fn push_input(&mut self, input: Input) -> Result<()> {
        self.queue.push(input).map_err(|err| {
            tracing::warn!(?input, "dropped input: {err}");
            err
        })
    }

    pub fn mode_label(&self) -> String {
        let mode = match self.shape {
            ShapeData::Polygon(_) => self.state.mode.token(),
            ShapeData::Points(_) => "points",
        };
        format!("{} | {}", self.state.shape, mode)
    }

    /// Camera for the current zoom on `viewport`
    pub fn camera(&self, viewport: Viewport) -> Camera {
        let zoom = viewport.shorter_side() * self.config.fit_ratio * self.state.zoom;
        Camera::new(self.config.fov, zoom, viewport)
    }

    /// Run one frame
    pub fn tick(&mut self, now_ms: f64, viewport: Viewport) -> Frame {
        let pending: Vec<Input> = self.queue.drain().collect();
        for input in pending {
            self.apply(input);
        }

        let delta = self.clock.tick(now_ms);
        self.state.integrate(delta, &self.config);

        let mut draw_list = DrawList::new();
        if self.state.glow {
            draw_list.push(DrawCommand::Fade(BACKGROUND.with_alpha(GLOW_FADE)));
        } else {
            draw_list.push(DrawCommand::Clear(BACKGROUND));
        }

        let camera = self.camera(viewport);
        grid::render_grid(
            &mut draw_list,
            &self.grid,
            self.state.rotation.y,
            &camera,
            self.state.hue,
        );
        self.render_shape(&mut draw_list, &camera);

        Frame {
            draw_list,
            fps: self.fps.tick(now_ms),
            mode_label: self.mode_label(),
            delta,
        }
    }

    fn render_shape(&self, list: &mut DrawList, camera: &Camera) {
        let state = &self.state;
        match &self.shape {
            ShapeData::Polygon(mesh) => {
                let rotated = Transform::rotate_all(mesh.vertices(), &state.rotation, state.size);
                let projected = camera.project_all(&rotated);
                shading::render_mesh(
                    list,
                    mesh,
                    &rotated,
                    &projected,
                    state.mode,
                    state.hue,
                    &self.light,
                );
            }
            ShapeData::Points(cloud) => {
                let rotated = Transform::rotate_all(&cloud.points, &state.rotation, state.size);
                let projected = camera.project_all(&rotated);
                shading::render_points(list, &projected, state.hue, camera.zoom);
            }
        }
    }

    /// Apply one input immediately. Non-finite values are ignored, since
    /// one NaN would poison the rotation for good.
    pub fn apply(&mut self, input: Input) {
        if !input.is_finite() {
            tracing::warn!(?input, "ignored non-finite input");
            return;
        }

        let config = &self.config;
        let state = &mut self.state;

        match input {
            Input::PointerDown { x, y } => state.drag = Some(DragState { x, y }),
            Input::PointerMove { x, y } => {
                if let Some(drag) = state.drag.as_mut() {
                    let sensitivity = config.drag_sensitivity;
                    state.rotation.advance(
                        (y - drag.y) * sensitivity,
                        (x - drag.x) * sensitivity,
                        0.0,
                    );
                    *drag = DragState { x, y };
                }
            }
            Input::PointerUp | Input::PointerLeave => state.drag = None,
            Input::Wheel { delta } => {
                let zoom = state.zoom * (-delta * config.wheel_sensitivity).exp();
                state.zoom = zoom.clamp(config.zoom_min, config.zoom_max);
            }
            Input::SetZoom(zoom) => state.zoom = zoom.clamp(config.zoom_min, config.zoom_max),
            Input::SelectShape(kind) => {
                if kind != state.shape {
                    state.shape = kind;
                    self.shape = kind.build();
                    tracing::debug!(
                        shape = %kind,
                        kind = self.shape.kind_name(),
                        points = self.shape.point_count(),
                        "rebuilt shape"
                    );
                }
            }
            Input::SetMode(mode) => {
                state.mode = mode;
                tracing::debug!(%mode, "render mode changed");
            }
            Input::ToggleMode => {
                state.mode = state.mode.toggled();
                tracing::debug!(mode = %state.mode, "render mode changed");
            }
            Input::SetSpeed(speed) => state.speed = speed.clamp(0.0, 100.0),
            Input::SetSize(size) => state.size = size.clamp(config.size_min, config.size_max),
            Input::SetHue(hue) => state.hue = hue.rem_euclid(360.0),
            Input::SetGlow(glow) => state.glow = glow,
            Input::AdjustSpeed(step) => state.speed = (state.speed + step).clamp(0.0, 100.0),
            Input::AdjustSize(step) => {
                state.size = (state.size + step).clamp(config.size_min, config.size_max)
            }
            Input::AdjustHue(step) => state.hue = (state.hue + step).rem_euclid(360.0),
            Input::ToggleGlow => state.glow = !state.glow,
            Input::Nudge { dx, dy, dz } => state.rotation.advance(dx, dy, dz),
            Input::ResetView => {
                state.rotation = RotationState::zero();
                state.zoom = 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 640.0,
        height: 480.0,
    };

    fn viewer() -> Viewer {
        Viewer::new(ViewerConfig::default()).unwrap()
    }

    #[test]
    fn test_clock_first_tick_and_clamp() {
        let mut clock = FrameClock::new(10.0, 1.5);
        assert_eq!(clock.tick(1000.0), 1.0);
        assert_eq!(clock.tick(1010.0), 1.0);
        assert_eq!(clock.tick(1015.0), 0.5);
        // Ten nominal frames after a stall
        assert_eq!(clock.tick(1115.0), 1.5);
        // Clock went backwards
        assert_eq!(clock.tick(1100.0), 0.0);
    }

    #[test]
    fn test_fps_counter_publishes_once_per_second() {
        let mut counter = FpsCounter::new();
        let mut published = Vec::new();
        for i in 0..=100 {
            if let Some(fps) = counter.tick(i as f64 * 20.0) {
                published.push(fps);
            }
        }
        assert_eq!(published, vec![50, 50]);
        assert_eq!(counter.fps(), 50);
    }

    #[test]
    fn test_stall_advances_at_most_clamp() {
        let config = ViewerConfig::default();
        let mut v = viewer();
        v.tick(0.0, VIEWPORT);
        let before = v.state().rotation;

        v.tick(10.0 * config.nominal_frame_ms, VIEWPORT);
        let after = v.state().rotation;

        let full_step = v.state().speed / 100.0 * config.base_rate * config.axis_weights.y;
        let advanced = after.y - before.y;
        assert!((advanced - full_step * config.max_delta).abs() < 1e-6);
    }

    #[test]
    fn test_axes_spin_at_different_rates() {
        let mut v = viewer();
        let start = v.state().rotation;
        v.tick(0.0, VIEWPORT);
        let r = v.state().rotation;
        let (dx, dy, dz) = (r.x - start.x, r.y - start.y, r.z - start.z);
        assert!(dy > dx && dx > dz && dz > 0.0);
    }

    #[test]
    fn test_input_applies_before_integration() {
        let mut v = viewer();
        v.push_input(Input::SetSpeed(0.0)).unwrap();
        let before = v.state().rotation;
        v.tick(0.0, VIEWPORT);
        assert_eq!(v.state().rotation, before);
    }

    #[test]
    fn test_shape_selection_replaces_data() {
        let mut v = viewer();
        assert!(matches!(v.shape(), ShapeData::Polygon(_)));
        v.push_input(Input::SelectShape(ShapeKind::Torus)).unwrap();
        let frame = v.tick(0.0, VIEWPORT);
        assert_eq!(v.shape().point_count(), 468);
        assert_eq!(frame.mode_label, "torus | points");
    }

    #[test]
    fn test_drag_rotates_only_while_pressed() {
        let mut v = viewer();
        v.apply(Input::SetSpeed(0.0));
        let start = v.state().rotation;

        v.apply(Input::PointerMove { x: 50.0, y: 50.0 });
        assert_eq!(v.state().rotation, start);

        v.apply(Input::PointerDown { x: 0.0, y: 0.0 });
        v.apply(Input::PointerMove { x: 100.0, y: -20.0 });
        let r = v.state().rotation;
        assert!((r.y - start.y - 1.0).abs() < 1e-6);
        assert!((r.x - start.x + 0.2).abs() < 1e-6);

        v.apply(Input::PointerLeave);
        v.apply(Input::PointerMove { x: 300.0, y: 0.0 });
        assert_eq!(v.state().rotation, r);
    }

    #[test]
    fn test_wheel_zoom_is_clamped() {
        let mut v = viewer();
        v.apply(Input::Wheel { delta: -10_000.0 });
        assert_eq!(v.state().zoom, ViewerConfig::default().zoom_max);
        v.apply(Input::Wheel { delta: 10_000.0 });
        assert_eq!(v.state().zoom, ViewerConfig::default().zoom_min);
    }

    #[test]
    fn test_controls_are_clamped() {
        let mut v = viewer();
        v.apply(Input::SetSpeed(250.0));
        v.apply(Input::SetSize(99.0));
        v.apply(Input::SetHue(-30.0));
        let config = ViewerConfig::default();
        assert_eq!(v.state().speed, 100.0);
        assert_eq!(v.state().size, config.size_max);
        assert_eq!(v.state().hue, 330.0);
    }

    #[test]
    fn test_relative_adjustments_accumulate_within_a_tick() {
        let mut v = viewer();
        let speed = v.state().speed;
        v.push_input(Input::AdjustSpeed(10.0)).unwrap();
        v.push_input(Input::AdjustSpeed(10.0)).unwrap();
        v.push_input(Input::AdjustHue(200.0)).unwrap();
        v.push_input(Input::ToggleGlow).unwrap();
        v.tick(0.0, VIEWPORT);
        assert_eq!(v.state().speed, speed + 20.0);
        assert_eq!(v.state().hue, (205.0 + 200.0) % 360.0);
        assert!(v.state().glow);
    }

    #[test]
    fn test_glow_fades_instead_of_clearing() {
        let mut v = viewer();
        let frame = v.tick(0.0, VIEWPORT);
        assert!(matches!(frame.draw_list.commands()[0], DrawCommand::Clear(_)));

        v.push_input(Input::SetGlow(true)).unwrap();
        let frame = v.tick(16.0, VIEWPORT);
        match frame.draw_list.commands()[0] {
            DrawCommand::Fade(color) => assert_eq!(color.a, GLOW_FADE),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_frame_layers_background_grid_shape() {
        let mut v = viewer();
        v.push_input(Input::SetMode(RenderMode::Wire)).unwrap();
        let frame = v.tick(0.0, VIEWPORT);
        let commands = frame.draw_list.commands();

        let grid_lines = grid::floor_lines().len();
        // Clear, grid, six face outlines, twelve edges
        assert_eq!(commands.len(), 1 + grid_lines + 6 + 12);
        assert_eq!(frame.mode_label, "cube | wire");
    }

    #[test]
    fn test_non_finite_controls_leave_state_intact() {
        let mut v = viewer();
        assert!(v.push_input(Input::SetSpeed(f32::NAN)).is_err());
        v.apply(Input::SetSpeed(f32::NAN));
        v.apply(Input::SetSize(f32::INFINITY));
        v.apply(Input::SetZoom(f32::NAN));
        v.apply(Input::SetHue(f32::NAN));
        v.apply(Input::Wheel { delta: f32::NAN });
        v.apply(Input::PointerDown { x: 0.0, y: 0.0 });
        v.apply(Input::PointerMove {
            x: f32::NAN,
            y: 1.0,
        });

        let expected = RenderState::from_config(&ViewerConfig::default());
        let state = v.state();
        assert_eq!(state.speed, expected.speed);
        assert_eq!(state.size, expected.size);
        assert_eq!(state.zoom, expected.zoom);
        assert_eq!(state.hue, expected.hue);
        assert_eq!(state.rotation, expected.rotation);

        v.tick(0.0, VIEWPORT);
        v.tick(16.0, VIEWPORT);
        let r = v.state().rotation;
        assert!(r.x.is_finite() && r.y.is_finite() && r.z.is_finite());
    }

    #[test]
    fn test_reset_view() {
        let mut v = viewer();
        v.apply(Input::Nudge {
            dx: 0.3,
            dy: 0.0,
            dz: 0.1,
        });
        v.apply(Input::SetZoom(2.0));
        v.apply(Input::ResetView);
        assert_eq!(v.state().rotation, RotationState::zero());
        assert_eq!(v.state().zoom, 1.0);
    }
}
