//! Executes draw lists on an HTML canvas 2D context

use std::f64::consts::TAU;

use spin3d_core::{DrawCommand, DrawList, Point2, Stroke, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsError::new("Failed to get 2d context"))?
            .ok_or_else(|| JsError::new("Canvas 2d context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsError::new("Failed to cast to CanvasRenderingContext2d"))?;

        Ok(Self { canvas, ctx })
    }

    /// Backing store size in device pixels
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Resize the backing store. Returns whether the size changed.
    pub fn resize(&self, width: u32, height: u32) -> bool {
        let changed = self.canvas.width() != width || self.canvas.height() != height;
        if changed {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        changed
    }

    /// Display size of the canvas element in CSS pixels
    pub fn client_size(&self) -> (i32, i32) {
        (self.canvas.client_width(), self.canvas.client_height())
    }

    pub fn execute(&self, list: &DrawList) {
        for command in list {
            match command {
                DrawCommand::Clear(color) | DrawCommand::Fade(color) => {
                    let viewport = self.viewport();
                    self.ctx.set_fill_style_str(&color.to_css());
                    self.ctx.fill_rect(
                        0.0,
                        0.0,
                        viewport.width as f64,
                        viewport.height as f64,
                    );
                }
                DrawCommand::Polygon {
                    points,
                    fill,
                    stroke,
                } => {
                    if !self.trace(points) {
                        continue;
                    }
                    if let Some(fill) = fill {
                        self.ctx.set_fill_style_str(&fill.to_css());
                        self.ctx.fill();
                    }
                    if let Some(stroke) = stroke {
                        self.stroke(stroke);
                    }
                }
                DrawCommand::Line { from, to, stroke } => {
                    self.ctx.begin_path();
                    self.ctx.move_to(from.x as f64, from.y as f64);
                    self.ctx.line_to(to.x as f64, to.y as f64);
                    self.stroke(stroke);
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                } => {
                    self.ctx.begin_path();
                    if let Err(err) = self.ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius.max(0.0) as f64,
                        0.0,
                        TAU,
                    ) {
                        tracing::warn!(?err, radius, "canvas arc failed, skipping circle");
                        continue;
                    }
                    self.ctx.set_fill_style_str(&fill.to_css());
                    self.ctx.fill();
                }
            }
        }
    }

    /// Start a closed path through `points`. Returns false for empty input.
    fn trace(&self, points: &[Point2]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        true
    }

    fn stroke(&self, stroke: &Stroke) {
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.stroke();
    }
}
