//! ASCII rasterizer for terminal rendering
//!
//! Executes a [`DrawList`] against a grid of character cells. Terminal cells
//! are roughly twice as tall as they are wide, so the viewport handed to the
//! pipeline is `width x 2*height` and every y coordinate is halved here.

use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use spin3d_core::{DrawCommand, DrawList, Hsla, Point2, Stroke, Viewport};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lightness that maps to the top of the ramp
const FULL_LIGHTNESS: f32 = 60.0;
/// Primitives below this alpha only brighten cells, never darken them
const OPAQUE_ALPHA: f32 = 0.5;
/// Faded cells below this level are blanked
const FADE_CUTOFF: f32 = 0.05;

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: (u8, u8, u8),
    /// Luminosity in 0..=1
    pub level: f32,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        ch: ' ',
        color: (0, 0, 0),
        level: 0.0,
    };
}

#[derive(Debug, Clone, Copy)]
struct Paint {
    level: f32,
    color: (u8, u8, u8),
    opaque: bool,
}

impl Paint {
    fn from_color(color: Hsla) -> Self {
        let alpha = color.a.clamp(0.0, 1.0);
        Self {
            level: (color.l / FULL_LIGHTNESS * alpha).clamp(0.0, 1.0),
            color: color.with_alpha(0.35 + 0.65 * alpha).to_rgb_over_black(),
            opaque: alpha >= OPAQUE_ALPHA,
        }
    }
}

fn ramp_char(level: f32) -> char {
    if level <= 0.0 {
        return LUMINOSITY_RAMP[0];
    }
    let top = LUMINOSITY_RAMP.len() - 1;
    let index = (1.0 + level * (top - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(top)]
}

/// ASCII renderer that turns draw lists into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pipeline viewport: one unit per column, two per row
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, (self.height * 2) as f32)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.width && row < self.height {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        (0..self.width)
            .filter_map(|col| self.cell(col, row))
            .map(|cell| cell.ch)
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Execute every command in paint order
    pub fn render(&mut self, list: &DrawList) {
        for command in list {
            match command {
                DrawCommand::Clear(_) => self.clear(),
                DrawCommand::Fade(color) => self.fade(color.a),
                DrawCommand::Polygon {
                    points,
                    fill,
                    stroke,
                } => {
                    if let Some(fill) = fill {
                        self.fill_polygon(points, Paint::from_color(*fill));
                    }
                    if let Some(stroke) = stroke {
                        self.stroke_polygon(points, stroke);
                    }
                }
                DrawCommand::Line { from, to, stroke } => {
                    self.line(*from, *to, Paint::from_color(stroke.color))
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                } => self.disc(*center, *radius, Paint::from_color(*fill)),
            }
        }
    }

    /// Dim every cell as if a translucent background were painted over it
    fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            let level = cell.level * keep;
            if level < FADE_CUTOFF {
                *cell = Cell::EMPTY;
                continue;
            }
            let (r, g, b) = cell.color;
            let dim = |c: u8| (c as f32 * keep).round() as u8;
            *cell = Cell {
                ch: ramp_char(level),
                color: (dim(r), dim(g), dim(b)),
                level,
            };
        }
    }

    fn plot(&mut self, col: i64, row: i64, paint: Paint) {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return;
        }
        let idx = row as usize * self.width + col as usize;
        let cell = &mut self.cells[idx];
        if paint.opaque || paint.level >= cell.level {
            *cell = Cell {
                ch: ramp_char(paint.level),
                color: paint.color,
                level: paint.level,
            };
        }
    }

    /// Even-odd scanline fill, sampling each cell at its center
    fn fill_polygon(&mut self, points: &[Point2], paint: Paint) {
        if points.len() < 3 || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return;
        }

        let mut crossings = Vec::with_capacity(points.len());
        for row in 0..self.height {
            let y = (row as f32 + 0.5) * 2.0;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                    crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as i64;
                let end = (span[1] - 0.5).floor().min(self.width as f32) as i64;
                for col in start..=end {
                    self.plot(col, row as i64, paint);
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Point2], stroke: &Stroke) {
        let paint = Paint::from_color(stroke.color);
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(a, b, paint);
        }
    }

    /// DDA line. Stroke width is below cell resolution and ignored.
    fn line(&mut self, from: Point2, to: Point2, paint: Paint) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };

        let dx = to.x - from.x;
        let dy = (to.y - from.y) / 2.0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = from.x + dx * t;
            let y = (from.y + (to.y - from.y) * t) / 2.0;
            self.plot(x.floor() as i64, y.floor() as i64, paint);
        }
    }

    /// Liang-Barsky clip against the viewport, padded by one cell
    fn clip(&self, from: Point2, to: Point2) -> Option<(Point2, Point2)> {
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return None;
        }

        // f64 keeps far-offscreen endpoints from losing the visible span
        let viewport = self.viewport();
        let (x0, y0) = (from.x as f64, from.y as f64);
        let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [
            (-dx, x0 + 1.0),
            (dx, viewport.width as f64 + 1.0 - x0),
            (-dy, y0 + 2.0),
            (dy, viewport.height as f64 + 2.0 - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| Point2::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
        Some((at(t0), at(t1)))
    }

    /// Filled circle in viewport units. The cell under the center is
    /// always painted so sub-cell dots stay visible.
    fn disc(&mut self, center: Point2, radius: f32, paint: Paint) {
        if !center.x.is_finite() || !center.y.is_finite() || !radius.is_finite() {
            return;
        }

        let min_col = (center.x - radius).floor().max(0.0) as i64;
        let max_col = (center.x + radius).ceil().min(self.width as f32) as i64;
        let min_row = ((center.y - radius) / 2.0).floor().max(0.0) as i64;
        let max_row = ((center.y + radius) / 2.0).ceil().min(self.height as f32) as i64;

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let dx = col as f32 + 0.5 - center.x;
                let dy = (row as f32 + 0.5) * 2.0 - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.plot(col, row, paint);
                }
            }
        }
        self.plot(
            center.x.floor() as i64,
            (center.y / 2.0).floor() as i64,
            paint,
        );
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for row in 0..self.height {
            writer.queue(MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let cell = self.cells[row * self.width + col];
                if cell.ch != ' ' && current != Some(cell.color) {
                    let (r, g, b) = cell.color;
                    writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
