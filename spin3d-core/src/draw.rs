//! Host-independent 2D drawing primitives
//!
//! The pipeline records what to draw; the terminal and canvas hosts each
//! execute the list against their own raster surface.

use crate::color::Hsla;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Hsla,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Hsla, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Paint the whole surface opaque
    Clear(Hsla),
    /// Paint the whole surface with a translucent color, leaving trails
    Fade(Hsla),
    Polygon {
        points: Vec<Point2>,
        fill: Option<Hsla>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point2,
        to: Point2,
        stroke: Stroke,
    },
    Circle {
        center: Point2,
        radius: f32,
        fill: Hsla,
    },
}

/// Draw commands in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn polygon(&mut self, points: Vec<Point2>, fill: Option<Hsla>, stroke: Option<Stroke>) {
        self.push(DrawCommand::Polygon {
            points,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, from: Point2, to: Point2, stroke: Stroke) {
        self.push(DrawCommand::Line { from, to, stroke });
    }

    pub fn circle(&mut self, center: Point2, radius: f32, fill: Hsla) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            fill,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
