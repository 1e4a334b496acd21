//! The drawing side. Whoever owns the window implements [`Renderer`].

use euclid::default::Point2D;

/// Primitive draw calls. Colors are 0xRRGGBB, positions are pixels.
pub trait Renderer {
    fn circle(&mut self, center: Point2D<f64>, radius: f64, color: u32);
    /// An open line through the points, in order.
    fn polyline(&mut self, points: &[Point2D<f64>], color: u32);
    /// Text centered on `at`.
    fn text(&mut self, at: Point2D<f64>, text: &str, color: u32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Point2D<f64>,
        radius: f64,
        color: u32,
    },
    Polyline {
        points: Vec<Point2D<f64>>,
        color: u32,
    },
    Text {
        at: Point2D<f64>,
        text: String,
        color: u32,
    },
}

/// A Renderer that just writes everything down, to be drawn (or checked) later.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter()
    }

    /// Play everything back into another renderer.
    pub fn replay<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for command in &self.commands {
            match command {
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => renderer.circle(*center, *radius, *color),
                DrawCommand::Polyline { points, color } => renderer.polyline(points, *color),
                DrawCommand::Text { at, text, color } => renderer.text(*at, text, *color),
            }
        }
    }
}

impl Renderer for DrawList {
    fn circle(&mut self, center: Point2D<f64>, radius: f64, color: u32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn polyline(&mut self, points: &[Point2D<f64>], color: u32) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, at: Point2D<f64>, text: &str, color: u32) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}
