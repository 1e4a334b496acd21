//! Draws scene commands onto a ggez canvas.

use euclid::default::Point2D;
use ggez::glam::Vec2;
use ggez::graphics::{Canvas, Color, DrawMode, DrawParam, Mesh, Text, TextLayout};
use ggez::Context;
use log::warn;
use scene::Renderer;

pub struct GgezRenderer<'a> {
    ctx: &'a Context,
    canvas: &'a mut Canvas,
}

impl<'a> GgezRenderer<'a> {
    pub fn new(ctx: &'a Context, canvas: &'a mut Canvas) -> Self {
        Self { ctx, canvas }
    }
}

fn to_vec2(point: Point2D<f64>) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

impl Renderer for GgezRenderer<'_> {
    fn circle(&mut self, center: Point2D<f64>, radius: f64, color: u32) {
        match Mesh::new_circle(
            self.ctx,
            DrawMode::fill(),
            to_vec2(center),
            radius as f32,
            0.1,
            Color::from_rgb_u32(color),
        ) {
            Ok(mesh) => self.canvas.draw(&mesh, DrawParam::default()),
            Err(e) => warn!("Skipping a circle at {:?}: {}", center, e),
        }
    }

    fn polyline(&mut self, points: &[Point2D<f64>], color: u32) {
        let points: Vec<Vec2> = points.iter().copied().map(to_vec2).collect();
        match Mesh::new_line(self.ctx, &points, TRAIL_WIDTH, Color::from_rgb_u32(color)) {
            Ok(mesh) => self.canvas.draw(&mesh, DrawParam::default()),
            // Happens when every point lands on the same pixel
            Err(e) => warn!("Skipping a trail of {} points: {}", points.len(), e),
        }
    }

    fn text(&mut self, at: Point2D<f64>, text: &str, color: u32) {
        let mut text = Text::new(text);
        text.set_scale(LABEL_SIZE).set_layout(TextLayout::center());
        self.canvas.draw(
            &text,
            DrawParam::default()
                .dest(to_vec2(at))
                .color(Color::from_rgb_u32(color)),
        );
    }
}

const TRAIL_WIDTH: f32 = 2.0;
const LABEL_SIZE: f32 = 16.0;
