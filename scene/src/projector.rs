//! Turns world positions (meters) into screen positions (pixels).

use crate::camera::{Camera, PerspectiveCamera, PlanarCamera};
use crate::settings::Viewport;

use euclid::default::{Point2D, Point3D, Vector2D};
use simulator::bodies::Trail;

/// Projects points for one frame.
/// Built fresh every frame from the camera, the screen size, and where the anchor is.
pub struct Projector<'a> {
    camera: &'a Camera,
    viewport: Viewport,
    /// Where the anchor is in the world right now. The planar view rotates about it.
    anchor: Point3D<f64>,
}

impl<'a> Projector<'a> {
    pub fn new(camera: &'a Camera, viewport: Viewport, anchor: Point3D<f64>) -> Self {
        Self {
            camera,
            viewport,
            anchor,
        }
    }

    /// Where `world` lands on screen, or None if it's behind the camera.
    /// Points belonging to the anchor are never rotated.
    pub fn project(&self, world: Point3D<f64>, is_anchor: bool) -> Option<Point2D<f64>> {
        match self.camera {
            Camera::Perspective(cam) => perspective(cam, self.viewport, world),
            Camera::Planar(cam) => Some(self.planar(cam, world, is_anchor)),
        }
    }

    /// Every visible point of a trail, oldest first.
    /// In perspective, points behind the camera are just dropped, so the line can have gaps.
    pub fn project_trail(&self, trail: &Trail, is_anchor: bool) -> Vec<Point2D<f64>> {
        trail
            .iter()
            .filter_map(|&point| self.project(point, is_anchor))
            .collect()
    }

    /// How big to draw a body, in pixels. Never smaller than a pixel.
    pub fn radius(&self, radius: f64) -> f64 {
        let radius = match self.camera {
            Camera::Perspective(_) => radius,
            Camera::Planar(cam) => radius * cam.display_scale(),
        };
        radius.max(MIN_RADIUS)
    }

    fn planar(&self, cam: &PlanarCamera, world: Point3D<f64>, is_anchor: bool) -> Point2D<f64> {
        let point = planar_unrotated(cam, self.viewport, world);
        if cam.rotation == 0.0 || is_anchor {
            return point;
        }

        let pivot = planar_unrotated(cam, self.viewport, self.anchor);
        let offset = point - pivot;
        let radius = offset.x.hypot(offset.y);
        let theta = offset.y.atan2(offset.x) + cam.rotation;
        pivot + Vector2D::new(radius * theta.cos(), radius * theta.sin())
    }
}

/// Scale, move to the middle of the screen, then pan.
fn planar_unrotated(cam: &PlanarCamera, viewport: Viewport, world: Point3D<f64>) -> Point2D<f64> {
    Point2D::new(world.x * cam.scale(), world.y * cam.scale()) + viewport.center().to_vector()
        + cam.pan
}

fn perspective(
    cam: &PerspectiveCamera,
    viewport: Viewport,
    world: Point3D<f64>,
) -> Option<Point2D<f64>> {
    let basis = cam.basis();
    let relative = (world.to_vector() * cam.world_scale) - cam.position.to_vector();

    let depth = relative.dot(basis.forward);
    // The near plane is the only thing we cull against.
    if !(depth > 0.0) {
        return None;
    }

    let ratio = cam.focal_length / depth;
    let center = viewport.center();
    let x = center.x + relative.dot(basis.right) * ratio;
    // Screen y grows downward
    let y = center.y - relative.dot(basis.up) * ratio;
    if x.is_finite() && y.is_finite() {
        Some(Point2D::new(x, y))
    } else {
        None
    }
}

const MIN_RADIUS: f64 = 1.0;
