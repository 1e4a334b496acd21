//! Tuning knobs for the camera, and the shape of the screen.

use euclid::default::{Point2D, Point3D};
use simulator::AU;

use std::fmt;
use std::str::FromStr;

/// How the world gets flattened onto the screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Full 3D, with a camera you can fly around.
    Perspective,
    /// Top-down onto the xy-plane, with zoom, pan and a view rotation.
    Planar,
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "perspective" | "3d" => Ok(ProjectionMode::Perspective),
            "planar" | "2d" => Ok(ProjectionMode::Planar),
            other => Err(format!(
                "unknown projection mode `{}` (expected `perspective` or `planar`)",
                other
            )),
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Perspective => write!(f, "perspective"),
            ProjectionMode::Planar => write!(f, "planar"),
        }
    }
}

/// The drawable area, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2D<f64> {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
    /// Radians per pixel of drag, for both yaw/pitch and the planar view rotation
    pub rotation_speed: f64,
    /// Scene units per pixel of middle-drag (perspective)
    pub pan_speed: f64,
    /// Scene units of depth per pixel of right-drag (perspective)
    pub zoom_speed: f64,
    /// Scene units per frame while a movement key is held (perspective)
    pub move_speed: f64,
    pub focal_length: f64,
    /// Where the perspective camera starts, in scene units
    pub position: Point3D<f64>,
    pub look_at: Point3D<f64>,
    /// Fraction of scale per pixel of right-drag (planar)
    pub planar_zoom_speed: f64,
    /// Pixels per frame while a movement key is held (planar)
    pub planar_pan_step: f64,
    /// Pixels per meter. The perspective camera uses it to turn meters into scene units.
    pub initial_scale: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005,
            pan_speed: 0.3,
            zoom_speed: 0.5,
            move_speed: 5.0,
            focal_length: 500.0,
            position: Point3D::new(0.0, 50.0, 200.0),
            look_at: Point3D::origin(),
            planar_zoom_speed: 0.005,
            planar_pan_step: 10.0,
            initial_scale: 200.0 / AU,
        }
    }
}
