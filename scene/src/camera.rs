//! Where we're looking from, and how that changes when you poke at it.

use crate::settings::{CameraSettings, ProjectionMode};

use euclid::default::{Point3D, Rotation3D, Vector2D, Vector3D};
use euclid::Angle;
use log::debug;

/// A camera flying around in 3D.
/// Positions are in scene units, which are meters times `world_scale`.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Point3D<f64>,
    pub look_at: Point3D<f64>,
    /// Radians around the world's up axis. Accumulates without wrapping.
    pub yaw: f64,
    /// Radians around the camera's right axis. Accumulates without wrapping.
    pub pitch: f64,
    pub focal_length: f64,
    /// Scene units per meter
    pub world_scale: f64,
}

/// The camera's own axes, all unit length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Basis {
    pub forward: Vector3D<f64>,
    pub right: Vector3D<f64>,
    pub up: Vector3D<f64>,
}

impl PerspectiveCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            position: settings.position,
            look_at: settings.look_at,
            yaw: 0.0,
            pitch: 0.0,
            focal_length: settings.focal_length,
            world_scale: settings.initial_scale,
        }
    }

    /// Forward starts out pointing at `look_at`, then gets turned by yaw and pitch.
    pub fn basis(&self) -> Basis {
        let world_up = Vector3D::new(0.0, 1.0, 0.0);

        let toward = self.look_at - self.position;
        let forward = if toward.square_length() > 0.0 {
            toward.normalize()
        } else {
            Vector3D::new(0.0, 0.0, -1.0)
        };
        let forward = Rotation3D::around_y(Angle::radians(self.yaw)).transform_vector3d(forward);

        let right = forward.cross(world_up);
        let right = if right.square_length() > 1e-24 {
            right.normalize()
        } else {
            // Looking straight up or down
            Vector3D::new(1.0, 0.0, 0.0)
        };

        let forward =
            Rotation3D::around_axis(right, Angle::radians(-self.pitch)).transform_vector3d(forward);
        let up = right.cross(forward);

        Basis { forward, right, up }
    }

    /// Drag to turn.
    pub fn rotate(&mut self, dx: f64, dy: f64, speed: f64) {
        self.yaw += dx * speed;
        self.pitch += dy * speed;
    }

    /// Slide the camera and its target together. Dragging right moves the camera left,
    /// so the world follows the pointer.
    pub fn pan(&mut self, dx: f64, dy: f64, speed: f64) {
        self.translate(Vector3D::new(-dx * speed, dy * speed, 0.0));
    }

    /// Dolly along z. Dragging down backs away.
    pub fn zoom(&mut self, dy: f64, speed: f64) {
        self.translate(Vector3D::new(0.0, 0.0, dy * speed));
    }

    pub fn translate(&mut self, by: Vector3D<f64>) {
        self.position += by;
        self.look_at += by;
    }
}

/// A camera looking straight down at the xy-plane.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarCamera {
    /// Pixels per meter. Always positive.
    scale: f64,
    initial_scale: f64,
    /// Pixels added after scaling
    pub pan: Vector2D<f64>,
    /// Radians the view is turned about the anchor. Accumulates without wrapping.
    pub rotation: f64,
}

impl PlanarCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            scale: settings.initial_scale,
            initial_scale: settings.initial_scale,
            pan: Vector2D::zero(),
            rotation: 0.0,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// How much bigger things are drawn than when we started.
    /// Body radii get multiplied by this; the bodies themselves are never touched.
    pub fn display_scale(&self) -> f64 {
        self.scale / self.initial_scale
    }

    /// Drag up to zoom in, down to zoom out.
    /// Returns false (and changes nothing) if the new scale wouldn't be positive.
    pub fn zoom(&mut self, dy: f64, speed: f64) -> bool {
        let factor = 1.0 - dy * speed;
        let new_scale = self.scale * factor;
        if factor > 0.0 && new_scale > 0.0 && new_scale.is_finite() {
            self.scale = new_scale;
            true
        } else {
            debug!("Ignoring zoom by {} (scale would be {})", factor, new_scale);
            false
        }
    }

    pub fn rotate(&mut self, dx: f64, speed: f64) {
        self.rotation += dx * speed;
    }

    pub fn pan_by(&mut self, by: Vector2D<f64>) {
        self.pan += by;
    }

    /// Pan so the given world point lands in the middle of the screen.
    pub fn recenter_on(&mut self, world: Point3D<f64>) {
        self.pan = Vector2D::new(-world.x * self.scale, -world.y * self.scale);
    }
}

/// Either kind of camera. Which one you get is decided once, up front.
#[derive(Clone, Debug, PartialEq)]
pub enum Camera {
    Perspective(PerspectiveCamera),
    Planar(PlanarCamera),
}

impl Camera {
    pub fn new(mode: ProjectionMode, settings: &CameraSettings) -> Self {
        match mode {
            ProjectionMode::Perspective => Camera::Perspective(PerspectiveCamera::new(settings)),
            ProjectionMode::Planar => Camera::Planar(PlanarCamera::new(settings)),
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        match self {
            Camera::Perspective(_) => ProjectionMode::Perspective,
            Camera::Planar(_) => ProjectionMode::Planar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3D<f64>, b: Vector3D<f64>) -> bool {
        (a - b).length() < 1e-12
    }

    #[test]
    fn default_basis_faces_the_target() {
        let mut settings = CameraSettings::default();
        settings.position = Point3D::new(0.0, 0.0, 200.0);
        let camera = PerspectiveCamera::new(&settings);
        let basis = camera.basis();
        assert!(close(basis.forward, Vector3D::new(0.0, 0.0, -1.0)));
        assert!(close(basis.right, Vector3D::new(1.0, 0.0, 0.0)));
        assert!(close(basis.up, Vector3D::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn yaw_and_pitch_keep_the_basis_orthonormal() {
        let mut camera = PerspectiveCamera::new(&CameraSettings::default());
        camera.rotate(130.0, -45.0, 0.005);
        assert!((camera.yaw - 0.65).abs() < 1e-12);
        assert!((camera.pitch + 0.225).abs() < 1e-12);

        let b = camera.basis();
        for v in [b.forward, b.right, b.up].iter() {
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
        assert!(b.forward.dot(b.right).abs() < 1e-9);
        assert!(b.forward.dot(b.up).abs() < 1e-9);
        assert!(b.right.dot(b.up).abs() < 1e-9);
    }

    #[test]
    fn quarter_yaw_turns_the_view_sideways() {
        let mut settings = CameraSettings::default();
        settings.position = Point3D::new(0.0, 0.0, 200.0);
        let mut camera = PerspectiveCamera::new(&settings);
        camera.yaw = std::f64::consts::FRAC_PI_2;
        assert!(close(camera.basis().forward, Vector3D::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn pan_and_zoom_move_the_whole_rig() {
        let mut camera = PerspectiveCamera::new(&CameraSettings::default());
        camera.pan(10.0, 20.0, 0.3);
        camera.zoom(-4.0, 0.5);
        assert!(close(camera.position.to_vector(), Vector3D::new(-3.0, 56.0, 198.0)));
        assert!(close(camera.look_at.to_vector(), Vector3D::new(-3.0, 6.0, -2.0)));
    }

    #[test]
    fn zooming_in_grows_the_scale_until_it_would_flip() {
        let settings = CameraSettings::default();
        let mut camera = PlanarCamera::new(&settings);

        let mut last = camera.scale();
        for _ in 0..20 {
            assert!(camera.zoom(-10.0, settings.planar_zoom_speed));
            assert!(camera.scale() > last);
            last = camera.scale();
        }
        assert!(camera.display_scale() > 1.0);

        // 1 - 250 * 0.005 < 0
        assert!(!camera.zoom(250.0, settings.planar_zoom_speed));
        assert!(!camera.zoom(1000.0, settings.planar_zoom_speed));
        assert_eq!(camera.scale(), last);
    }

    #[test]
    fn recenter_cancels_the_scaled_position() {
        let mut camera = PlanarCamera::new(&CameraSettings::default());
        camera.recenter_on(Point3D::new(2.0 / camera.scale(), -3.0 / camera.scale(), 9.0));
        assert!((camera.pan.x + 2.0).abs() < 1e-9);
        assert!((camera.pan.y - 3.0).abs() < 1e-9);
    }
}
