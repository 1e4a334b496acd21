//! Handles bodies and such

use euclid::default::{Point3D, Vector3D};

use std::collections::VecDeque;

/// The representation of a body, like a star or a planet.
/// Doesn't store its position or velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    /// Kilograms. Must be positive.
    pub mass: f64,
    /// Display radius in pixels. Never used by the physics.
    pub radius: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    /// The body distances are measured against (the star, usually).
    /// Exactly one body in a system has this set.
    pub anchor: bool,
}

impl Body {
    pub fn new(name: impl Into<String>, mass: f64, radius: f64, color: u32) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            color,
            anchor: false,
        }
    }

    /// Flag this body as the anchor.
    pub fn anchored(mut self) -> Self {
        self.anchor = true;
        self
    }
}

/// A Kinemat holds all the kinematic information about something.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Kinemat {
    /// Meters
    pub pos: Point3D<f64>,
    /// Meters per second
    pub vel: Vector3D<f64>,
}

impl Kinemat {
    pub fn new(pos: Point3D<f64>, vel: Vector3D<f64>) -> Self {
        Self { pos, vel }
    }

    /// A kinemat in the xy-plane.
    pub fn planar(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            pos: Point3D::new(x, y, 0.0),
            vel: Vector3D::new(vx, vy, 0.0),
        }
    }

    pub fn zero() -> Self {
        Self {
            pos: Point3D::origin(),
            vel: Vector3D::zero(),
        }
    }

    pub fn is_finite(&self) -> bool {
        let Kinemat { pos, vel } = self;
        [pos.x, pos.y, pos.z, vel.x, vel.y, vel.z]
            .iter()
            .all(|c| c.is_finite())
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity.
    pub fn update(&mut self, dt: f64, acc: Vector3D<f64>) {
        self.vel += acc * dt;
        self.pos += self.vel * dt;
    }
}

/// An Orbiter is a combination of a Body and a Kinemat.
/// In other words, a thing and where it is (and how fast it's going.)
#[derive(Clone, Debug, PartialEq)]
pub struct Orbiter(pub Body, pub Kinemat);

/// The last few positions of a body, oldest first.
/// Once full, every push evicts the oldest point.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Point3D<f64>>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    pub fn push(&mut self, point: Point3D<f64>) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            // too long! Void the oldest please.
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3D<f64>> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Point3D<f64>> {
        self.points.back()
    }
}
