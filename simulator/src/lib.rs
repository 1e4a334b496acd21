//! Handles the simulation of the solar system

pub mod bodies;
pub mod error;

use crate::bodies::{Body, Kinemat, Orbiter, Trail};
pub use crate::error::SimulationError;

use euclid::default::{Point3D, Vector3D};
use log::{error, info};

/// Numbers the integrator runs on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Params {
    /// Simulated seconds per step
    pub timestep: f64,
    pub grav_constant: f64,
    /// How many past positions each body remembers
    pub trail_capacity: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            timestep: TIMESTEP,
            grav_constant: GRAV_CONSTANT,
            trail_capacity: TRAIL_CAPACITY,
        }
    }
}

impl Params {
    fn validate(&self) -> Result<(), SimulationError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(SimulationError::InvalidParams("timestep must be positive"));
        }
        if !(self.grav_constant.is_finite() && self.grav_constant > 0.0) {
            return Err(SimulationError::InvalidParams(
                "gravitational constant must be positive",
            ));
        }
        if self.trail_capacity == 0 {
            return Err(SimulationError::InvalidParams(
                "trail capacity must be at least 1",
            ));
        }
        Ok(())
    }
}

pub struct SolarSystem {
    /// Indexed by body id; never grows or shrinks after construction.
    bodies: Vec<Body>,
    /// Same indices as `bodies`.
    kinemats: Vec<Kinemat>,
    trails: Vec<Trail>,
    /// Distance from each body to the anchor as of the last step.
    anchor_distances: Vec<f64>,
    anchor: usize,
    params: Params,
    steps: u64,
}

/// Everything there is to know about one body, borrowed from a SolarSystem.
#[derive(Copy, Clone, Debug)]
pub struct BodyView<'a> {
    pub id: usize,
    pub body: &'a Body,
    pub kinemat: &'a Kinemat,
    pub trail: &'a Trail,
    pub distance_to_anchor: f64,
}

impl<'a> BodyView<'a> {
    pub fn is_anchor(&self) -> bool {
        self.body.anchor
    }
}

impl SolarSystem {
    /// Checks the initial conditions and sets up a system ready to step.
    /// Coincident bodies are NOT rejected here; they blow up on the first step instead.
    pub fn new(orbiters: Vec<Orbiter>, params: Params) -> Result<Self, SimulationError> {
        params.validate()?;
        if orbiters.is_empty() {
            return Err(SimulationError::Empty);
        }

        let mut anchor: Option<usize> = None;
        for (idx, Orbiter(body, kmat)) in orbiters.iter().enumerate() {
            if !kmat.is_finite() {
                return Err(SimulationError::NonFiniteState { index: idx });
            }
            if !(body.mass.is_finite() && body.mass > 0.0) {
                return Err(SimulationError::NonPositiveMass {
                    index: idx,
                    mass: body.mass,
                });
            }
            if body.anchor {
                if let Some(first) = anchor {
                    return Err(SimulationError::MultipleAnchors { first, second: idx });
                }
                anchor = Some(idx);
            }
        }
        let anchor = anchor.ok_or(SimulationError::NoAnchor)?;

        let mut bodies = Vec::with_capacity(orbiters.len());
        let mut kinemats = Vec::with_capacity(orbiters.len());
        for Orbiter(body, kmat) in orbiters {
            bodies.push(body);
            kinemats.push(kmat);
        }
        let trails = (0..bodies.len())
            .map(|_| Trail::with_capacity(params.trail_capacity))
            .collect();
        let anchor_distances = kinemats
            .iter()
            .map(|kmat| (kmat.pos - kinemats[anchor].pos).length())
            .collect();

        info!(
            "Built a system of {} bodies anchored on {}",
            bodies.len(),
            bodies[anchor].name
        );

        Ok(SolarSystem {
            bodies,
            kinemats,
            trails,
            anchor_distances,
            anchor,
            params,
            steps: 0,
        })
    }

    /// Advance every body by one timestep.
    ///
    /// Forces are all computed from where the bodies were at the start of the step,
    /// then each body is integrated in turn. If any pair of bodies coincides, or any
    /// body would end up somewhere non-finite, the step is refused and nothing is mutated.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        match self.integrate() {
            Ok(next) => {
                for (id, (kmat, dist)) in next.into_iter().enumerate() {
                    self.kinemats[id] = kmat;
                    self.trails[id].push(kmat.pos);
                    if let Some(dist) = dist {
                        self.anchor_distances[id] = dist;
                    }
                }
                self.steps += 1;
                Ok(())
            }
            Err(e) => {
                error!("Refusing to step: {}", e);
                Err(e)
            }
        }
    }

    /// Where every body will be after one step, and its distance to the anchor this step.
    fn integrate(&self) -> Result<Vec<(Kinemat, Option<f64>)>, SimulationError> {
        let dt = self.params.timestep;
        self.accelerations()?
            .into_iter()
            .zip(&self.kinemats)
            .enumerate()
            .map(|(id, ((acc, dist), kmat))| {
                let mut next = *kmat;
                next.update(dt, acc);
                if next.is_finite() {
                    Ok((next, dist))
                } else {
                    Err(SimulationError::NonFiniteState { index: id })
                }
            })
            .collect()
    }

    /// Net acceleration on every body from the current positions,
    /// plus the distance to the anchor if the body felt it.
    fn accelerations(&self) -> Result<Vec<(Vector3D<f64>, Option<f64>)>, SimulationError> {
        let g = self.params.grav_constant;
        let mut out = Vec::with_capacity(self.bodies.len());
        for (id, (body, kmat)) in self.bodies.iter().zip(&self.kinemats).enumerate() {
            let mut wip_force = Vector3D::<f64>::zero();
            let mut anchor_dist = None;
            for (other_id, (other_body, other_kmat)) in
                self.bodies.iter().zip(&self.kinemats).enumerate()
            {
                if other_id == id {
                    continue;
                }
                let (first, second) = (id.min(other_id), id.max(other_id));
                if kmat.pos == other_kmat.pos {
                    return Err(SimulationError::DegenerateConfiguration { first, second });
                }
                let force = attraction(g, body.mass, kmat.pos, other_body.mass, other_kmat.pos)
                    .ok_or(SimulationError::ForceOverflow { first, second })?;
                if other_id == self.anchor {
                    anchor_dist = Some((other_kmat.pos - kmat.pos).length());
                }
                wip_force += force;
            }
            out.push((wip_force / body.mass, anchor_dist));
        }
        Ok(out)
    }

    /// The net gravitational force on each body right now, in newtons.
    pub fn net_forces(&self) -> Result<Vec<Vector3D<f64>>, SimulationError> {
        Ok(self
            .accelerations()?
            .into_iter()
            .zip(&self.bodies)
            .map(|((acc, _), body)| acc * body.mass)
            .collect())
    }

    pub fn get(&self, id: usize) -> Option<BodyView<'_>> {
        Some(BodyView {
            id,
            body: self.bodies.get(id)?,
            kinemat: self.kinemats.get(id)?,
            trail: self.trails.get(id)?,
            distance_to_anchor: *self.anchor_distances.get(id)?,
        })
    }

    /// Every body in id order.
    pub fn iter(&self) -> impl Iterator<Item = BodyView<'_>> + '_ {
        (0..self.bodies.len()).filter_map(move |id| self.get(id))
    }

    /// Copies of every body and where it is now.
    pub fn orbiters(&self) -> Vec<Orbiter> {
        self.bodies
            .iter()
            .zip(&self.kinemats)
            .map(|(body, kmat)| Orbiter(body.clone(), *kmat))
            .collect()
    }

    pub fn anchor(&self) -> BodyView<'_> {
        BodyView {
            id: self.anchor,
            body: &self.bodies[self.anchor],
            kinemat: &self.kinemats[self.anchor],
            trail: &self.trails[self.anchor],
            distance_to_anchor: 0.0,
        }
    }

    pub fn anchor_position(&self) -> Point3D<f64> {
        self.kinemats[self.anchor].pos
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// How many steps have been taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds since construction
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.params.timestep
    }
}

/// The gravitational force `other` exerts on `this`, in newtons.
/// Returns None if the two are at the same spot (or so close the force overflows).
pub fn attraction(
    grav_constant: f64,
    this_mass: f64,
    this_pos: Point3D<f64>,
    other_mass: f64,
    other_pos: Point3D<f64>,
) -> Option<Vector3D<f64>> {
    let delta = other_pos - this_pos;
    let dist_squared = delta.square_length();
    if dist_squared == 0.0 || !dist_squared.is_finite() {
        return None;
    }
    let dist = dist_squared.sqrt();
    let force = grav_constant * this_mass * other_mass / dist_squared;
    let force = delta / dist * force;
    if force.x.is_finite() && force.y.is_finite() && force.z.is_finite() {
        Some(force)
    } else {
        None
    }
}

/// Two days, in seconds.
pub const TIMESTEP: f64 = 60.0 * 60.0 * 24.0 * 2.0;
pub const GRAV_CONSTANT: f64 = 6.67428e-11;
pub const TRAIL_CAPACITY: usize = 2048;
/// One astronomical unit in meters.
pub const AU: f64 = 149.6e6 * 1000.0;

#[cfg(test)]
mod tests {
    use super::*;

    fn sun() -> Orbiter {
        Orbiter(Body::new("Sun", 1.989e30, 20.0, 0xFC9601).anchored(), Kinemat::zero())
    }

    fn planet(x: f64, vy: f64) -> Orbiter {
        Orbiter(
            Body::new("Planet", 5.9722e24, 10.0, 0x6B93D6),
            Kinemat::planar(x, 0.0, 0.0, vy),
        )
    }

    #[test]
    fn rejects_bad_initial_conditions() {
        let mut light = planet(AU, 0.0);
        light.0.mass = 0.0;
        assert_eq!(
            SolarSystem::new(vec![sun(), light], Params::default()).err(),
            Some(SimulationError::NonPositiveMass { index: 1, mass: 0.0 })
        );

        assert_eq!(
            SolarSystem::new(vec![planet(AU, 0.0)], Params::default()).err(),
            Some(SimulationError::NoAnchor)
        );

        let mut second_sun = sun();
        second_sun.1 = Kinemat::planar(AU, 0.0, 0.0, 0.0);
        assert_eq!(
            SolarSystem::new(vec![sun(), second_sun], Params::default()).err(),
            Some(SimulationError::MultipleAnchors { first: 0, second: 1 })
        );

        assert_eq!(
            SolarSystem::new(Vec::new(), Params::default()).err(),
            Some(SimulationError::Empty)
        );

        let params = Params {
            timestep: 0.0,
            ..Params::default()
        };
        assert!(matches!(
            SolarSystem::new(vec![sun()], params),
            Err(SimulationError::InvalidParams(_))
        ));
    }

    #[test]
    fn lone_body_keeps_its_velocity() {
        let mut lonely = sun();
        lonely.1.vel = Vector3D::new(3.0, -4.0, 1.0);
        let mut system = SolarSystem::new(vec![lonely], Params::default()).unwrap();
        system.step().unwrap();
        let view = system.get(0).unwrap();
        assert_eq!(view.kinemat.vel, Vector3D::new(3.0, -4.0, 1.0));
        assert_eq!(view.trail.len(), 1);
    }

    #[test]
    fn step_records_anchor_distance_and_trail() {
        let mut system =
            SolarSystem::new(vec![sun(), planet(AU, 29_783.0)], Params::default()).unwrap();
        assert!((system.get(1).unwrap().distance_to_anchor - AU).abs() < 1.0);
        system.step().unwrap();
        system.step().unwrap();

        let earth = system.get(1).unwrap();
        // The distance recorded is the one measured at the start of the last step.
        assert!((earth.distance_to_anchor - AU).abs() / AU < 1e-3);
        assert_eq!(earth.trail.len(), 2);
        assert_eq!(earth.trail.latest(), Some(&earth.kinemat.pos));
        assert_eq!(system.anchor().distance_to_anchor, 0.0);
        assert_eq!(system.steps(), 2);
        assert_eq!(system.elapsed(), 2.0 * TIMESTEP);
    }

    #[test]
    fn degenerate_step_leaves_state_untouched() {
        let mut system =
            SolarSystem::new(vec![sun(), planet(0.0, 10.0)], Params::default()).unwrap();
        let before = system.orbiters();
        assert_eq!(
            system.step(),
            Err(SimulationError::DegenerateConfiguration { first: 0, second: 1 })
        );
        assert_eq!(system.orbiters(), before);
        assert_eq!(system.steps(), 0);
        assert!(system.get(1).unwrap().trail.is_empty());
    }

    #[test]
    fn non_finite_starting_state_is_rejected() {
        let mut lost = planet(AU, 0.0);
        lost.1.vel.x = f64::NAN;
        assert_eq!(
            SolarSystem::new(vec![sun(), lost], Params::default()).err(),
            Some(SimulationError::NonFiniteState { index: 1 })
        );

        let mut far = planet(AU, 0.0);
        far.1.pos.z = f64::INFINITY;
        assert_eq!(
            SolarSystem::new(vec![far, sun()], Params::default()).err(),
            Some(SimulationError::NonFiniteState { index: 0 })
        );
    }

    #[test]
    fn step_that_would_overflow_position_is_refused() {
        // Finite now, but one step at this speed lands past f64::MAX.
        let mut system =
            SolarSystem::new(vec![sun(), planet(AU, 1.0e305)], Params::default()).unwrap();
        let before = system.orbiters();
        assert_eq!(
            system.step(),
            Err(SimulationError::NonFiniteState { index: 1 })
        );
        assert_eq!(system.orbiters(), before);
        assert_eq!(system.steps(), 0);
        assert!(system.get(0).unwrap().trail.is_empty());
    }

    #[test]
    fn overflowing_force_is_not_called_coincident() {
        let mut heavy = planet(AU, 0.0);
        heavy.0.mass = 1.0e300;
        let mut sun = sun();
        sun.0.mass = 1.0e300;
        let mut system = SolarSystem::new(vec![sun, heavy], Params::default()).unwrap();
        assert_eq!(
            system.step(),
            Err(SimulationError::ForceOverflow { first: 0, second: 1 })
        );
        assert_eq!(system.steps(), 0);
    }

    #[test]
    fn attraction_points_at_the_other_body() {
        let f = attraction(
            1.0,
            2.0,
            Point3D::new(0.0, 0.0, 0.0),
            3.0,
            Point3D::new(0.0, 0.0, 2.0),
        )
        .unwrap();
        // 1 * 2 * 3 / 4
        assert!((f.z - 1.5).abs() < 1e-12);
        assert_eq!(f.x, 0.0);
        assert_eq!(f.y, 0.0);

        assert!(attraction(1.0, 1.0, Point3D::origin(), 1.0, Point3D::origin()).is_none());
    }

    #[test]
    fn trail_capacity_comes_from_params() {
        let params = Params {
            trail_capacity: 4,
            ..Params::default()
        };
        let mut system = SolarSystem::new(vec![sun(), planet(AU, 29_783.0)], params).unwrap();
        for _ in 0..10 {
            system.step().unwrap();
        }
        assert_eq!(system.get(1).unwrap().trail.len(), 4);
        assert_eq!(system.get(1).unwrap().trail.capacity(), 4);
    }
}
