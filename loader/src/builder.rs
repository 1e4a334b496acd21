//! Lets you construct solar systems with nested orbiting more easily.

use euclid::default::{Point3D, Vector3D};
use log::warn;
use simulator::bodies::*;

/// Use this struct to construct a solar system easily
pub struct SolarSystemBuilder {
    /// The stuff in the solar system
    entries: Vec<SolarSystemBuilderEntry>,
    /// Used to work out circular orbit speeds for generated moons.
    grav_constant: f64,
}

impl Default for SolarSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolarSystemBuilder {
    /// Make a new empty Builder.
    pub fn new() -> Self {
        SolarSystemBuilder {
            entries: Vec::new(),
            grav_constant: simulator::GRAV_CONSTANT,
        }
    }

    /// Use a different gravitational constant when working out orbit speeds.
    pub fn grav_constant(&mut self, grav_constant: f64) -> &mut Self {
        self.grav_constant = grav_constant;
        self
    }

    /// Add an entry to the Builder.
    pub fn add(&mut self, ssbe: SolarSystemBuilderEntry) -> &mut Self {
        self.entries.push(ssbe);
        self
    }

    /// Calculates the absolute positions and velocities of all entries, and returns them as a Vec
    /// suitable for passing to SolarSystem::new().
    pub fn construct(&mut self) -> Vec<Orbiter> {
        let mut out: Vec<Orbiter> = Vec::new();
        // Drain will remove the stuff from the entries
        for base_entry in self.entries.drain(..) {
            // Always base it on (0, 0, 0)
            out.append(&mut construct_one_level(
                base_entry,
                self.grav_constant,
                0.0,
                Point3D::origin(),
                Vector3D::zero(),
            ));
        }

        out
    }
}

/// Inner function for construct()'s recursion.
fn construct_one_level(
    entry: SolarSystemBuilderEntry,
    grav_constant: f64,
    parent_mass: f64,
    parent_pos: Point3D<f64>,
    parent_vel: Vector3D<f64>,
) -> Vec<Orbiter> {
    use SolarSystemBuilderEntry as SSBE;
    let mut out: Vec<Orbiter> = Vec::new();

    match entry {
        SSBE::Orbit(Orbiter(body, kmat), children) => {
            let pos = parent_pos + kmat.pos.to_vector();
            let vel = parent_vel + kmat.vel;
            let mass = body.mass;
            out.push(Orbiter(body, Kinemat::new(pos, vel)));
            for child in children {
                out.append(&mut construct_one_level(
                    child,
                    grav_constant,
                    mass,
                    pos,
                    vel,
                ));
            }
        }

        SSBE::Locus(point, children) => {
            // Mass is NOT carried over.
            let pos = parent_pos + point.to_vector();
            for child in children {
                out.append(&mut construct_one_level(
                    child,
                    grav_constant,
                    0.0,
                    pos,
                    parent_vel,
                ));
            }
        }

        SSBE::Moons(swarm) => {
            out.extend(swarm.generate(grav_constant, parent_mass, parent_pos, parent_vel));
        }
    };

    out
}

/// A seeded handful of moons on circular orbits in the xy-plane around whatever they're attached to.
#[derive(Clone, Debug, PartialEq)]
pub struct MoonSwarm {
    pub count: usize,
    pub min_mass: f64,
    pub max_mass: f64,
    pub min_orbit: f64,
    pub max_orbit: f64,
    pub seed: u64,
    pub clockwise: bool,
}

impl MoonSwarm {
    fn generate(
        &self,
        grav_constant: f64,
        parent_mass: f64,
        parent_pos: Point3D<f64>,
        parent_vel: Vector3D<f64>,
    ) -> Vec<Orbiter> {
        use rand::{rngs::SmallRng, Rng, SeedableRng};
        use std::f64::consts::TAU;

        let mut rand = SmallRng::seed_from_u64(self.seed);

        // Generate the prefix name for the moon system
        const MOON_SYSTEM_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ1234567890";
        let system_name: String = std::iter::once('M')
            .chain((0..rand.gen_range(3..6)).map(|_| {
                MOON_SYSTEM_CHARS[rand.gen_range(0..MOON_SYSTEM_CHARS.len())] as char
            }))
            .collect();

        (0..self.count)
            .map(|num| {
                let mass = sample(&mut rand, self.min_mass, self.max_mass);
                let orbit = sample(&mut rand, self.min_orbit, self.max_orbit);
                let theta = rand.gen_range(0.0..TAU);

                // Do some math for a circular orbit
                let speed = (grav_constant * (mass + parent_mass) / orbit).sqrt()
                    * if self.clockwise { -1.0 } else { 1.0 };
                let offset = Vector3D::new(theta.cos(), theta.sin(), 0.0) * orbit;
                // Perpendicular to the offset
                let vel = Vector3D::new(-theta.sin(), theta.cos(), 0.0) * speed;

                Orbiter(
                    Body::new(
                        format!("{}-{}", system_name, num),
                        mass,
                        MOON_RADIUS,
                        MOON_COLOR,
                    ),
                    Kinemat::new(parent_pos + offset, parent_vel + vel),
                )
            })
            .collect()
    }
}

/// `gen_range` panics on an empty range, so a degenerate range just gives its bottom.
fn sample<R: rand::Rng>(rand: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rand.gen_range(min..max)
    } else {
        min
    }
}

const MOON_RADIUS: f64 = 2.0;
const MOON_COLOR: u32 = 0x5566bb; // dark gray-blue

/// One entry in a SolarSystemBuilder
#[derive(Clone, Debug, PartialEq)]
pub enum SolarSystemBuilderEntry {
    /// Orbiters have an orbiter associated with them, and have children.
    /// The orbiter's kinemat is relative to its parent.
    Orbit(Orbiter, Vec<SolarSystemBuilderEntry>),
    /// Loci only consider the position, and no Orbiter is added to the SolarSystem because of it.
    /// Still has children.
    Locus(Point3D<f64>, Vec<SolarSystemBuilderEntry>),
    /// Builds a bunch of moons around the parent.
    Moons(MoonSwarm),
}

impl SolarSystemBuilderEntry {
    /// Create a new SolarSystemBuilderEntry::Orbit
    pub fn new(orbiter: Orbiter) -> Self {
        SolarSystemBuilderEntry::Orbit(orbiter, Vec::new())
    }

    /// Create a new SolarSystemBuilderEntry::Orbit from a Body and a Kinemat
    pub fn new_parts(body: Body, kmat: Kinemat) -> SolarSystemBuilderEntry {
        SolarSystemBuilderEntry::Orbit(Orbiter(body, kmat), Vec::new())
    }

    /// Create a new SolarSystemBuilderEntry::Locus
    /// This can be useful if you want to center things around a locus
    /// without attaching a body.
    pub fn new_locus(pos: Point3D<f64>) -> SolarSystemBuilderEntry {
        SolarSystemBuilderEntry::Locus(pos, Vec::new())
    }

    /// Add another SolarSystemBuilderEntry as a child of this one.
    /// Returns itself so you can keep chaining it.
    pub fn add(self, child: Self) -> Self {
        self.add_bulk(std::iter::once(child))
    }

    /// Add a whole bunch of SolarSystemBuilderEntries as children of this one.
    /// Consumes the children.
    ///
    /// Only orbits and loci have children. Children given to a moon swarm are dropped
    /// with a warning (and trip a debug assertion).
    pub fn add_bulk<T: IntoIterator<Item = Self>>(mut self, new_children: T) -> Self {
        match &mut self {
            SolarSystemBuilderEntry::Orbit(_, kids) | SolarSystemBuilderEntry::Locus(_, kids) => {
                kids.extend(new_children)
            }
            SolarSystemBuilderEntry::Moons(_) => {
                let dropped = new_children.into_iter().count();
                debug_assert!(dropped == 0, "moon swarms can't have children");
                if dropped > 0 {
                    warn!("Dropping {} children given to a moon swarm", dropped);
                }
            }
        }
        self
    }
}
