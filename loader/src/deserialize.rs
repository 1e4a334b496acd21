//! Lets you load a SolarSystem from a file.

use crate::builder::{MoonSwarm, SolarSystemBuilder, SolarSystemBuilderEntry as SSBE};
use euclid::default::{Point3D, Vector3D};
use log::info;
use serde::Deserialize;
use simulator::{bodies, Params, SimulationError, SolarSystem};

use std::collections::HashMap;
use std::fmt;

/// A point or a vector. Two components means z = 0.
#[derive(Deserialize)]
#[serde(transparent)]
struct Vec3D(Vec<f64>);

impl Vec3D {
    fn to_vector(&self) -> Result<Vector3D<f64>, LoadError> {
        match self.0[..] {
            [x, y] => Ok(Vector3D::new(x, y, 0.0)),
            [x, y, z] => Ok(Vector3D::new(x, y, z)),
            _ => Err(LoadError::BadVector { len: self.0.len() }),
        }
    }

    fn to_point(&self) -> Result<Point3D<f64>, LoadError> {
        self.to_vector().map(|v| v.to_point())
    }
}

/// A point in space with children in relation to it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Orbiter {
        body: Body,
        pos: Vec3D,
        #[serde(default)]
        vel: Option<Vec3D>,
        #[serde(default)]
        anchor: bool,
        #[serde(default)]
        children: Vec<Entry>,
    },
    Locus(Locus),
    Moons(Moons),
}

/// Unknown fields are refused so a malformed orbiter can't pass for a locus.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Locus {
    pos: Vec3D,
    #[serde(default)]
    children: Vec<Entry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Moons {
    count: usize,
    min_mass: f64,
    max_mass: f64,
    min_orbit: f64,
    max_orbit: f64,
    #[serde(default)]
    seed: u64,
    #[serde(default)]
    clockwise: bool,
}

/// A Body in space
#[derive(Deserialize)]
#[serde(untagged)]
enum Body {
    Prefab(String), // A pre-made pre-defined Body
    Custom {
        name: String,
        mass: f64,
        radius: f64,
        color: u32,
    },
}

/// Overrides for the simulation parameters. Anything left out keeps its default.
#[derive(Deserialize, Default)]
struct RawParams {
    timestep: Option<f64>,
    grav_constant: Option<f64>,
    trail_capacity: Option<usize>,
}

#[derive(Deserialize)]
struct RawSolarSystem {
    #[serde(default)]
    params: RawParams,
    bodies: Vec<Entry>,
}

/// The ingredients for a solar system, fresh out of a file.
#[derive(Clone, Debug)]
pub struct LoadedSystem {
    pub orbiters: Vec<bodies::Orbiter>,
    pub params: Params,
}

impl LoadedSystem {
    /// Check the ingredients and bake them into a SolarSystem.
    pub fn build(self) -> Result<SolarSystem, LoadError> {
        SolarSystem::new(self.orbiters, self.params).map_err(LoadError::Invalid)
    }
}

#[derive(Debug)]
pub enum LoadError {
    /// The file isn't json5, or isn't shaped like a solar system.
    Parse(json5::Error),
    /// Somebody asked for a prefab body that doesn't exist.
    UnknownPrefab(String),
    /// Vectors must have 2 or 3 components.
    BadVector { len: usize },
    /// A min/max pair that isn't `0 < min <= max`.
    BadRange { what: &'static str, min: f64, max: f64 },
    /// Parsed fine, but the bodies make no sense together.
    Invalid(SimulationError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(e) => write!(f, "couldn't parse the system file: {}", e),
            LoadError::UnknownPrefab(id) => write!(f, "no prefab body named {}", id),
            LoadError::BadVector { len } => {
                write!(f, "vectors need 2 or 3 components, found {}", len)
            }
            LoadError::BadRange { what, min, max } => write!(
                f,
                "{} range must satisfy 0 < min <= max, got {} to {}",
                what, min, max
            ),
            LoadError::Invalid(e) => write!(f, "invalid initial conditions: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Parse(e) => Some(e),
            LoadError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<json5::Error> for LoadError {
    fn from(e: json5::Error) -> Self {
        LoadError::Parse(e)
    }
}

/// Loads a file and returns the ingredients for a solar system.
pub fn load(contents: &str) -> Result<LoadedSystem, LoadError> {
    let raw: RawSolarSystem = json5::from_str(contents)?;

    let defaults = Params::default();
    let params = Params {
        timestep: raw.params.timestep.unwrap_or(defaults.timestep),
        grav_constant: raw.params.grav_constant.unwrap_or(defaults.grav_constant),
        trail_capacity: raw.params.trail_capacity.unwrap_or(defaults.trail_capacity),
    };

    let mut builder = SolarSystemBuilder::new();
    builder.grav_constant(params.grav_constant);
    for root in raw.bodies {
        builder.add(do_one_level(root)?);
    }
    let orbiters = builder.construct();
    info!("Loaded {} bodies", orbiters.len());

    Ok(LoadedSystem { orbiters, params })
}

/// Loads a file straight into a ready-to-run SolarSystem.
pub fn load_system(contents: &str) -> Result<SolarSystem, LoadError> {
    load(contents)?.build()
}

/// Helper function to DFS convert from serde to real
fn do_one_level(entry: Entry) -> Result<SSBE, LoadError> {
    Ok(match entry {
        Entry::Locus(Locus { pos, children }) => {
            SSBE::new_locus(pos.to_point()?).add_bulk(convert_children(children)?)
        }
        Entry::Orbiter {
            body,
            pos,
            vel,
            anchor,
            children,
        } => {
            let mut body = match body {
                Body::Prefab(id) => get_body_from_id(&id)?,
                Body::Custom {
                    name,
                    mass,
                    radius,
                    color,
                } => bodies::Body::new(name, mass, radius, color),
            };
            // Prefabs can come pre-anchored (the sun); custom bodies need to ask.
            body.anchor |= anchor;
            let vel = match vel {
                Some(vel) => vel.to_vector()?,
                None => Vector3D::zero(),
            };
            SSBE::new_parts(body, bodies::Kinemat::new(pos.to_point()?, vel))
                .add_bulk(convert_children(children)?)
        }
        Entry::Moons(Moons {
            count,
            min_mass,
            max_mass,
            min_orbit,
            max_orbit,
            seed,
            clockwise,
        }) => {
            check_range("moon mass", min_mass, max_mass)?;
            check_range("moon orbit", min_orbit, max_orbit)?;
            SSBE::Moons(MoonSwarm {
                count,
                min_mass,
                max_mass,
                min_orbit,
                max_orbit,
                seed,
                clockwise,
            })
        }
    })
}

/// Ranges need `0 < min <= max`, all finite.
fn check_range(what: &'static str, min: f64, max: f64) -> Result<(), LoadError> {
    if min > 0.0 && min <= max && max.is_finite() {
        Ok(())
    } else {
        Err(LoadError::BadRange { what, min, max })
    }
}

fn convert_children(children: Vec<Entry>) -> Result<Vec<SSBE>, LoadError> {
    children.into_iter().map(do_one_level).collect()
}

/// Gets a premade Body from a string
fn get_body_from_id(id: &str) -> Result<bodies::Body, LoadError> {
    use crate::prefabs;

    macro_rules! maker {
        (
            $($name:ident),*
        ) => {
            {
                let mut h: HashMap<&'static str, fn() -> bodies::Body> = HashMap::new();
                $( h.insert(stringify!($name), prefabs::bodies::$name); )*
                h
            }
        };
    }

    lazy_static! {
        static ref BODIES: HashMap<&'static str, fn() -> bodies::Body> = maker![
            sun, mercury, venus, earth, mars, jupiter, saturn, uranus, neptune
        ];
    }

    BODIES
        .get(id)
        .map(|make| make())
        .ok_or_else(|| LoadError::UnknownPrefab(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: &str = r#"{
        // Trails don't need to be long for this.
        params: { trail_capacity: 16 },
        bodies: [
            {
                body: "sun",
                pos: [0, 0],
                children: [
                    { body: "earth", pos: [-1.496e11, 0], vel: [0, 29783] },
                    {
                        body: { name: "Rock", mass: 1e20, radius: 3, color: 0x888888 },
                        pos: [2e11, 0, 1e9],
                        vel: [0, -25000, 0],
                        children: [
                            { count: 3, min_mass: 1e15, max_mass: 1e16, min_orbit: 1e7, max_orbit: 2e7, seed: 4 },
                        ],
                    },
                ],
            },
        ],
    }"#;

    #[test]
    fn loads_nested_system() {
        let loaded = load(SYSTEM).unwrap();
        assert_eq!(loaded.params.trail_capacity, 16);
        assert_eq!(loaded.params.timestep, simulator::TIMESTEP);
        assert_eq!(loaded.orbiters.len(), 6);

        let rock = &loaded.orbiters[2];
        assert_eq!(rock.0.name, "Rock");
        assert_eq!(rock.1.pos, Point3D::new(2e11, 0.0, 1e9));
        assert_eq!(rock.1.vel, Vector3D::new(0.0, -25000.0, 0.0));

        let system = loaded.build().unwrap();
        assert_eq!(system.anchor().body.name, "Sun");
        assert_eq!(system.len(), 6);
    }

    #[test]
    fn bundled_system_loads() {
        let system = load_system(include_str!("../../systems/sol.json5")).unwrap();
        // Sun, four planets, Big Blue and its eight moons
        assert_eq!(system.len(), 14);
        assert_eq!(system.params().trail_capacity, 1024);
    }

    #[test]
    fn unknown_prefab_is_an_error() {
        let err = load(r#"{ bodies: [ { body: "vulcan", pos: [0, 0] } ] }"#).unwrap_err();
        assert!(matches!(err, LoadError::UnknownPrefab(ref id) if id == "vulcan"));
    }

    #[test]
    fn vectors_need_two_or_three_components() {
        let err = load(r#"{ bodies: [ { body: "sun", pos: [0, 0, 0, 0] } ] }"#).unwrap_err();
        assert!(matches!(err, LoadError::BadVector { len: 4 }));
    }

    #[test]
    fn two_anchors_are_rejected_when_building() {
        let loaded = load(
            r#"{ bodies: [
                { body: "sun", pos: [0, 0] },
                { body: "earth", pos: [1e11, 0], anchor: true },
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            loaded.build(),
            Err(LoadError::Invalid(SimulationError::MultipleAnchors {
                first: 0,
                second: 1
            }))
        ));
    }

    #[test]
    fn moon_ranges_must_be_positive_and_ordered() {
        let moons = |orbits: &str| {
            load(&format!(
                r#"{{ bodies: [ {{ body: "earth", pos: [0, 0], anchor: true, children: [
                    {{ count: 2, min_mass: 1e18, max_mass: 1e19, {} }},
                ] }} ] }}"#,
                orbits
            ))
        };
        assert!(matches!(
            moons("min_orbit: -1e9, max_orbit: -1e9"),
            Err(LoadError::BadRange { what: "moon orbit", .. })
        ));
        assert!(matches!(
            moons("min_orbit: 4e8, max_orbit: 1e8"),
            Err(LoadError::BadRange { what: "moon orbit", .. })
        ));
        assert_eq!(
            moons("min_orbit: 1e8, max_orbit: 1e8").unwrap().orbiters.len(),
            3
        );

        let err = load(
            r#"{ bodies: [ { body: "earth", pos: [0, 0], anchor: true, children: [
                { count: 2, min_mass: 0, max_mass: 1e19, min_orbit: 1e8, max_orbit: 2e8 },
            ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::BadRange { what: "moon mass", .. }));
    }

    #[test]
    fn misspelled_body_field_is_an_error_not_a_locus() {
        let err = load(
            r#"{ bodies: [
                { body: "sun", pos: [0, 0] },
                { body: { name: "Rock", mass: 1e20, radius: 3, colour: 0x888888 }, pos: [1e11, 0] },
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)), "{}", err);

        // A real locus still loads
        let loaded = load(
            r#"{ bodies: [ { pos: [1e11, 0], children: [ { body: "sun", pos: [0, 0] } ] } ] }"#,
        )
        .unwrap();
        assert_eq!(loaded.orbiters.len(), 1);
        assert_eq!(loaded.orbiters[0].1.pos, Point3D::new(1e11, 0.0, 0.0));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(load("not a system"), Err(LoadError::Parse(_))));
    }
}
