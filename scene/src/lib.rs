//! Everything between the physics and the screen:
//! the camera, projecting bodies onto the viewport, reacting to input,
//! and running one frame at a time.
//!
//! Nothing in here knows about windows. Input comes in as a [`FrameInput`],
//! and drawing goes out through a [`Renderer`].

pub mod camera;
pub mod controls;
pub mod projector;
pub mod render;
pub mod settings;
pub mod simulation;

pub use camera::{Camera, PerspectiveCamera, PlanarCamera};
pub use controls::{Button, Controller, FrameInput, InputEvent, Key};
pub use projector::Projector;
pub use render::{DrawCommand, DrawList, Renderer};
pub use settings::{CameraSettings, ProjectionMode, Viewport};
pub use simulation::{Flow, Simulation, SimulationContext, Toggles};
