//! The frame loop: input, camera, physics, then drawing.

use crate::camera::Camera;
use crate::controls::{Controller, FrameInput};
use crate::projector::Projector;
use crate::render::Renderer;
use crate::settings::{CameraSettings, ProjectionMode, Viewport};

use euclid::default::Vector2D;
use simulator::{SimulationError, SolarSystem};

/// Whether to keep going after this frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The on/off switches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Toggles {
    pub paused: bool,
    pub show_distances: bool,
    pub show_trails: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            paused: false,
            show_distances: false,
            show_trails: true,
        }
    }
}

/// Everything about the view that isn't the bodies themselves.
#[derive(Clone, Debug)]
pub struct SimulationContext {
    pub viewport: Viewport,
    pub camera: Camera,
    pub settings: CameraSettings,
    pub toggles: Toggles,
}

impl SimulationContext {
    pub fn new(mode: ProjectionMode, settings: CameraSettings, viewport: Viewport) -> Self {
        Self {
            viewport,
            camera: Camera::new(mode, &settings),
            settings,
            toggles: Toggles::default(),
        }
    }
}

/// Owns the bodies and the view for as long as the program runs.
pub struct Simulation {
    system: SolarSystem,
    context: SimulationContext,
    controller: Controller,
}

impl Simulation {
    pub fn new(system: SolarSystem, context: SimulationContext) -> Self {
        Self {
            system,
            context,
            controller: Controller::new(),
        }
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.context.viewport = viewport;
    }

    /// Run one frame.
    /// If the physics refuses to step, the error comes back and the bodies are left as they were.
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        input: &FrameInput,
        renderer: &mut R,
    ) -> Result<Flow, SimulationError> {
        let ctx = &mut self.context;
        let flow = self.controller.apply(
            input,
            &mut ctx.camera,
            &mut ctx.toggles,
            &ctx.settings,
            ctx.viewport,
            self.system.anchor_position(),
        );
        if flow == Flow::Quit {
            return Ok(Flow::Quit);
        }

        if !ctx.toggles.paused {
            self.system.step()?;
        }

        self.draw(renderer);
        Ok(Flow::Continue)
    }

    /// Emit draw calls for every body: trail underneath, then the body, then its label.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        let ctx = &self.context;
        let projector = Projector::new(&ctx.camera, ctx.viewport, self.system.anchor_position());

        for view in self.system.iter() {
            let color = view.body.color;
            let is_anchor = view.is_anchor();

            if ctx.toggles.show_trails && view.trail.len() > 2 {
                let points = projector.project_trail(view.trail, is_anchor);
                if points.len() > 1 {
                    renderer.polyline(&points, color);
                }
            }

            let center = match projector.project(view.kinemat.pos, is_anchor) {
                Some(center) => center,
                // Behind the camera
                None => continue,
            };
            renderer.circle(center, projector.radius(view.body.radius), color);

            if ctx.toggles.show_distances && !is_anchor {
                let light_years = view.distance_to_anchor * LIGHT_YEARS_PER_METER;
                renderer.text(
                    center + Vector2D::new(0.0, -LABEL_OFFSET),
                    &format!("{:.8} ly", light_years),
                    LABEL_COLOR,
                );
            }
        }
    }
}

const LIGHT_YEARS_PER_METER: f64 = 1.057e-16;
/// Pixels above the body
const LABEL_OFFSET: f64 = 20.0;
const LABEL_COLOR: u32 = 0xFFFFFF;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{InputEvent, Key};
    use crate::render::{DrawCommand, DrawList};

    use euclid::default::{Point2D, Point3D};
    use simulator::bodies::{Body, Kinemat, Orbiter};
    use simulator::{Params, AU};

    fn system() -> SolarSystem {
        SolarSystem::new(
            vec![
                Orbiter(
                    Body::new("Sun", 1.989e30, 20.0, 0xFC9601).anchored(),
                    Kinemat::zero(),
                ),
                Orbiter(
                    Body::new("Earth", 5.9722e24, 10.0, 0x6B93D6),
                    Kinemat::planar(-AU, 0.0, 0.0, 29_783.0),
                ),
            ],
            Params::default(),
        )
        .unwrap()
    }

    fn simulation(mode: ProjectionMode) -> Simulation {
        Simulation::new(
            system(),
            SimulationContext::new(mode, CameraSettings::default(), Viewport::new(800.0, 600.0)),
        )
    }

    fn idle() -> FrameInput {
        FrameInput::new(Point2D::new(400.0, 300.0))
    }

    fn count(list: &DrawList, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        list.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn each_frame_steps_once_and_draws_every_body() {
        let mut sim = simulation(ProjectionMode::Planar);
        let mut list = DrawList::new();
        assert_eq!(sim.frame(&idle(), &mut list), Ok(Flow::Continue));
        assert_eq!(sim.system().steps(), 1);
        assert_eq!(
            count(&list, |c| matches!(c, DrawCommand::Circle { .. })),
            2
        );
        // Not enough history for trails yet, and distances start hidden
        assert_eq!(count(&list, |c| !matches!(c, DrawCommand::Circle { .. })), 0);

        match &list.commands[0] {
            DrawCommand::Circle { radius, color, .. } => {
                assert_eq!(*radius, 20.0);
                assert_eq!(*color, 0xFC9601);
            }
            other => panic!("expected the sun first, got {:?}", other),
        }
    }

    #[test]
    fn paused_frames_draw_without_stepping() {
        let mut sim = simulation(ProjectionMode::Planar);
        let mut list = DrawList::new();
        let pause = idle().event(InputEvent::KeyDown(Key::Space));
        sim.frame(&pause, &mut list).unwrap();
        for _ in 0..5 {
            list.clear();
            sim.frame(&idle(), &mut list).unwrap();
        }
        assert_eq!(sim.system().steps(), 0);
        assert_eq!(
            count(&list, |c| matches!(c, DrawCommand::Circle { .. })),
            2
        );
    }

    #[test]
    fn trails_and_labels_show_up() {
        let mut sim = simulation(ProjectionMode::Planar);
        let mut list = DrawList::new();
        sim.frame(&idle().event(InputEvent::KeyDown(Key::Tab)), &mut list)
            .unwrap();
        for _ in 0..3 {
            list.clear();
            sim.frame(&idle(), &mut list).unwrap();
        }

        // Both bodies have moved, so both get a line
        assert_eq!(
            count(&list, |c| matches!(c, DrawCommand::Polyline { .. })),
            2
        );
        let labels: Vec<&str> = list
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        // Only Earth gets one, about 1.58e-5 ly out
        let earth = sim.system().get(1).unwrap().distance_to_anchor;
        assert_eq!(labels, vec![format!("{:.8} ly", earth * LIGHT_YEARS_PER_METER)]);
        assert!(labels[0].starts_with("0.000015"), "{}", labels[0]);

        // Hide the trails again
        list.clear();
        sim.frame(&idle().event(InputEvent::KeyDown(Key::CapsLock)), &mut list)
            .unwrap();
        assert_eq!(
            count(&list, |c| matches!(c, DrawCommand::Polyline { .. })),
            0
        );
    }

    #[test]
    fn bodies_behind_the_perspective_camera_are_skipped() {
        let mut settings = CameraSettings::default();
        // Sitting between the sun and earth, looking away from the earth
        settings.position = Point3D::new(-100.0, 0.0, 0.0);
        settings.look_at = Point3D::new(100.0, 0.0, 0.0);
        let mut sim = Simulation::new(
            system(),
            SimulationContext::new(
                ProjectionMode::Perspective,
                settings,
                Viewport::new(800.0, 600.0),
            ),
        );
        let mut list = DrawList::new();
        sim.frame(&idle(), &mut list).unwrap();
        assert_eq!(
            count(&list, |c| matches!(c, DrawCommand::Circle { .. })),
            1
        );
    }

    #[test]
    fn degenerate_system_fails_the_frame() {
        let system = SolarSystem::new(
            vec![
                Orbiter(Body::new("A", 1.0e30, 5.0, 0).anchored(), Kinemat::zero()),
                Orbiter(Body::new("B", 1.0e30, 5.0, 0), Kinemat::zero()),
            ],
            Params::default(),
        )
        .unwrap();
        let mut sim = Simulation::new(
            system,
            SimulationContext::new(
                ProjectionMode::Planar,
                CameraSettings::default(),
                Viewport::new(800.0, 600.0),
            ),
        );
        let mut list = DrawList::new();
        assert_eq!(
            sim.frame(&idle(), &mut list),
            Err(SimulationError::DegenerateConfiguration { first: 0, second: 1 })
        );
        assert!(list.commands.is_empty());
    }

    #[test]
    fn quitting_skips_the_step() {
        let mut sim = simulation(ProjectionMode::Planar);
        let mut list = DrawList::new();
        let quit = idle().event(InputEvent::Quit);
        assert_eq!(sim.frame(&quit, &mut list), Ok(Flow::Quit));
        assert_eq!(sim.system().steps(), 0);
    }
}
