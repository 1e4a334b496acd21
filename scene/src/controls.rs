//! Input coming in from whatever owns the window, and what it does to the camera.

use crate::camera::Camera;
use crate::settings::{CameraSettings, Viewport};
use crate::simulation::{Flow, Toggles};

use euclid::default::{Point2D, Point3D, Vector2D, Vector3D};
use log::debug;

use std::collections::HashSet;

/// The keys the simulation cares about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    /// Pause
    Space,
    /// Distances
    Tab,
    /// Trails
    CapsLock,
    /// Recenter
    C,
    /// Quit
    X,
    /// Also quit
    Escape,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Usually the left button
    Primary,
    Middle,
    /// Usually the right button
    Secondary,
}

/// Something that happened since last frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    ButtonDown { button: Button, pos: Point2D<f64> },
    ButtonUp { button: Button },
    KeyDown(Key),
    /// The window wants to close.
    Quit,
}

/// Everything the input side knows about one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Discrete events, oldest first
    pub events: Vec<InputEvent>,
    /// Where the pointer is now
    pub pointer: Point2D<f64>,
    /// Whether the pointer is over the window at all.
    /// Edge scrolling only happens while it is.
    pub pointer_inside: bool,
    /// Keys held down right now
    pub held: HashSet<Key>,
}

impl FrameInput {
    /// Input with the pointer over the window at `pointer`.
    pub fn new(pointer: Point2D<f64>) -> Self {
        Self {
            pointer,
            pointer_inside: true,
            ..Self::default()
        }
    }

    pub fn event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn holding(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Remembers which buttons are down and where the pointer was,
/// so drags can be turned into per-frame deltas.
#[derive(Clone, Debug, Default)]
pub struct Controller {
    dragging: HashSet<Button>,
    last_pointer: Point2D<f64>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self, button: Button) -> bool {
        self.dragging.contains(&button)
    }

    /// Apply one frame of input to the camera and toggles.
    /// `anchor` is where the anchor body is in the world, for recentering.
    pub fn apply(
        &mut self,
        input: &FrameInput,
        camera: &mut Camera,
        toggles: &mut Toggles,
        settings: &CameraSettings,
        viewport: Viewport,
        anchor: Point3D<f64>,
    ) -> Flow {
        let mut flow = Flow::Continue;
        for event in &input.events {
            match *event {
                InputEvent::Quit | InputEvent::KeyDown(Key::X) | InputEvent::KeyDown(Key::Escape) => {
                    flow = Flow::Quit
                }
                InputEvent::KeyDown(Key::Space) => {
                    toggles.paused = !toggles.paused;
                    debug!("Paused: {}", toggles.paused);
                }
                InputEvent::KeyDown(Key::Tab) => {
                    toggles.show_distances = !toggles.show_distances;
                    debug!("Showing distances: {}", toggles.show_distances);
                }
                InputEvent::KeyDown(Key::CapsLock) => {
                    toggles.show_trails = !toggles.show_trails;
                    debug!("Showing trails: {}", toggles.show_trails);
                }
                InputEvent::KeyDown(Key::C) => {
                    if let Camera::Planar(cam) = &mut *camera {
                        cam.recenter_on(anchor);
                        debug!("Recentered on the anchor");
                    }
                }
                // Held keys are read from `held` instead
                InputEvent::KeyDown(_) => {}
                InputEvent::ButtonDown { button, pos } => {
                    self.dragging.insert(button);
                    self.last_pointer = pos;
                }
                InputEvent::ButtonUp { button } => {
                    self.dragging.remove(&button);
                }
            }
        }

        let delta = input.pointer - self.last_pointer;
        self.last_pointer = input.pointer;

        match camera {
            Camera::Perspective(cam) => {
                if self.is_dragging(Button::Primary) {
                    cam.rotate(delta.x, delta.y, settings.rotation_speed);
                }
                if self.is_dragging(Button::Middle) {
                    cam.pan(delta.x, delta.y, settings.pan_speed);
                }
                if self.is_dragging(Button::Secondary) {
                    cam.zoom(delta.y, settings.zoom_speed);
                }

                let step = settings.move_speed;
                let mut movement = Vector3D::zero();
                if input.is_held(Key::W) {
                    movement.y += step;
                }
                if input.is_held(Key::S) {
                    movement.y -= step;
                }
                if input.is_held(Key::A) {
                    movement.x -= step;
                }
                if input.is_held(Key::D) {
                    movement.x += step;
                }
                cam.translate(movement);
            }
            Camera::Planar(cam) => {
                if self.is_dragging(Button::Middle) {
                    cam.rotate(delta.x, settings.rotation_speed);
                }
                if self.is_dragging(Button::Secondary) {
                    cam.zoom(delta.y, settings.planar_zoom_speed);
                }

                // Pushing the pointer against an edge counts as holding that direction
                let pointer = input.pointer;
                let edge = input.pointer_inside;
                let step = settings.planar_pan_step;
                let mut pan = Vector2D::zero();
                if input.is_held(Key::A) || (edge && pointer.x <= 0.0) {
                    pan.x += step;
                }
                if input.is_held(Key::D) || (edge && pointer.x >= viewport.width - 1.0) {
                    pan.x -= step;
                }
                if input.is_held(Key::W) || (edge && pointer.y <= 0.0) {
                    pan.y += step;
                }
                if input.is_held(Key::S) || (edge && pointer.y >= viewport.height - 1.0) {
                    pan.y -= step;
                }
                cam.pan_by(pan);
            }
        }

        flow
    }
}
