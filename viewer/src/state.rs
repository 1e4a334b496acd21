//! Handles the state for the viewer.

use crate::render::GgezRenderer;

use euclid::default::Point2D;
use ggez::event::{EventHandler, MouseButton};
use ggez::glam::Vec2;
use ggez::graphics::{self, Color, DrawParam, Rect, Text};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{Context, GameError, GameResult};
use log::{error, info};
use scene::{
    Button, DrawList, Flow, FrameInput, InputEvent, Key, ProjectionMode, Simulation, Viewport,
};
use simulator::SimulationError;

/// Everything the window needs between frames.
pub struct State {
    simulation: Simulation,
    /// Events since the last simulation frame
    pending: Vec<InputEvent>,
    /// What the last simulation frame drew
    draw_list: DrawList,
    /// ggez keeps reporting a position while the pointer is elsewhere
    pointer_inside: bool,
}

impl State {
    pub fn new(simulation: Simulation) -> Self {
        State {
            simulation,
            pending: Vec::new(),
            draw_list: DrawList::new(),
            pointer_inside: false,
        }
    }

    /// Hand over everything that happened since last time.
    fn take_input(&mut self, ctx: &Context) -> FrameInput {
        let pointer = ctx.mouse.position();
        let mut input = FrameInput::new(Point2D::new(pointer.x as f64, pointer.y as f64));
        input.pointer_inside = self.pointer_inside;
        input.events = std::mem::take(&mut self.pending);
        for (code, key) in HELD_KEYS.iter() {
            if ctx.keyboard.is_key_pressed(*code) {
                input.held.insert(*key);
            }
        }
        input
    }

    fn draw_hud(&self, ctx: &Context, canvas: &mut graphics::Canvas) {
        let mut y = HUD_MARGIN;

        hud_line(canvas, &mut y, &format!("FPS: {:.0}", ctx.time.fps()), Color::WHITE);
        let instructions = match self.simulation.context().camera.mode() {
            ProjectionMode::Perspective => PERSPECTIVE_HELP,
            ProjectionMode::Planar => PLANAR_HELP,
        };
        for text in instructions.iter().chain(COMMON_HELP.iter()) {
            hud_line(canvas, &mut y, text, Color::WHITE);
        }
        if self.simulation.context().toggles.paused {
            hud_line(canvas, &mut y, "PAUSED", Color::YELLOW);
        }

        // Legend
        y += HUD_LINE;
        let system = self.simulation.system();
        for view in system.iter().take(LEGEND_MAX) {
            hud_line(canvas, &mut y, &view.body.name, Color::from_rgb_u32(view.body.color));
        }
        if system.len() > LEGEND_MAX {
            let more = format!("... and {} more", system.len() - LEGEND_MAX);
            hud_line(canvas, &mut y, &more, Color::WHITE);
        }
    }
}

/// Write one line of the HUD and move down a line.
fn hud_line(canvas: &mut graphics::Canvas, y: &mut f32, text: &str, color: Color) {
    let mut text = Text::new(text);
    text.set_scale(HUD_SIZE);
    canvas.draw(
        &text,
        DrawParam::default()
            .dest(Vec2::new(HUD_MARGIN, *y))
            .color(color),
    );
    *y += HUD_LINE;
}

impl EventHandler<GameError> for State {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        const DESIRED_FPS: u32 = 60;
        while ctx.time.check_update_time(DESIRED_FPS) {
            let input = self.take_input(ctx);
            self.draw_list.clear();
            match self.simulation.frame(&input, &mut self.draw_list) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => {
                    info!(
                        "Quitting after {} steps ({:.1} simulated days)",
                        self.simulation.system().steps(),
                        self.simulation.system().elapsed() / 86_400.0
                    );
                    ctx.request_quit();
                    break;
                }
                Err(e) => return Err(step_failed(e)),
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Color::from_rgb(36, 36, 36));
        let viewport = self.simulation.context().viewport;
        canvas.set_screen_coordinates(Rect::new(
            0.0,
            0.0,
            viewport.width as f32,
            viewport.height as f32,
        ));

        self.draw_list
            .replay(&mut GgezRenderer::new(ctx, &mut canvas));
        self.draw_hud(ctx, &mut canvas);

        canvas.finish(ctx)
    }

    fn mouse_button_down_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        if let Some(button) = to_button(button) {
            self.pending.push(InputEvent::ButtonDown {
                button,
                pos: Point2D::new(x as f64, y as f64),
            });
        }
        Ok(())
    }

    fn mouse_button_up_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        _x: f32,
        _y: f32,
    ) -> GameResult {
        if let Some(button) = to_button(button) {
            self.pending.push(InputEvent::ButtonUp { button });
        }
        Ok(())
    }

    fn mouse_enter_or_leave(&mut self, _ctx: &mut Context, entered: bool) -> GameResult {
        self.pointer_inside = entered;
        Ok(())
    }

    fn key_down_event(&mut self, _ctx: &mut Context, input: KeyInput, repeated: bool) -> GameResult {
        // One toggle per press, however long it's held
        if repeated {
            return Ok(());
        }
        if let Some(key) = input.keycode.and_then(to_key) {
            self.pending.push(InputEvent::KeyDown(key));
        }
        Ok(())
    }

    fn quit_event(&mut self, _ctx: &mut Context) -> GameResult<bool> {
        info!("Window closed");
        Ok(false)
    }

    fn resize_event(&mut self, _ctx: &mut Context, width: f32, height: f32) -> GameResult {
        self.simulation
            .set_viewport(Viewport::new(width as f64, height as f64));
        Ok(())
    }

    fn on_error(
        &mut self,
        _ctx: &mut Context,
        _origin: ggez::event::ErrorOrigin,
        e: GameError,
    ) -> bool {
        error!("Stopping: {}", e);
        // The event loop only ever exits successfully, so fail the process here.
        std::process::exit(EXIT_FAILURE)
    }
}

fn step_failed(e: SimulationError) -> GameError {
    GameError::CustomError(format!("the simulation can't continue: {}", e))
}

const EXIT_FAILURE: i32 = 1;

fn to_button(button: MouseButton) -> Option<Button> {
    match button {
        MouseButton::Left => Some(Button::Primary),
        MouseButton::Middle => Some(Button::Middle),
        MouseButton::Right => Some(Button::Secondary),
        _ => None,
    }
}

fn to_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::W => Key::W,
        KeyCode::A => Key::A,
        KeyCode::S => Key::S,
        KeyCode::D => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::Capital => Key::CapsLock,
        KeyCode::C => Key::C,
        KeyCode::X => Key::X,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

const HELD_KEYS: [(KeyCode, Key); 4] = [
    (KeyCode::W, Key::W),
    (KeyCode::A, Key::A),
    (KeyCode::S, Key::S),
    (KeyCode::D, Key::D),
];

const HUD_MARGIN: f32 = 10.0;
const HUD_SIZE: f32 = 16.0;
const HUD_LINE: f32 = 20.0;
const LEGEND_MAX: usize = 12;

const PERSPECTIVE_HELP: &[&str] = &[
    "Left drag: rotate",
    "Middle drag: pan",
    "Right drag: zoom",
    "WASD: move",
];
const PLANAR_HELP: &[&str] = &[
    "Middle drag: rotate view",
    "Right drag: zoom",
    "WASD or screen edges: pan",
    "C: recenter",
];
const COMMON_HELP: &[&str] = &[
    "Space: pause",
    "Tab: distances",
    "Caps Lock: trails",
    "X / Esc: quit",
];
