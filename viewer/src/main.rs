mod render;
mod state;
use state::State;

use anyhow::Context as _;
use clap::Parser;
use ggez::{
    conf::{WindowMode, WindowSetup},
    event, ContextBuilder,
};
use log::info;
use scene::{CameraSettings, ProjectionMode, Simulation, SimulationContext, Viewport};
use simulator::{Params, SolarSystem};

use std::path::PathBuf;

/// Watch a solar system go round.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// json5 system file. Leave it out for our own solar system.
    path: Option<PathBuf>,
    /// `perspective` (3D) or `planar` (2D)
    #[arg(long, default_value_t = ProjectionMode::Planar)]
    mode: ProjectionMode,
    /// How many past positions each body remembers
    #[arg(long)]
    trail: Option<usize>,
}

const WIDTH: f32 = 1200.0;
const HEIGHT: f32 = 900.0;

fn load_system(args: &Args) -> anyhow::Result<SolarSystem> {
    let (orbiters, mut params) = match &args.path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("couldn't read {}", path.display()))?;
            let loaded = loader::load(&contents)
                .with_context(|| format!("couldn't load {}", path.display()))?;
            (loaded.orbiters, loaded.params)
        }
        None => {
            info!("No system file given, using the built-in one");
            (loader::prefabs::solar_systems::ours(), Params::default())
        }
    };
    if let Some(trail) = args.trail {
        params.trail_capacity = trail;
    }
    Ok(SolarSystem::new(orbiters, params)?)
}

pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let system = load_system(&args)?;

    let (ctx, event_loop) = ContextBuilder::new("orbit_simulator", "gamma-delta")
        .window_setup(WindowSetup::default().title("Orbit simulator!"))
        .window_mode(
            WindowMode::default()
                .dimensions(WIDTH, HEIGHT)
                .resizable(true),
        )
        .build()?;

    let (width, height) = ctx.gfx.drawable_size();
    let context = SimulationContext::new(
        args.mode,
        CameraSettings::default(),
        Viewport::new(width as f64, height as f64),
    );
    info!("Starting in {} mode", args.mode);
    let state = State::new(Simulation::new(system, context));

    event::run(ctx, event_loop, state)
}
