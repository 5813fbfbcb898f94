//! RaCa - Entry Point
//!
//! Loads settings, level and textures, boots the engine and drives it from a
//! winit event loop. The loop sleeps until the engine's next deadline instead
//! of spinning; ticks and frames are pumped whenever the loop wakes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use raca::core::config::EngineConfig;
use raca::core::error::{EngineError, Result};
use raca::core::settings::Settings;
use raca::engine::Engine;
use raca::render::textures::TextureSet;
use raca::world::loader::load_level;
use raca::world::World;

#[derive(Parser, Debug)]
#[command(name = "raca-engine", about = "A 2.5D grid ray-casting engine")]
struct Args {
    /// Level file to load.
    #[arg(long, default_value = "levels/1.lvl")]
    level: PathBuf,

    /// Settings file; created with defaults if missing.
    #[arg(long, default_value = "settings.cfg")]
    settings: PathBuf,

    /// Directory containing wall textures (wall1.png, wall2.png, ...).
    #[arg(long, default_value = "res")]
    textures: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raca=info".into()),
        )
        .init();

    let args = Args::parse();

    let settings = match Settings::load(&args.settings) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "settings unusable, falling back to defaults");
            Settings::defaults()
        }
    };
    let config = EngineConfig::from_settings(&settings)?;
    if let Err(reason) = config.validate() {
        return Err(EngineError::CorruptSettings(reason));
    }

    let world = World::new(load_level(&args.level)?, config.grid_size);

    let textures = if config.wall_textures == 0 {
        TextureSet::empty()
    } else {
        match TextureSet::load(&args.textures, config.wall_textures, config.resolution_y) {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, "textures unavailable, rendering untextured walls");
                TextureSet::empty()
            }
        }
    };

    let start = Instant::now();
    let engine = Engine::new(&config, world, textures, 0)?;
    info!(level = %args.level.display(), "engine booted");

    run_event_loop(&config, engine, start)
}

fn run_event_loop(config: &EngineConfig, mut engine: Engine, start: Instant) -> Result<()> {
    let event_loop = EventLoop::new().map_err(window_error)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("RaCa")
            .with_inner_size(LogicalSize::new(
                f64::from(config.resolution_x),
                f64::from(config.resolution_y),
            ))
            .with_resizable(false)
            .build(&event_loop)
            .map_err(window_error)?,
    );
    let mut pixels = {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window.as_ref());
        Pixels::new(
            config.resolution_x as u32,
            config.resolution_y as u32,
            surface,
        )
        .map_err(window_error)?
    };

    let loop_window = window.clone();
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.repeat {
                        return;
                    }
                    if let PhysicalKey::Code(key) = event.physical_key {
                        if let Some(code) = key_code_value(key) {
                            engine.key_event(code, event.state == ElementState::Pressed);
                        }
                    }
                }
                WindowEvent::Focused(false) => {
                    // Key-up events are lost while unfocused.
                    engine.reset_input();
                }
                WindowEvent::RedrawRequested => {
                    if let Err(err) = pixels.render() {
                        error!(error = %err, "surface render failed");
                        elwt.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = start.elapsed().as_millis() as u64;
                engine.pump(now);
                if engine.render_frame(now, pixels.frame_mut()) {
                    loop_window.request_redraw();
                }
                let deadline = start + Duration::from_millis(engine.next_deadline());
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => {}
        })
        .map_err(window_error)
}

fn window_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::ResourceLoad {
        path: "window surface".to_string(),
        reason: err.to_string(),
    }
}

/// Translates winit key codes to the integer codes used in the settings file.
fn key_code_value(key: KeyCode) -> Option<i32> {
    let code = match key {
        KeyCode::ArrowLeft => 37,
        KeyCode::ArrowUp => 38,
        KeyCode::ArrowRight => 39,
        KeyCode::ArrowDown => 40,
        KeyCode::Space => 32,
        KeyCode::Digit0 => 48,
        KeyCode::Digit1 => 49,
        KeyCode::Digit2 => 50,
        KeyCode::Digit3 => 51,
        KeyCode::Digit4 => 52,
        KeyCode::Digit5 => 53,
        KeyCode::Digit6 => 54,
        KeyCode::Digit7 => 55,
        KeyCode::Digit8 => 56,
        KeyCode::Digit9 => 57,
        KeyCode::KeyA => 65,
        KeyCode::KeyB => 66,
        KeyCode::KeyC => 67,
        KeyCode::KeyD => 68,
        KeyCode::KeyE => 69,
        KeyCode::KeyF => 70,
        KeyCode::KeyG => 71,
        KeyCode::KeyH => 72,
        KeyCode::KeyI => 73,
        KeyCode::KeyJ => 74,
        KeyCode::KeyK => 75,
        KeyCode::KeyL => 76,
        KeyCode::KeyM => 77,
        KeyCode::KeyN => 78,
        KeyCode::KeyO => 79,
        KeyCode::KeyP => 80,
        KeyCode::KeyQ => 81,
        KeyCode::KeyR => 82,
        KeyCode::KeyS => 83,
        KeyCode::KeyT => 84,
        KeyCode::KeyU => 85,
        KeyCode::KeyV => 86,
        KeyCode::KeyW => 87,
        KeyCode::KeyX => 88,
        KeyCode::KeyY => 89,
        KeyCode::KeyZ => 90,
        _ => return None,
    };
    Some(code)
}
