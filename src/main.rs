//! Cascade Dodge entry point
//!
//! Headless demo: the idle AI plays the game, every frame is lit with
//! radiance cascades, and the last frame is written to a PNG.
//!
//! Usage: `cascade-dodge [settings.json] [frames] [out.png]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;
    use std::path::PathBuf;

    use glam::Vec2;

    use cascade_dodge::consts::*;
    use cascade_dodge::sim::{GameEvent, GameState, TickInput, tick};
    use cascade_dodge::{HighScores, RadianceCascadeRenderer, Settings};

    const DEFAULT_SETTINGS: &str = "cascade-dodge.json";
    const DEFAULT_FRAMES: u32 = 120;
    const DEFAULT_OUTPUT: &str = "cascade-dodge.png";
    /// Host frame rate the demo pretends to run at
    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEMO_SEED: u64 = 13;

    struct Args {
        settings: Option<PathBuf>,
        frames: u32,
        output: PathBuf,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
        let settings = args.next().map(PathBuf::from);
        let frames = match args.next() {
            Some(s) => s.parse().map_err(|e| format!("invalid frame count {s:?}: {e}"))?,
            None => DEFAULT_FRAMES,
        };
        let output = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);
        Ok(Args {
            settings,
            frames,
            output,
        })
    }

    pub fn run(args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
        let args = parse_args(args)?;
        // An explicit settings file must load; the default one is optional
        let settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::load_or_default(DEFAULT_SETTINGS),
        };
        log::info!(
            "Quality {} at {}x{}, {} frames",
            settings.quality.as_str(),
            settings.width,
            settings.height,
            args.frames
        );

        let config = settings.render_config(settings.width, settings.height)?;
        let mut renderer = RadianceCascadeRenderer::new(config)?;
        let arena = Vec2::new(settings.width as f32, settings.height as f32);
        let mut state = GameState::new(DEMO_SEED, arena);
        let mut scores = HighScores::new();
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let mut accumulator = 0.0;
        for frame in 0..args.frames {
            accumulator += FRAME_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                // Slow sway so the body sweeps through the boxes
                input.rotation = (state.time_ticks as f32 * SIM_DT).sin() * 0.6;
                tick(&mut state, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::GameOver { score, time } => {
                        match scores.add_score("Idle", score, time, (settings.width, settings.height)) {
                            Some(rank) => log::info!("Run ended with score {score}, rank #{rank}"),
                            None => log::info!("Run ended with score {score}"),
                        }
                    }
                    GameEvent::WaveStarted {
                        wave,
                        avoid_thirteen,
                    } => log::info!(
                        "Wave {wave}: {}",
                        if avoid_thirteen { "avoid 13" } else { "hunt 13" }
                    ),
                    other => log::debug!("{other:?}"),
                }
            }

            renderer.render(&state.scene_primitives(input.super_mode))?;
            if frame % 30 == 0 {
                log::info!(
                    "frame {frame}: wave {}, score {}, lives {}",
                    state.wave,
                    state.score,
                    state.lives
                );
            }
        }

        let frame = renderer.frame();
        let size = frame.size();
        let image = image::RgbaImage::from_raw(size.x, size.y, frame.to_rgba8())
            .ok_or("frame buffer does not match its size")?;
        image.save(&args.output)?;
        log::info!("Wrote {}", args.output.display());

        if let Some(top) = scores.top_score() {
            log::info!("Best adjusted score this session: {top}");
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Cascade Dodge (native) starting...");

    match demo::run(std::env::args().skip(1)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("cascade-dodge: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser presenter; the library is usable from a host that owns the canvas
}
