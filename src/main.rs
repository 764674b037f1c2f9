//! Crush Runner headless driver
//!
//! Runs a session at a fixed 60 Hz refresh with a simple autopilot and logs how
//! far it got. Usage: `crush-runner [SECONDS] [TUNING]`

use std::path::PathBuf;

use clap::Parser;
use crush_runner::consts::*;
use crush_runner::sim::{GameEvent, HazardPhase, Session, TickInput};
use crush_runner::{FrameLoop, Tuning, TuningError};

/// Refresh interval of the simulated display (ms)
const REFRESH_MS: f64 = 1000.0 / 60.0;
const DEFAULT_SECONDS: f64 = 60.0;

/// Slow down in front of a tight spot while the ceiling is coming, sprint otherwise
fn autopilot(session: &Session) -> TickInput {
    let threatened = matches!(
        session.ceiling.phase(),
        HazardPhase::Warning | HazardPhase::Descending | HazardPhase::Hold
    );
    if !threatened {
        return TickInput::with_speed(SPEED_FAST);
    }

    let x = session.player.position.x;
    let worst_drop = session.terrain.max_collapse_drop();
    let tight_ahead = (1..=4)
        .map(|i| x + i as f64 * 40.0)
        .any(|ahead| session.terrain.clearance(ahead) - worst_drop < session.player.height);
    let tight_here = session.terrain.clearance(x) - worst_drop < session.player.height;

    if tight_here {
        TickInput::with_speed(SPEED_FAST)
    } else if tight_ahead {
        TickInput::with_speed(SPEED_SLOW)
    } else {
        TickInput::default()
    }
}

/// Headless Crush Runner session
#[derive(Parser, Debug)]
#[command(version, about = "Run Crush Runner headless with a simple autopilot")]
struct Args {
    /// Simulated run length in seconds
    #[arg(default_value_t = DEFAULT_SECONDS, value_parser = parse_seconds)]
    seconds: f64,

    /// JSON tuning file; defaults are used when omitted
    tuning: Option<PathBuf>,
}

fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("run length must be positive, got {value}"))
    }
}

fn main() -> Result<(), TuningError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("Crush Runner (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let seconds = args.seconds;

    let mut frames = FrameLoop::new(tuning);
    frames.start();

    let total_frames = (seconds * 1000.0 / REFRESH_MS).ceil() as u64;
    let mut deaths = 0;
    let mut last_phase = frames.session().ceiling.phase();

    for frame in 0..=total_frames {
        let input = autopilot(frames.session());
        let events = frames.frame(frame as f64 * REFRESH_MS, &input);

        for event in &events {
            if let GameEvent::LifeLost { cause, x } = event {
                deaths += 1;
                log::info!("Life lost ({}) at x={x:.0}", cause.as_str());
            }
        }

        let phase = frames.session().ceiling.phase();
        if phase != last_phase {
            log::debug!("Ceiling {} at x={:.0}", phase.as_str(), frames.session().player.position.x);
            last_phase = phase;
        }

        if frames.session().game.is_game_over {
            break;
        }
    }
    frames.stop();

    let session = frames.session();
    println!(
        "Ran {:.1}s: distance {}, lives {}, deaths {}, terrain {} vertices / {} zones{}",
        session.time_ticks() as f64 * REFRESH_MS / 1000.0,
        session.game.distance,
        session.game.lives,
        deaths,
        session.terrain.vertex_count(),
        session.terrain.zones().len(),
        if session.game.is_game_over { " (game over)" } else { "" }
    );
    Ok(())
}
