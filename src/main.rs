//! Tākaro Waka headless driver
//!
//! Runs one round against procedural sprites with a simple autopilot and
//! reports the result. Usage:
//!
//! ```text
//! takaro-waka [easy|medium|hard|<tuning.json>] [seed]
//! ```

use std::error::Error;

use glam::Vec2;
use takaro_waka::audio::{AudioManager, AudioSink, SoundCue};
use takaro_waka::sim::{NetState, RoundState, SpriteBank, Stroke, TickInput, tick};
use takaro_waka::{Difficulty, Tuning};

/// One rendered frame at 60 Hz
const FRAME_DT: f32 = 1.0 / 60.0;

/// Audio backend that just logs
struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("Sound {:?} at {:.2}", cue, volume);
    }
}

/// Steers at the fish, rows when lined up and nets it when close
#[derive(Default)]
struct Autopilot {
    net_down: bool,
}

impl Autopilot {
    const NET_RANGE: f32 = 70.0;
    const BRAKE_RANGE: f32 = 160.0;
    const AIM_TOLERANCE_DEG: f32 = 25.0;

    fn input(&mut self, state: &RoundState) -> TickInput {
        let mut input = TickInput::default();
        let vessel = &state.vessel;

        let Some(fish) = state.fish.as_ref() else {
            if self.net_down {
                input.net_released = true;
                self.net_down = false;
            }
            return input;
        };

        let delta = wrapped_delta(vessel.pos, fish.pos, &state.tuning);
        let distance = delta.length();
        let wanted = delta.y.atan2(delta.x).to_degrees();
        let error = normalize_deg(wanted - vessel.heading_deg);

        if error > state.tuning.turn_rate_deg {
            input.turn_right = true;
        } else if error < -state.tuning.turn_rate_deg {
            input.turn_left = true;
        }

        if distance < Self::NET_RANGE {
            if !self.net_down {
                input.net_pressed = true;
                self.net_down = true;
            }
        } else if self.net_down {
            input.net_released = true;
            self.net_down = false;
        }

        input.brake = distance < Self::BRAKE_RANGE && vessel.speed() > 2.0;

        let can_row = vessel.stroke() == Stroke::Idle && vessel.net.state() == NetState::Idle;
        if can_row && !self.net_down && error.abs() < Self::AIM_TOLERANCE_DEG {
            input.row_pressed = true;
        }
        input
    }
}

/// Shortest offset from `from` to `to` on the wrapping playfield
fn wrapped_delta(from: Vec2, to: Vec2, tuning: &Tuning) -> Vec2 {
    let wrap = |d: f32, dim: f32| {
        if d > dim / 2.0 {
            d - dim
        } else if d < -dim / 2.0 {
            d + dim
        } else {
            d
        }
    };
    let d = to - from;
    Vec2::new(wrap(d.x, tuning.width), wrap(d.y, tuning.height))
}

/// Into (-180, 180]
fn normalize_deg(deg: f32) -> f32 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

fn load_tuning(arg: Option<&str>) -> Result<Tuning, Box<dyn Error>> {
    let Some(arg) = arg else {
        return Ok(Tuning::default());
    };
    if let Some(difficulty) = Difficulty::from_str(arg) {
        return Ok(Tuning::from_difficulty(difficulty));
    }
    let json = std::fs::read_to_string(arg)?;
    Ok(Tuning::from_json(&json)?)
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = load_tuning(args.first().map(String::as_str))?;
    let seed = match args.get(1) {
        Some(s) => s.parse::<u64>()?,
        None => 0x7A4A,
    };

    let mut state = RoundState::new(seed, tuning, SpriteBank::placeholder())?;
    let mut pilot = Autopilot::default();
    let audio = AudioManager::new();
    let mut sink = LogSink;

    let max_frames = (state.tuning.round_secs / f64::from(FRAME_DT)).ceil() as u64 + 1;
    let mut frames = 0u64;
    while !state.is_over() && frames < max_frames {
        let input = pilot.input(&state);
        tick(&mut state, &input, FRAME_DT);
        audio.play_events(&state.events, &mut sink);
        frames += 1;
    }

    println!(
        "{:?} with {} after {} frames ({}s left)",
        state.outcome(),
        state.score_label(),
        frames,
        state.remaining_whole_secs()
    );
    Ok(())
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Tākaro Waka (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
