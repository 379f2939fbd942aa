//! Round state
//!
//! Everything one round owns: the clocks, the waka, the single fish slot,
//! score, phase, effects and the per-frame event queue. A new round is a new
//! `RoundState`; nothing carries over.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::SimClock;
use super::effects::{CatchEffect, Wakes};
use super::sprite::SpriteBank;
use super::target::Fish;
use super::vessel::Vessel;
use crate::error::SimResult;
use crate::tuning::Tuning;

/// How a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Reached the target count
    Won,
    /// Ran out of time first
    TimeUp,
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundPhase {
    Playing,
    /// Terminal. `at_secs` freezes the countdown
    Ending { outcome: Outcome, at_secs: f64 },
}

/// Things that happened during the last tick, drained by audio and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Row trigger accepted past the splash cooldown
    RowSplash,
    /// Net deploy or retract accepted
    NetFlip,
    FishSpawned { pos: Vec2 },
    /// Delayed splash of the current fish
    FishSplash,
    /// `score` is the new total
    FishCaught { score: u32, pos: Vec2 },
    RoundEnded { outcome: Outcome },
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub bank: SpriteBank,
    pub clock: SimClock,
    pub vessel: Vessel,
    /// At most one fish
    pub fish: Option<Fish>,
    pub score: u32,
    pub phase: RoundPhase,
    /// Visual only
    pub wakes: Wakes,
    /// Visual only, pruned once done
    pub catch_effects: Vec<CatchEffect>,
    /// Diagnostic centre lock as of the last tick
    pub center_lock: bool,
    /// Events from the last tick
    pub events: Vec<GameEvent>,
}

impl RoundState {
    /// Start a round. Fails on invalid tuning.
    pub fn new(seed: u64, tuning: Tuning, bank: SpriteBank) -> SimResult<Self> {
        tuning.validate()?;
        log::info!(
            "Round start: seed {}, {}s, ttl {}s, target {}",
            seed,
            tuning.round_secs,
            tuning.fish_ttl_secs,
            tuning.target_count
        );

        let vessel = Vessel::new(&tuning, bank.vessel.len(), bank.net.len());
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            wakes: Wakes::new(&tuning),
            vessel,
            tuning,
            bank,
            clock: SimClock::new(),
            fish: None,
            score: 0,
            phase: RoundPhase::Playing,
            catch_effects: Vec::new(),
            center_lock: false,
            events: Vec::new(),
        })
    }

    /// Seconds left, frozen once the round ends
    pub fn remaining_secs(&self) -> f64 {
        let now = match self.phase {
            RoundPhase::Playing => self.clock.wall_secs(),
            RoundPhase::Ending { at_secs, .. } => at_secs,
        };
        (self.tuning.round_secs - now).max(0.0)
    }

    /// Countdown as shown on the HUD
    pub fn remaining_whole_secs(&self) -> u32 {
        self.remaining_secs().floor() as u32
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, RoundPhase::Ending { .. })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            RoundPhase::Playing => None,
            RoundPhase::Ending { outcome, .. } => Some(outcome),
        }
    }

    /// Star frame shown for a given score
    pub fn star_for_score(&self, score: u32) -> usize {
        let last = self.bank.stars.len().saturating_sub(1);
        (score.saturating_sub(1) as usize).min(last)
    }

    /// "score/target" for the HUD
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.score, self.tuning.target_count)
    }
}
