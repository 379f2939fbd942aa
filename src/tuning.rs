//! Game balance and difficulty presets
//!
//! One immutable [`Tuning`] value is built at round start and borrowed by every
//! component. Overrides can be loaded from JSON; missing keys keep the
//! defaults from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Difficulty levels offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Total round length in seconds
    pub fn round_secs(&self) -> f64 {
        match self {
            Difficulty::Easy => 120.0,
            Difficulty::Medium => 60.0,
            Difficulty::Hard => 30.0,
        }
    }

    /// How long each fish stays up, in seconds
    pub fn fish_ttl_secs(&self) -> f64 {
        match self {
            Difficulty::Easy => 5.0,
            Difficulty::Medium => 4.0,
            Difficulty::Hard => 3.0,
        }
    }
}

/// Configuration for one wake trail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakeConfig {
    /// Minimum gap between particles
    pub spawn_ms: u64,
    /// Particle lifetime
    pub life_ms: u64,
    /// Oldest particles are dropped beyond this
    pub max_particles: usize,
    /// Distance behind the waka centre
    pub back_offset: f32,
    pub start_scale: f32,
    pub end_scale: f32,
    /// Alpha of a freshly spawned particle (0-255)
    pub start_alpha: f32,
}

impl WakeConfig {
    pub const fn small() -> Self {
        Self {
            spawn_ms: 60,
            life_ms: 500,
            max_particles: 80,
            back_offset: 100.0,
            start_scale: 0.7,
            end_scale: 1.2,
            start_alpha: 160.0,
        }
    }

    pub const fn big() -> Self {
        Self {
            start_scale: 0.8,
            end_scale: 1.25,
            ..Self::small()
        }
    }

    pub const fn rowing() -> Self {
        Self {
            life_ms: 1000,
            back_offset: 0.0,
            start_scale: 0.9,
            end_scale: 1.3,
            ..Self::small()
        }
    }
}

/// Configuration for the catch flash + star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchEffectConfig {
    pub flash_ms: u64,
    pub icon_ms: u64,
    /// Number of discrete scale steps across the icon phase
    pub steps: usize,
}

impl Default for CatchEffectConfig {
    fn default() -> Self {
        Self {
            flash_ms: 120,
            icon_ms: 600,
            steps: 12,
        }
    }
}

/// Every tunable the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,

    // === Vessel ===
    pub friction: f32,
    pub brake: f32,
    pub turn_rate_deg: f32,
    pub stroke_thrust: f32,
    pub stroke_ms: u64,
    pub row_splash_cooldown_ms: u64,
    pub start_heading_deg: f32,

    // === Net ===
    pub net_step_ms: u64,

    // === Fish ===
    pub spawn_chance: f64,
    pub spawn_inset: i32,
    pub spawn_top: i32,
    pub fish_ttl_secs: f64,
    pub fish_splash_base_ms: f64,
    pub fish_splash_per_sec_ms: f64,

    // === Round ===
    pub round_secs: f64,
    pub target_count: u32,

    // === Effects ===
    pub row_wake_delay_ms: u64,
    pub wake_small: WakeConfig,
    pub wake_big: WakeConfig,
    pub wake_rowing: WakeConfig,
    pub catch_effect: CatchEffectConfig,
}

impl Default for Tuning {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,

            friction: FRICTION,
            brake: BRAKE,
            turn_rate_deg: TURN_RATE_DEG,
            stroke_thrust: STROKE_THRUST,
            stroke_ms: STROKE_MS,
            row_splash_cooldown_ms: ROW_SPLASH_COOLDOWN_MS,
            start_heading_deg: START_HEADING_DEG,

            net_step_ms: NET_STEP_MS,

            spawn_chance: FISH_SPAWN_CHANCE,
            spawn_inset: FISH_SPAWN_INSET,
            spawn_top: FISH_SPAWN_TOP,
            fish_ttl_secs: difficulty.fish_ttl_secs(),
            fish_splash_base_ms: FISH_SPLASH_BASE_MS,
            fish_splash_per_sec_ms: FISH_SPLASH_PER_SEC_MS,

            round_secs: difficulty.round_secs(),
            target_count: TARGET_COUNT,

            row_wake_delay_ms: ROW_WAKE_DELAY_MS,
            wake_small: WakeConfig::small(),
            wake_big: WakeConfig::big(),
            wake_rowing: WakeConfig::rowing(),
            catch_effect: CatchEffectConfig::default(),
        }
    }
}

impl Tuning {
    /// Default tuning with the difficulty's round length and fish lifetime
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.apply_difficulty(difficulty);
        tuning
    }

    /// Overwrite the two difficulty-driven parameters
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        log::info!("Difficulty: {}", difficulty.as_str());
        self.round_secs = difficulty.round_secs();
        self.fish_ttl_secs = difficulty.fish_ttl_secs();
    }

    /// Parse JSON overrides on top of the defaults, then validate
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Delay between a fish appearing and its splash cue
    pub fn fish_splash_delay_ms(&self) -> u64 {
        (self.fish_splash_base_ms + self.fish_splash_per_sec_ms * self.fish_ttl_secs).max(0.0)
            as u64
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        positive("width", self.width as f64)?;
        positive("height", self.height as f64)?;
        unit_open("friction", self.friction as f64)?;
        unit_open("brake", self.brake as f64)?;
        positive("stroke_ms", self.stroke_ms as f64)?;
        positive("net_step_ms", self.net_step_ms as f64)?;
        positive("fish_ttl_secs", self.fish_ttl_secs)?;
        positive("round_secs", self.round_secs)?;
        positive("target_count", self.target_count as f64)?;

        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(SimError::InvalidTuning {
                name: "spawn_chance",
                value: self.spawn_chance,
                expected: "[0.0, 1.0]",
            });
        }
        let (inset, top) = (i64::from(self.spawn_inset), i64::from(self.spawn_top));
        if inset < 0 || 2 * inset > self.width as i64 {
            return Err(SimError::InvalidTuning {
                name: "spawn_inset",
                value: self.spawn_inset as f64,
                expected: "[0, width / 2]",
            });
        }
        if top < 0 || top + inset > self.height as i64 {
            return Err(SimError::InvalidTuning {
                name: "spawn_top",
                value: self.spawn_top as f64,
                expected: "[0, height - spawn_inset]",
            });
        }

        for wake in [&self.wake_small, &self.wake_big, &self.wake_rowing] {
            positive("wake.life_ms", wake.life_ms as f64)?;
            positive("wake.max_particles", wake.max_particles as f64)?;
        }
        positive("catch_effect.icon_ms", self.catch_effect.icon_ms as f64)?;
        positive("catch_effect.steps", self.catch_effect.steps as f64)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> SimResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTuning {
            name,
            value,
            expected: "(0, ∞)",
        })
    }
}

fn unit_open(name: &'static str, value: f64) -> SimResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTuning {
            name,
            value,
            expected: "(0.0, 1.0)",
        })
    }
}
