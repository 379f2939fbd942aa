//! Tākaro Waka - a waka rowing and net-fishing arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (vessel, net, fish, catch test, effects, round)
//! - `tuning`: Data-driven game balance and difficulty presets
//! - `audio`: Sound cue vocabulary handed to the audio backend
//! - `error`: Construction-time errors
//!
//! Asset loading, rendering, menus and the process loop live outside this crate.

pub mod audio;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use tuning::{Difficulty, Tuning};

use glam::Vec2;

/// Reference baseline constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 680.0;

    /// Velocity multiplier applied every frame
    pub const FRICTION: f32 = 0.99;
    /// Velocity multiplier applied every frame while braking
    pub const BRAKE: f32 = 0.95;
    /// Heading change per frame while turning (degrees)
    pub const TURN_RATE_DEG: f32 = 3.0;
    /// Impulse added per frame while a stroke is open
    pub const STROKE_THRUST: f32 = 0.336;
    /// Length of one stroke window
    pub const STROKE_MS: u64 = 300;
    /// Minimum gap between row splash cues
    pub const ROW_SPLASH_COOLDOWN_MS: u64 = 260;
    /// Waka faces up the screen at round start
    pub const START_HEADING_DEG: f32 = -90.0;

    /// Time between net stage changes
    pub const NET_STEP_MS: u64 = 90;

    /// Per-frame chance of spawning a fish when none exists
    pub const FISH_SPAWN_CHANCE: f64 = 0.02;
    /// Fish never spawn closer than this to the left/right/bottom edges
    pub const FISH_SPAWN_INSET: i32 = 40;
    /// Fish never spawn inside the HUD band at the top
    pub const FISH_SPAWN_TOP: i32 = 160;
    /// Fish splash plays at `BASE + PER_SEC * ttl` after spawn
    pub const FISH_SPLASH_BASE_MS: f64 = 500.0;
    pub const FISH_SPLASH_PER_SEC_MS: f64 = 500.0;

    /// Fish needed to win a round
    pub const TARGET_COUNT: u32 = 9;

    /// One-shot rowing wake lags the row trigger by this much
    pub const ROW_WAKE_DELAY_MS: u64 = 120;

    /// Opacity threshold for collision masks (alpha strictly above)
    pub const MASK_ALPHA_THRESHOLD: u8 = 127;
}

/// Wrap a coordinate into `[0, dim)` with a single add/subtract
#[inline]
pub fn wrap_coord(v: f32, dim: f32) -> f32 {
    let wrapped = if v < 0.0 {
        v + dim
    } else if v >= dim {
        v - dim
    } else {
        v
    };
    // -1e-9 + dim rounds to dim in f32
    if wrapped >= dim { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees (0° = +x, 90° = +y, screen space)
#[inline]
pub fn heading_vector(heading_deg: f32) -> Vec2 {
    let r = heading_deg.to_radians();
    Vec2::new(r.cos(), r.sin())
}

/// Sprite rotation (degrees, counter-clockwise) used to draw something facing `heading_deg`
#[inline]
pub fn render_angle(heading_deg: f32) -> f32 {
    -heading_deg - 90.0
}
