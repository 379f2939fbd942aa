//! Fish lifecycle: spawn, animate, expire
//!
//! At most one fish exists at a time. The slot is an `Option<Fish>` owned by
//! the round; spawning into an occupied slot is a no-op.
//!
//! The animation frame is derived from the age fraction rather than a frame
//! counter, so the sequence plays exactly once over any lifetime.

use glam::Vec2;
use rand::Rng;

use super::clock::SimClock;
use super::sprite::{Frame, FrameTable};
use crate::tuning::Tuning;

/// A fish breaching the surface
#[derive(Debug, Clone)]
pub struct Fish {
    pub pos: Vec2,
    born_secs: f64,
    ttl_secs: f64,
    born_ms: u64,
    splash_delay_ms: u64,
    splash_played: bool,
    frame: usize,
    frames: FrameTable,
}

impl Fish {
    pub fn new(pos: Vec2, clock: &SimClock, tuning: &Tuning, frames: FrameTable) -> Self {
        Self {
            pos,
            born_secs: clock.wall_secs(),
            ttl_secs: tuning.fish_ttl_secs,
            born_ms: clock.ticks_ms(),
            splash_delay_ms: tuning.fish_splash_delay_ms(),
            splash_played: false,
            frame: 0,
            frames,
        }
    }

    /// Elapsed lifetime over total lifetime, clamped to [0, 1]
    pub fn age_fraction(&self, now_secs: f64) -> f64 {
        ((now_secs - self.born_secs) / self.ttl_secs).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self, now_secs: f64) -> bool {
        now_secs < self.born_secs + self.ttl_secs
    }

    /// Frame index for a given wall time
    pub fn frame_at(&self, now_secs: f64) -> usize {
        let n = self.frames.len();
        ((self.age_fraction(now_secs) * n as f64).floor() as usize).min(n - 1)
    }

    /// Frame index as of the last update
    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Sprite and mask as of the last update
    #[inline]
    pub fn current_frame(&self) -> &Frame {
        self.frames.frame(self.frame)
    }

    /// Refresh the animation frame. Returns true on the one frame the splash cue is due.
    pub fn update(&mut self, clock: &SimClock) -> bool {
        self.frame = self.frame_at(clock.wall_secs());

        if self.splash_played || !self.is_alive(clock.wall_secs()) {
            return false;
        }
        if clock.ticks_ms().saturating_sub(self.born_ms) >= self.splash_delay_ms {
            self.splash_played = true;
            return true;
        }
        false
    }
}

/// Where a new fish appears: uniform inside the inset bounds, or dead centre
/// under the diagnostic centre lock
pub fn spawn_position(rng: &mut impl Rng, tuning: &Tuning, center_lock: bool) -> Vec2 {
    let (w, h) = (tuning.width as i32, tuning.height as i32);
    if center_lock {
        return Vec2::new((w / 2) as f32, (h / 2) as f32);
    }
    let x = rng.random_range(tuning.spawn_inset..=w - tuning.spawn_inset);
    let y = rng.random_range(tuning.spawn_top..=h - tuning.spawn_inset);
    Vec2::new(x as f32, y as f32)
}

/// Roll the per-frame spawn trial. No-op (and no random draw) if a fish exists.
pub fn try_spawn(
    slot: &mut Option<Fish>,
    rng: &mut impl Rng,
    clock: &SimClock,
    tuning: &Tuning,
    frames: &FrameTable,
    center_lock: bool,
) -> bool {
    if slot.is_some() || rng.random::<f64>() >= tuning.spawn_chance {
        return false;
    }
    let pos = spawn_position(rng, tuning, center_lock);
    log::debug!("Fish at ({}, {}), ttl {}s", pos.x, pos.y, tuning.fish_ttl_secs);
    *slot = Some(Fish::new(pos, clock, tuning, frames.clone()));
    true
}

/// Clear the slot if its fish has run out of time
pub fn expire(slot: &mut Option<Fish>, now_secs: f64) -> bool {
    if slot.as_ref().is_some_and(|f| !f.is_alive(now_secs)) {
        log::debug!("Fish escaped at {:.2}s", now_secs);
        *slot = None;
        return true;
    }
    false
}
