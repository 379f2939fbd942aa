//! Visual-only effects: wake trails and the catch flash
//!
//! Effects read vessel and fish state when spawned and never feed back into
//! gameplay. Everything is derived from the tick clock, so the renderer can
//! ask for any frame's scale and alpha without the effect being stepped.

use std::collections::VecDeque;

use glam::Vec2;

use super::vessel::Vessel;
use crate::render_angle;
use crate::tuning::{CatchEffectConfig, Tuning, WakeConfig};

/// One wake splash
#[derive(Debug, Clone, Copy)]
pub struct WakeParticle {
    pub pos: Vec2,
    pub heading_deg: f32,
    pub born_ms: u64,
}

/// Render-ready wake particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WakeSprite {
    pub pos: Vec2,
    /// Sprite rotation, same convention as the waka
    pub angle: f32,
    pub scale: f32,
    /// 0-255
    pub alpha: u8,
}

/// Bounded trail of timestamped particles dropped behind the waka
#[derive(Debug, Clone)]
pub struct WakeTrail {
    config: WakeConfig,
    particles: VecDeque<WakeParticle>,
    last_spawn_ms: Option<u64>,
}

impl WakeTrail {
    pub fn new(config: WakeConfig) -> Self {
        Self {
            config,
            particles: VecDeque::with_capacity(config.max_particles),
            last_spawn_ms: None,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop a particle `back_offset` behind the waka, at most once per `spawn_ms`
    pub fn spawn(&mut self, vessel: &Vessel, now_ms: u64) -> bool {
        if let Some(last) = self.last_spawn_ms {
            if now_ms.saturating_sub(last) < self.config.spawn_ms {
                return false;
            }
        }
        self.last_spawn_ms = Some(now_ms);

        self.particles.push_back(WakeParticle {
            pos: vessel.point_behind(self.config.back_offset),
            heading_deg: vessel.heading_deg,
            born_ms: now_ms,
        });
        if self.particles.len() > self.config.max_particles {
            self.particles.pop_front();
        }
        true
    }

    /// 0 = just spawned, 1 = expired
    pub fn progress(&self, particle: &WakeParticle, now_ms: u64) -> f32 {
        let age = now_ms.saturating_sub(particle.born_ms) as f32;
        (age / self.config.life_ms as f32).clamp(0.0, 1.0)
    }

    /// Prune particles past their lifetime
    pub fn update(&mut self, now_ms: u64) {
        let life = self.config.life_ms;
        self.particles
            .retain(|p| now_ms.saturating_sub(p.born_ms) < life);
    }

    /// Wakes grow and fade with age
    pub fn sprites(&self, now_ms: u64) -> impl Iterator<Item = WakeSprite> + '_ {
        let c = self.config;
        self.particles.iter().map(move |p| {
            let prog = self.progress(p, now_ms);
            WakeSprite {
                pos: p.pos,
                angle: render_angle(p.heading_deg),
                scale: c.start_scale + (c.end_scale - c.start_scale) * prog,
                alpha: (c.start_alpha * (1.0 - prog)).clamp(0.0, 255.0) as u8,
            }
        })
    }
}

/// The three wakes a waka leaves
#[derive(Debug, Clone)]
pub struct Wakes {
    /// Always on
    pub small: WakeTrail,
    /// While rowing with the net stowed
    pub big: WakeTrail,
    /// One splash per row trigger, slightly delayed
    pub rowing: WakeTrail,
    row_wake_due_ms: Option<u64>,
}

impl Wakes {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            small: WakeTrail::new(tuning.wake_small),
            big: WakeTrail::new(tuning.wake_big),
            rowing: WakeTrail::new(tuning.wake_rowing),
            row_wake_due_ms: None,
        }
    }

    /// Queue the one-shot rowing wake
    pub fn schedule_row_wake(&mut self, due_ms: u64) {
        self.row_wake_due_ms = Some(due_ms);
    }

    pub fn update(&mut self, vessel: &Vessel, now_ms: u64) {
        if self.row_wake_due_ms.is_some_and(|due| now_ms >= due) {
            self.rowing.spawn(vessel, now_ms);
            self.row_wake_due_ms = None;
        }

        self.small.spawn(vessel, now_ms);
        if vessel.rowing() && !vessel.net.is_active() {
            self.big.spawn(vessel, now_ms);
        }

        self.prune(now_ms);
    }

    /// Age out particles without spawning new ones
    pub fn prune(&mut self, now_ms: u64) {
        self.small.update(now_ms);
        self.big.update(now_ms);
        self.rowing.update(now_ms);
    }

    /// Draw order: rowing wake, small, big
    pub fn sprites(&self, now_ms: u64) -> impl Iterator<Item = WakeSprite> + '_ {
        self.rowing
            .sprites(now_ms)
            .chain(self.small.sprites(now_ms))
            .chain(self.big.sprites(now_ms))
    }
}

/// Render-ready catch effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatchVisual {
    /// Expanding square outline
    Flash { center: Vec2, size: f32 },
    /// Star icon easing in and out while fading
    Icon {
        center: Vec2,
        star: usize,
        scale: f32,
        alpha: u8,
    },
}

/// Flash then star, spawned where a fish was caught
#[derive(Debug, Clone)]
pub struct CatchEffect {
    pub pos: Vec2,
    /// Index into the star frame table
    pub star: usize,
    born_ms: u64,
    config: CatchEffectConfig,
}

impl CatchEffect {
    pub fn new(pos: Vec2, star: usize, now_ms: u64, config: CatchEffectConfig) -> Self {
        Self {
            pos: Vec2::new(pos.x.trunc(), pos.y.trunc()),
            star,
            born_ms: now_ms,
            config,
        }
    }

    #[inline]
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.born_ms)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) > self.config.flash_ms + self.config.icon_ms
    }

    /// Scale of icon step `index`: sine ease, 0.6 at the ends, 1.0 mid-way
    pub fn step_scale(&self, index: usize) -> f32 {
        let p = (index + 1) as f32 / self.config.steps as f32;
        0.6 + 0.4 * (p * std::f32::consts::PI).sin()
    }

    pub fn visual(&self, now_ms: u64) -> CatchVisual {
        let t = self.elapsed_ms(now_ms);
        let CatchEffectConfig {
            flash_ms,
            icon_ms,
            steps,
        } = self.config;

        if t <= flash_ms {
            let p = if flash_ms == 0 { 1.0 } else { t as f32 / flash_ms as f32 };
            return CatchVisual::Flash {
                center: self.pos,
                size: 20.0 + 80.0 * p,
            };
        }

        let p = ((t - flash_ms) as f32 / icon_ms as f32).min(1.0);
        let index = ((p * (steps - 1) as f32) as usize).min(steps - 1);
        CatchVisual::Icon {
            center: self.pos,
            star: self.star,
            scale: self.step_scale(index),
            alpha: (255.0 * (1.0 - p)) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vessel_at(x: f32, y: f32, heading: f32) -> Vessel {
        let mut v = Vessel::new(&Tuning::default(), 7, 3);
        v.pos = Vec2::new(x, y);
        v.heading_deg = heading;
        v
    }

    #[test]
    fn test_wake_spawns_behind_and_respects_cadence() {
        let mut trail = WakeTrail::new(WakeConfig::small());
        let vessel = vessel_at(500.0, 300.0, 0.0);

        assert!(trail.spawn(&vessel, 0));
        assert!(!trail.spawn(&vessel, 30));
        assert!(trail.spawn(&vessel, 60));
        assert_eq!(trail.len(), 2);

        let first = trail.sprites(0).next().unwrap();
        assert!((first.pos - Vec2::new(400.0, 300.0)).length() < 1e-3);
        assert!((first.scale - 0.7).abs() < 1e-6);
        assert_eq!(first.alpha, 160);
    }

    #[test]
    fn test_wake_grows_fades_and_prunes() {
        let mut trail = WakeTrail::new(WakeConfig::small());
        let vessel = vessel_at(500.0, 300.0, 0.0);
        trail.spawn(&vessel, 0);

        let mid = trail.sprites(250).next().unwrap();
        assert!((mid.scale - 0.95).abs() < 1e-5);
        assert_eq!(mid.alpha, 80);

        trail.update(499);
        assert_eq!(trail.len(), 1);
        trail.update(500);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_wake_is_bounded() {
        let config = WakeConfig {
            max_particles: 3,
            spawn_ms: 1,
            ..WakeConfig::small()
        };
        let mut trail = WakeTrail::new(config);
        let vessel = vessel_at(0.0, 0.0, 0.0);
        for t in 0..10 {
            trail.spawn(&vessel, t);
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.particles.front().unwrap().born_ms, 7);
    }

    #[test]
    fn test_row_wake_fires_once_after_delay() {
        let tuning = Tuning::default();
        let mut wakes = Wakes::new(&tuning);
        let vessel = vessel_at(500.0, 300.0, 0.0);

        wakes.schedule_row_wake(120);
        wakes.update(&vessel, 100);
        assert!(wakes.rowing.is_empty());
        wakes.update(&vessel, 120);
        assert_eq!(wakes.rowing.len(), 1);
        wakes.update(&vessel, 400);
        assert_eq!(wakes.rowing.len(), 1);
        // Rowing wake sits under the waka
        let p = wakes.rowing.sprites(400).next().unwrap();
        assert!((p.pos - vessel.pos).length() < 1e-3);
    }

    #[test]
    fn test_big_wake_needs_rowing() {
        let tuning = Tuning::default();
        let mut wakes = Wakes::new(&tuning);
        let vessel = vessel_at(500.0, 300.0, 0.0);
        wakes.update(&vessel, 0);
        assert_eq!(wakes.small.len(), 1);
        assert!(wakes.big.is_empty());
    }

    #[test]
    fn test_catch_effect_timeline() {
        let effect = CatchEffect::new(Vec2::new(10.7, 20.2), 2, 1000, CatchEffectConfig::default());
        assert_eq!(effect.pos, Vec2::new(10.0, 20.0));

        match effect.visual(1060) {
            CatchVisual::Flash { size, .. } => assert!((size - 60.0).abs() < 1e-4),
            other => panic!("expected flash, got {:?}", other),
        }

        match effect.visual(1120 + 300) {
            CatchVisual::Icon { star, alpha, scale, .. } => {
                assert_eq!(star, 2);
                assert_eq!(alpha, 127);
                // p = 0.5 -> step 5 of 12
                assert!((scale - effect.step_scale(5)).abs() < 1e-6);
            }
            other => panic!("expected icon, got {:?}", other),
        }

        assert!(!effect.is_done(1720));
        assert!(effect.is_done(1721));
    }

    #[test]
    fn test_icon_scale_eases() {
        let effect = CatchEffect::new(Vec2::ZERO, 0, 0, CatchEffectConfig::default());
        let first = effect.step_scale(0);
        let middle = effect.step_scale(5);
        let last = effect.step_scale(11);
        assert!(middle > first);
        assert!((last - 0.6).abs() < 1e-5);
        assert!((middle - 1.0).abs() < 0.02);
    }
}
