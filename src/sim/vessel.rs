//! Waka kinematics and the stroke state machine
//!
//! Per frame, in order: steering and braking from held keys, net cadence
//! step, stroke expiry, friction, stroke impulse (only with the net stowed),
//! position integration and toroidal wrap.

use glam::Vec2;

use super::net::Net;
use crate::tuning::Tuning;
use crate::{heading_vector, render_angle, wrap_coord};

/// Rowing stroke window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Idle,
    /// Impulse window opened at `started_ms` on the tick clock
    Active { started_ms: u64 },
}

/// The player's waka
#[derive(Debug, Clone)]
pub struct Vessel {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees, never normalized
    pub heading_deg: f32,
    pub net: Net,
    stroke: Stroke,
    /// Impulse applied this frame
    rowing: bool,
    frame: usize,
    frame_count: usize,
    frame_ms: u64,
    last_frame_ms: u64,
    last_splash_ms: Option<u64>,
}

impl Vessel {
    /// Centred on the playfield, at rest, facing the starting heading
    pub fn new(tuning: &Tuning, frame_count: usize, net_stages: usize) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            pos: Vec2::new(tuning.width / 2.0, tuning.height / 2.0),
            vel: Vec2::ZERO,
            heading_deg: tuning.start_heading_deg,
            net: Net::new(net_stages, tuning.net_step_ms),
            stroke: Stroke::Idle,
            rowing: false,
            frame: 0,
            frame_count,
            frame_ms: (tuning.stroke_ms / frame_count as u64).max(1),
            last_frame_ms: 0,
            last_splash_ms: None,
        }
    }

    #[inline]
    pub fn stroke(&self) -> Stroke {
        self.stroke
    }

    /// True on frames where a stroke impulse was applied
    #[inline]
    pub fn rowing(&self) -> bool {
        self.rowing
    }

    /// Current rowing animation frame
    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Rotation to draw (and collide) sprites with
    #[inline]
    pub fn render_angle(&self) -> f32 {
        render_angle(self.heading_deg)
    }

    /// Point `offset` pixels behind the waka centre
    pub fn point_behind(&self, offset: f32) -> Vec2 {
        self.pos - heading_vector(self.heading_deg) * offset
    }

    /// Held turn keys rotate immediately, no angular momentum
    pub fn steer(&mut self, left: bool, right: bool, tuning: &Tuning) {
        if left {
            self.heading_deg -= tuning.turn_rate_deg;
        }
        if right {
            self.heading_deg += tuning.turn_rate_deg;
        }
    }

    pub fn brake(&mut self, tuning: &Tuning) {
        self.vel *= tuning.brake;
    }

    /// Open a stroke window. Only accepted with no stroke running and the net stowed.
    pub fn begin_stroke(&mut self, now_ms: u64) -> bool {
        if self.stroke != Stroke::Idle || !self.net.is_idle() {
            return false;
        }
        log::debug!("Stroke at {} ms", now_ms);
        self.stroke = Stroke::Active { started_ms: now_ms };
        true
    }

    /// Explicit release
    pub fn end_stroke(&mut self) {
        self.stroke = Stroke::Idle;
    }

    /// Rate-limit row splashes: true if one may play now
    pub fn take_splash(&mut self, now_ms: u64, cooldown_ms: u64) -> bool {
        if let Some(last) = self.last_splash_ms {
            if now_ms.saturating_sub(last) < cooldown_ms {
                return false;
            }
        }
        self.last_splash_ms = Some(now_ms);
        true
    }

    /// Advance net, stroke and kinematics by one frame
    pub fn update(&mut self, now_ms: u64, tuning: &Tuning) {
        // Net first: a net deployed this frame must block this frame's impulse
        self.net.step(now_ms);

        if let Stroke::Active { started_ms } = self.stroke {
            if now_ms.saturating_sub(started_ms) > tuning.stroke_ms {
                log::debug!("Stroke window closed at {} ms", now_ms);
                self.stroke = Stroke::Idle;
            }
        }

        self.integrate(now_ms, tuning);
    }

    /// Impulse is allowed iff a stroke is open and the net is not active
    #[inline]
    pub fn propulsion_enabled(&self) -> bool {
        matches!(self.stroke, Stroke::Active { .. }) && !self.net.is_active()
    }

    fn integrate(&mut self, now_ms: u64, tuning: &Tuning) {
        self.vel *= tuning.friction;

        if self.propulsion_enabled() {
            self.vel += heading_vector(self.heading_deg) * tuning.stroke_thrust;
            self.rowing = true;
            if now_ms.saturating_sub(self.last_frame_ms) >= self.frame_ms {
                self.frame = (self.frame + 1) % self.frame_count;
                self.last_frame_ms = now_ms;
            }
        } else {
            self.rowing = false;
            self.frame = 0;
        }

        self.pos += self.vel;
        self.pos.x = wrap_coord(self.pos.x, tuning.width);
        self.pos.y = wrap_coord(self.pos.y, tuning.height);
    }

    /// Stop dead and cancel any stroke (round over)
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.stroke = Stroke::Idle;
        self.rowing = false;
        self.frame = 0;
    }
}
