//! Simulation clocks
//!
//! Two clocks advanced from the same `dt`:
//! - `ticks_ms`: monotonic milliseconds for cadences and cooldowns
//! - `wall_secs`: seconds since round start for countdown and fish expiry
//!
//! The driver must feed non-negative `dt`.

/// Paired tick/wall clock owned by the round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimClock {
    ticks_ms: u64,
    /// Sub-millisecond remainder carried into the next advance
    carry_ms: f64,
    wall_secs: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both clocks by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let dt = f64::from(dt.max(0.0));
        self.wall_secs += dt;

        let total_ms = dt * 1000.0 + self.carry_ms;
        // 0.09 * 1000 can land a hair under 90
        let whole = (total_ms + 1e-6).floor();
        self.ticks_ms = self.ticks_ms.saturating_add(whole as u64);
        self.carry_ms = (total_ms - whole).max(0.0);
    }

    #[inline]
    pub fn ticks_ms(&self) -> u64 {
        self.ticks_ms
    }

    #[inline]
    pub fn wall_secs(&self) -> f64 {
        self.wall_secs
    }
}
