//! Net deployment state machine
//!
//! The stage index lives inside the state variant, so an idle net can never
//! carry a non-zero stage and a held net is always at the last stage.

/// Deployment state, carrying the current stage where it varies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetState {
    /// Stowed, stage 0
    Idle,
    /// Opening one stage per cadence step
    Extending { stage: usize },
    /// Fully open at the max stage
    Held,
    /// Closing one stage per cadence step
    Retracting { stage: usize },
}

/// The waka's net
#[derive(Debug, Clone)]
pub struct Net {
    state: NetState,
    max_stage: usize,
    step_ms: u64,
    last_step_ms: u64,
}

impl Net {
    /// `stage_count` comes from the net frame table (at least 1)
    pub fn new(stage_count: usize, step_ms: u64) -> Self {
        Self {
            state: NetState::Idle,
            max_stage: stage_count.saturating_sub(1),
            step_ms,
            last_step_ms: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> NetState {
        self.state
    }

    #[inline]
    pub fn max_stage(&self) -> usize {
        self.max_stage
    }

    /// Current extension depth, 0 = fully retracted
    pub fn stage(&self) -> usize {
        match self.state {
            NetState::Idle => 0,
            NetState::Extending { stage } | NetState::Retracting { stage } => stage,
            NetState::Held => self.max_stage,
        }
    }

    /// Catch window open, rowing blocked
    pub fn is_active(&self) -> bool {
        self.stage() > 0 || matches!(self.state, NetState::Extending { .. } | NetState::Held)
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == NetState::Idle
    }

    /// Start (or resume) opening. Returns false if already opening or open.
    pub fn deploy(&mut self) -> bool {
        let next = match self.state {
            NetState::Idle => NetState::Extending { stage: 0 },
            NetState::Retracting { stage } => NetState::Extending { stage },
            NetState::Extending { .. } | NetState::Held => return false,
        };
        log::debug!("Net {:?} -> {:?}", self.state, next);
        self.state = next;
        true
    }

    /// Start closing. Returns false if already closing or stowed.
    pub fn retract(&mut self) -> bool {
        let next = match self.state {
            NetState::Extending { stage } => NetState::Retracting { stage },
            NetState::Held => NetState::Retracting {
                stage: self.max_stage,
            },
            NetState::Idle | NetState::Retracting { .. } => return false,
        };
        log::debug!("Net {:?} -> {:?}", self.state, next);
        self.state = next;
        true
    }

    /// Advance one stage if the cadence has elapsed since the last step
    pub fn step(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_step_ms) < self.step_ms {
            return;
        }
        self.last_step_ms = now_ms;

        self.state = match self.state {
            NetState::Extending { stage } if stage < self.max_stage => {
                NetState::Extending { stage: stage + 1 }
            }
            NetState::Extending { .. } => NetState::Held,
            NetState::Retracting { stage } if stage > 0 => {
                NetState::Retracting { stage: stage - 1 }
            }
            NetState::Retracting { .. } => NetState::Idle,
            other => other,
        };
    }
}
