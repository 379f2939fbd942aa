//! Per-frame orchestration
//!
//! Order within a playing frame:
//! 1. Input triggers (row, net) then held keys (steer, brake)
//! 2. Vessel update (net cadence, stroke expiry, kinematics)
//! 3. Wakes
//! 4. Fish spawn/expire and animation
//! 5. Catch test
//! 6. Catch effect pruning
//! 7. Terminal check
//!
//! Once the round is over only the centre lock and effect pruning still run.

use glam::Vec2;

use super::collision::try_catch;
use super::effects::CatchEffect;
use super::state::{GameEvent, Outcome, RoundPhase, RoundState};
use super::target::{expire, try_spawn};

/// Input snapshot for one frame
///
/// `*_pressed` / `*_released` are edges; when both land in the same frame the
/// release is applied first, so a re-tap carries over as a fresh press.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held
    pub turn_left: bool,
    /// Held
    pub turn_right: bool,
    /// Held
    pub brake: bool,
    pub row_pressed: bool,
    pub row_released: bool,
    pub net_pressed: bool,
    pub net_released: bool,
    /// Diagnostic centre lock (held, live even after the round ends)
    pub center_lock: bool,
}

/// Advance the round by `dt` seconds
pub fn tick(state: &mut RoundState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.clock.advance(dt);
    let now_ms = state.clock.ticks_ms();

    state.center_lock = input.center_lock;
    if state.center_lock {
        let center = playfield_center(state);
        if let Some(fish) = state.fish.as_mut() {
            fish.pos = center;
        }
    }

    if state.is_over() {
        state.wakes.prune(now_ms);
        state.catch_effects.retain(|e| !e.is_done(now_ms));
        return;
    }

    handle_triggers(state, input, now_ms);

    // Held keys
    state.vessel.steer(input.turn_left, input.turn_right, &state.tuning);
    if input.brake {
        state.vessel.brake(&state.tuning);
    }

    state.vessel.update(now_ms, &state.tuning);
    state.wakes.update(&state.vessel, now_ms);

    update_fish(state);
    check_catch(state, now_ms);
    state.catch_effects.retain(|e| !e.is_done(now_ms));

    check_round_end(state);
}

fn handle_triggers(state: &mut RoundState, input: &TickInput, now_ms: u64) {
    if input.row_released {
        state.vessel.end_stroke();
    }
    if input.row_pressed && state.vessel.begin_stroke(now_ms) {
        if state
            .vessel
            .take_splash(now_ms, state.tuning.row_splash_cooldown_ms)
        {
            state.events.push(GameEvent::RowSplash);
        }
        state
            .wakes
            .schedule_row_wake(now_ms.saturating_add(state.tuning.row_wake_delay_ms));
    }

    if input.net_released && state.vessel.net.retract() {
        state.events.push(GameEvent::NetFlip);
    }
    if input.net_pressed && state.vessel.net.deploy() {
        state.events.push(GameEvent::NetFlip);
    }
}

fn update_fish(state: &mut RoundState) {
    let spawned = try_spawn(
        &mut state.fish,
        &mut state.rng,
        &state.clock,
        &state.tuning,
        &state.bank.fish,
        state.center_lock,
    );
    if !spawned {
        expire(&mut state.fish, state.clock.wall_secs());
    }

    if let Some(fish) = state.fish.as_mut() {
        if spawned {
            state.events.push(GameEvent::FishSpawned { pos: fish.pos });
        }
        if fish.update(&state.clock) {
            state.events.push(GameEvent::FishSplash);
        }
    }
}

fn check_catch(state: &mut RoundState, now_ms: u64) {
    if !try_catch(&state.vessel, &state.bank.net, state.fish.as_ref()) {
        return;
    }
    let Some(fish) = state.fish.take() else {
        return;
    };

    state.score += 1;
    log::debug!(
        "Caught fish at ({:.0}, {:.0}), score {}",
        fish.pos.x,
        fish.pos.y,
        state.score
    );

    let star = state.star_for_score(state.score);
    state.catch_effects.push(CatchEffect::new(
        fish.pos,
        star,
        now_ms,
        state.tuning.catch_effect,
    ));
    state.events.push(GameEvent::FishCaught {
        score: state.score,
        pos: fish.pos,
    });
}

fn check_round_end(state: &mut RoundState) {
    let outcome = if state.score >= state.tuning.target_count {
        Outcome::Won
    } else if state.remaining_secs() <= 0.0 {
        Outcome::TimeUp
    } else {
        return;
    };

    state.vessel.halt();
    state.phase = RoundPhase::Ending {
        outcome,
        at_secs: state.clock.wall_secs(),
    };
    state.events.push(GameEvent::RoundEnded { outcome });
    log::info!(
        "Round over: {:?}, score {}/{} at {:.1}s",
        outcome,
        state.score,
        state.tuning.target_count,
        state.clock.wall_secs()
    );
}

fn playfield_center(state: &RoundState) -> Vec2 {
    let (w, h) = (state.tuning.width as i32, state.tuning.height as i32);
    Vec2::new((w / 2) as f32, (h / 2) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::net::NetState;
    use crate::sim::sprite::SpriteBank;
    use crate::sim::target::Fish;
    use crate::sim::vessel::Stroke;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn round(tuning: Tuning) -> RoundState {
        RoundState::new(42, tuning, SpriteBank::placeholder()).unwrap()
    }

    fn place_fish(state: &mut RoundState, pos: Vec2) {
        state.fish = Some(Fish::new(
            pos,
            &state.clock,
            &state.tuning,
            state.bank.fish.clone(),
        ));
    }

    #[test]
    fn test_net_cycle_at_stage_cadence() {
        let mut state = round(quiet_tuning());
        let press = TickInput {
            net_pressed: true,
            ..Default::default()
        };
        let idle = TickInput::default();

        tick(&mut state, &press, 0.09);
        assert_eq!(state.events, vec![GameEvent::NetFlip]);
        assert_eq!(state.vessel.net.state(), NetState::Extending { stage: 1 });
        tick(&mut state, &idle, 0.09);
        tick(&mut state, &idle, 0.09);
        assert_eq!(state.vessel.net.state(), NetState::Held);
        assert_eq!(state.vessel.net.stage(), 2);

        let release = TickInput {
            net_released: true,
            ..Default::default()
        };
        tick(&mut state, &release, 0.09);
        assert_eq!(state.vessel.net.state(), NetState::Retracting { stage: 1 });
        tick(&mut state, &idle, 0.09);
        tick(&mut state, &idle, 0.09);
        assert!(state.vessel.net.is_idle());
    }

    #[test]
    fn test_row_press_strokes_and_splashes() {
        let mut state = round(quiet_tuning());
        let press = TickInput {
            row_pressed: true,
            ..Default::default()
        };
        let release = TickInput {
            row_released: true,
            ..Default::default()
        };

        tick(&mut state, &press, DT);
        assert!(state.events.contains(&GameEvent::RowSplash));
        assert!(state.vessel.rowing());
        // Facing up the screen
        assert!(state.vessel.vel.y < 0.0);

        tick(&mut state, &release, DT);
        assert_eq!(state.vessel.stroke(), Stroke::Idle);

        // Second stroke inside the splash cooldown: accepted, but silent
        tick(&mut state, &press, DT);
        assert!(state.vessel.rowing());
        assert!(!state.events.contains(&GameEvent::RowSplash));
    }

    #[test]
    fn test_release_and_press_in_one_frame_restarts_stroke() {
        let mut state = round(quiet_tuning());
        let press = TickInput {
            row_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, DT);
        let started = state.vessel.stroke();

        let retap = TickInput {
            row_pressed: true,
            row_released: true,
            ..Default::default()
        };
        tick(&mut state, &retap, DT);
        assert!(matches!(state.vessel.stroke(), Stroke::Active { .. }));
        assert_ne!(state.vessel.stroke(), started);
        assert!(state.vessel.rowing());
    }

    #[test]
    fn test_rejected_net_trigger_is_silent() {
        let mut state = round(quiet_tuning());
        let release = TickInput {
            net_released: true,
            ..Default::default()
        };
        tick(&mut state, &release, DT);
        assert!(state.vessel.net.is_idle());
        assert!(!state.events.contains(&GameEvent::NetFlip));

        let press = TickInput {
            net_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, DT);
        tick(&mut state, &press, DT);
        assert!(!state.events.contains(&GameEvent::NetFlip));
    }

    #[test]
    fn test_row_wake_follows_trigger() {
        let mut state = round(quiet_tuning());
        let press = TickInput {
            row_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, DT);
        assert!(state.wakes.rowing.is_empty());
        for _ in 0..8 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.wakes.rowing.len(), 1);
    }

    #[test]
    fn test_rowing_ignored_with_net_out() {
        let mut state = round(quiet_tuning());
        let net = TickInput {
            net_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &net, DT);
        let row = TickInput {
            row_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &row, DT);
        assert_eq!(state.vessel.stroke(), Stroke::Idle);
        assert!(!state.events.contains(&GameEvent::RowSplash));
        assert_eq!(state.vessel.vel, Vec2::ZERO);
    }

    #[test]
    fn test_catch_scores_and_spawns_effect() {
        let mut state = round(quiet_tuning());
        let pos = state.vessel.pos;
        place_fish(&mut state, pos);

        let net = TickInput {
            net_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &net, DT);

        assert_eq!(state.score, 1);
        assert!(state.fish.is_none());
        assert_eq!(state.catch_effects.len(), 1);
        assert_eq!(state.catch_effects[0].star, 0);
        assert!(state.events.contains(&GameEvent::FishCaught { score: 1, pos }));
        assert!(!state.is_over());

        // Effect is gone once flash + icon have played
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.catch_effects.is_empty());
    }

    #[test]
    fn test_no_catch_with_net_stowed() {
        let mut state = round(quiet_tuning());
        let pos = state.vessel.pos;
        place_fish(&mut state, pos);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 0);
        assert!(state.fish.is_some());
    }

    #[test]
    fn test_score_target_ends_round_same_frame() {
        let mut state = round(Tuning {
            target_count: 1,
            ..quiet_tuning()
        });
        let pos = state.vessel.pos;
        place_fish(&mut state, pos);
        let net = TickInput {
            net_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &net, DT);

        assert_eq!(state.outcome(), Some(Outcome::Won));
        assert!(state.events.contains(&GameEvent::RoundEnded { outcome: Outcome::Won }));
        assert!(state.remaining_secs() > 59.0);
    }

    #[test]
    fn test_time_up_ends_round_below_target() {
        let mut state = round(Tuning {
            round_secs: 1.0,
            ..quiet_tuning()
        });
        let row = TickInput {
            row_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &row, 0.5);
        assert!(!state.is_over());
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.outcome(), Some(Outcome::TimeUp));
        assert_eq!(state.remaining_whole_secs(), 0);
        // Halted
        assert_eq!(state.vessel.vel, Vec2::ZERO);
        assert_eq!(state.vessel.stroke(), Stroke::Idle);
    }

    #[test]
    fn test_controls_ignored_after_end() {
        let mut state = round(Tuning {
            round_secs: 0.5,
            ..quiet_tuning()
        });
        tick(&mut state, &TickInput::default(), 0.5);
        assert!(state.is_over());

        let heading = state.vessel.heading_deg;
        let mash = TickInput {
            turn_left: true,
            row_pressed: true,
            net_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &mash, DT);
        assert_eq!(state.vessel.heading_deg, heading);
        assert_eq!(state.vessel.vel, Vec2::ZERO);
        assert!(state.vessel.net.is_idle());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_center_lock_pins_fish_even_after_end() {
        let mut state = round(Tuning {
            round_secs: 0.5,
            ..quiet_tuning()
        });
        tick(&mut state, &TickInput::default(), 0.5);
        assert!(state.is_over());

        place_fish(&mut state, Vec2::new(100.0, 200.0));
        let lock = TickInput {
            center_lock: true,
            ..Default::default()
        };
        tick(&mut state, &lock, DT);
        assert_eq!(state.fish.as_ref().unwrap().pos, Vec2::new(600.0, 340.0));
    }

    #[test]
    fn test_center_lock_spawns_centred() {
        let mut state = round(Tuning {
            spawn_chance: 1.0,
            ..Tuning::default()
        });
        let lock = TickInput {
            center_lock: true,
            ..Default::default()
        };
        tick(&mut state, &lock, DT);
        let center = Vec2::new(600.0, 340.0);
        assert!(state.events.contains(&GameEvent::FishSpawned { pos: center }));
        assert_eq!(state.fish.as_ref().unwrap().pos, center);
    }

    #[test]
    fn test_fish_expires_on_wall_clock() {
        let mut state = round(Tuning {
            fish_ttl_secs: 1.0,
            ..quiet_tuning()
        });
        place_fish(&mut state, Vec2::new(100.0, 600.0));
        tick(&mut state, &TickInput::default(), 0.5);
        assert!(state.fish.is_some());
        tick(&mut state, &TickInput::default(), 0.5);
        assert!(state.fish.is_none());
    }

    #[test]
    fn test_same_seed_same_round() {
        let script = |i: usize| TickInput {
            turn_left: i % 90 < 20,
            row_pressed: i % 30 == 0,
            row_released: i % 30 == 10,
            net_pressed: i % 120 == 60,
            net_released: i % 120 == 100,
            ..Default::default()
        };

        let mut a = round(Tuning::default());
        let mut b = round(Tuning::default());
        let mut events_a = Vec::new();
        let mut events_b = Vec::new();
        for i in 0..1200 {
            let input = script(i);
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
            events_a.extend(a.events.iter().copied());
            events_b.extend(b.events.iter().copied());
        }

        assert_eq!(a.vessel.pos, b.vessel.pos);
        assert_eq!(a.vessel.heading_deg, b.vessel.heading_deg);
        assert_eq!(a.score, b.score);
        assert_eq!(a.fish.as_ref().map(|f| f.pos), b.fish.as_ref().map(|f| f.pos));
        assert_eq!(events_a, events_b);
        assert!(events_a
            .iter()
            .any(|e| matches!(e, GameEvent::FishSpawned { .. })));
    }
}
