//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes only from the `dt` handed to [`tick`]
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod effects;
pub mod net;
pub mod sprite;
pub mod state;
pub mod target;
pub mod tick;
pub mod vessel;

pub use clock::SimClock;
pub use collision::{CatchTest, PixelRect, evaluate_catch, try_catch};
pub use effects::{CatchEffect, CatchVisual, WakeSprite, WakeTrail, Wakes};
pub use net::{Net, NetState};
pub use sprite::{Frame, FrameTable, Mask, Sprite, SpriteBank};
pub use state::{GameEvent, Outcome, RoundPhase, RoundState};
pub use target::Fish;
pub use tick::{TickInput, tick};
pub use vessel::{Stroke, Vessel};
