//! Sound cues
//!
//! The simulation never plays audio itself. Each tick leaves [`GameEvent`]s in
//! the round state; [`AudioManager::play_events`] maps them to cues and hands
//! them to whatever backend implements [`AudioSink`]. Playback is
//! fire-and-forget.

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Paddle stroke
    RowSplash,
    /// Net deployed or pulled in
    NetFlip,
    /// Fish breaching
    FishSplash,
    /// Catch
    Coin,
    /// Spoken score after a catch
    Count(u32),
}

impl SoundCue {
    /// Mix level the cue was authored for
    pub fn volume(&self) -> f32 {
        match self {
            SoundCue::Coin => 0.2,
            SoundCue::RowSplash => 0.1,
            SoundCue::FishSplash => 0.5,
            SoundCue::NetFlip => 0.8,
            SoundCue::Count(_) => 0.9,
        }
    }
}

/// Audio backend
pub trait AudioSink {
    /// Start playing `cue` at `volume` (0.0 - 1.0) and return immediately
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Cues for one event, in playback order
pub fn cues_for(event: &GameEvent) -> Vec<SoundCue> {
    match *event {
        GameEvent::RowSplash => vec![SoundCue::RowSplash],
        GameEvent::NetFlip => vec![SoundCue::NetFlip],
        GameEvent::FishSplash => vec![SoundCue::FishSplash],
        GameEvent::FishCaught { score, .. } => vec![SoundCue::Coin, SoundCue::Count(score)],
        GameEvent::FishSpawned { .. } | GameEvent::RoundEnded { .. } => Vec::new(),
    }
}

/// Volume control in front of a sink
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a single cue
    pub fn play(&self, sink: &mut impl AudioSink, cue: SoundCue) {
        let vol = self.effective_volume() * cue.volume();
        if vol <= 0.0 {
            return;
        }
        sink.play(cue, vol);
    }

    /// Play every cue raised by the last tick
    pub fn play_events(&self, events: &[GameEvent], sink: &mut impl AudioSink) {
        for event in events {
            for cue in cues_for(event) {
                self.play(sink, cue);
            }
        }
    }
}
