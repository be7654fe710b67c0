//! Audio abstraction.
//!
//! The engine never plays sound itself. It hands positional cues to an
//! [`AudioSink`] with the volume already attenuated by the listener's distance.

use arena_shared::math::Vec2;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKey {
    Throw,
    Detonation,
}

impl SoundKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundKey::Throw => "throw",
            SoundKey::Detonation => "detonation",
        }
    }
}

/// A sound request at a world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub key: SoundKey,
    pub source: Vec2,
    pub max_distance: f32,
    /// In $[0,1]$.
    pub volume: f32,
}

impl SoundCue {
    pub fn new(key: SoundKey, listener: Vec2, source: Vec2, max_distance: f32) -> Self {
        Self {
            key,
            source,
            max_distance,
            volume: attenuate(listener, source, max_distance),
        }
    }
}

/// `max(0, 1 - distance / max_distance)`.
pub fn attenuate(listener: Vec2, source: Vec2, max_distance: f32) -> f32 {
    if max_distance <= 0.0 {
        return 0.0;
    }
    (1.0 - listener.distance(source) / max_distance).clamp(0.0, 1.0)
}

/// Sound playback boundary.
pub trait AudioSink: Send {
    fn play(&mut self, cue: &SoundCue);
}

/// Drops every cue.
#[derive(Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: &SoundCue) {}
}

/// Logs cues instead of playing them (headless runs).
#[derive(Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: &SoundCue) {
        debug!(
            sound = cue.key.as_str(),
            x = cue.source.x,
            y = cue.source.y,
            volume = cue.volume,
            "Sound cue"
        );
    }
}
