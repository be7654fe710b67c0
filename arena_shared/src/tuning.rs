//! Gameplay tuning for timed entities.
//!
//! Rates are expressed per second and multiplied by the elapsed frame time,
//! so detonation and fade timing do not depend on the display refresh rate.
//! The defaults reproduce the feel of the original 60 updates/second loop.

use serde::{Deserialize, Serialize};

/// Nominal update rate the default rates were tuned against.
pub const BASELINE_HZ: f32 = 60.0;

/// Gameplay tuning for thrown projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Normalized flight progress gained per second.
    pub progress_rate: f32,

    /// Progress at which the projectile detonates.
    pub detonation_progress: f32,

    /// Flight time in seconds after which the projectile detonates regardless of progress.
    pub detonation_timeout: f32,

    /// Throws longer than this (world units) spin at `fast_spin_rate`.
    pub long_throw_distance: f32,

    /// Spin in radians per second for long throws.
    pub fast_spin_rate: f32,

    /// Spin in radians per second for short lobs.
    pub slow_spin_rate: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            progress_rate: 0.007 * BASELINE_HZ,
            detonation_progress: 0.7,
            detonation_timeout: 1.5,
            long_throw_distance: 100.0,
            fast_spin_rate: 0.1 * BASELINE_HZ,
            slow_spin_rate: 0.03 * BASELINE_HZ,
        }
    }
}

/// Gameplay tuning for area effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// Radius at which the effect is retired.
    pub max_radius: f32,

    /// Radius growth in world units per second.
    pub expand_speed: f32,

    /// Opacity lost per second.
    pub fade_speed: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            max_radius: 300.0,
            expand_speed: 20.0 * BASELINE_HZ,
            fade_speed: 0.06 * BASELINE_HZ,
        }
    }
}

/// Audible range of positional sounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundTuning {
    pub throw_max_distance: f32,
    pub detonation_max_distance: f32,
}

impl Default for SoundTuning {
    fn default() -> Self {
        Self {
            throw_max_distance: 800.0,
            detonation_max_distance: 1000.0,
        }
    }
}
