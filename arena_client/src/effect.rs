//! Area effects (expanding, fading rings).
//!
//! Removal is driven by radius alone. Opacity keeps decaying and may go below
//! zero while the ring is still expanding; renderers clamp it when drawing.

use arena_shared::{math::Vec2, tuning::EffectTuning};

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub opacity: f32,
}

/// Owns every live effect.
#[derive(Debug, Default)]
pub struct EffectSet {
    tuning: EffectTuning,
    live: Vec<Effect>,
}

impl EffectSet {
    pub fn new(tuning: EffectTuning) -> Self {
        Self {
            tuning,
            live: Vec::new(),
        }
    }

    pub fn spawn(&mut self, center: Vec2) {
        self.live.push(Effect {
            center,
            radius: 0.0,
            max_radius: self.tuning.max_radius,
            opacity: 1.0,
        });
    }

    /// Grows and fades every effect by `dt` seconds, retiring those that
    /// reached their maximum radius.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let tuning = self.tuning;
        self.live.retain_mut(|e| {
            e.radius += tuning.expand_speed * dt;
            e.opacity -= tuning.fade_speed * dt;
            e.radius < e.max_radius
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
