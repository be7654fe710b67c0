//! Thrown projectiles.
//!
//! A projectile travels from `start` toward `target` along an ease-out cubic
//! curve and detonates when its progress crosses the detonation threshold or
//! its age crosses the timeout, whichever happens first. Detonated projectiles
//! leave the live set in the same advance that detonates them.

use arena_shared::{
    math::{ease_out_cubic, Vec2},
    net::SessionId,
    tuning::ProjectileTuning,
};
use tracing::debug;

/// One projectile in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub start: Vec2,
    pub target: Vec2,
    pub position: Vec2,
    /// Normalized flight progress, starts at 0.
    pub progress: f32,
    /// Cumulative spin in radians.
    pub rotation: f32,
    /// Seconds since spawn.
    pub age: f32,
    pub owner_id: Option<SessionId>,
    pub exploded: bool,
    spin_rate: f32,
}

/// Emitted once per projectile when it detonates.
#[derive(Debug, Clone, PartialEq)]
pub struct Detonation {
    pub position: Vec2,
    pub owner_id: Option<SessionId>,
}

/// Owns every live projectile.
#[derive(Debug, Default)]
pub struct ProjectileSet {
    tuning: ProjectileTuning,
    live: Vec<Projectile>,
}

impl ProjectileSet {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            tuning,
            live: Vec::new(),
        }
    }

    pub fn spawn(&mut self, start: Vec2, target: Vec2, owner_id: Option<SessionId>) {
        let spin_rate = if start.distance(target) > self.tuning.long_throw_distance {
            self.tuning.fast_spin_rate
        } else {
            self.tuning.slow_spin_rate
        };
        debug!(?start, ?target, owner = ?owner_id, "Projectile spawned");
        self.live.push(Projectile {
            start,
            target,
            position: start,
            progress: 0.0,
            rotation: 0.0,
            age: 0.0,
            owner_id,
            exploded: false,
            spin_rate,
        });
    }

    /// Advances every projectile by `dt` seconds and returns this tick's
    /// detonations.
    pub fn advance(&mut self, dt: f32) -> Vec<Detonation> {
        let dt = dt.max(0.0);
        let tuning = self.tuning;
        let mut detonations = Vec::new();

        self.live.retain_mut(|p| {
            p.age += dt;
            p.progress += tuning.progress_rate * dt;
            let eased = ease_out_cubic(p.progress.min(1.0));
            p.position = p.start.lerp(p.target, eased);
            p.rotation += p.spin_rate * dt;

            if p.progress >= tuning.detonation_progress || p.age >= tuning.detonation_timeout {
                p.exploded = true;
                debug!(position = ?p.position, progress = p.progress, age = p.age, "Projectile detonated");
                detonations.push(Detonation {
                    position: p.position,
                    owner_id: p.owner_id.take(),
                });
                return false;
            }
            true
        });

        detonations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
