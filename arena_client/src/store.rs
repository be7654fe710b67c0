//! Entity store.
//!
//! Holds the local player and every remote player keyed by session id.
//! Remote positions mirror the server verbatim; only the local player is
//! clamped to the world bounds. Lookups on unknown ids are silent no-ops:
//! late events for a disconnected player are expected, not errors.

use std::collections::BTreeMap;

use arena_shared::{
    color::random_hex_color,
    config::{normalize_username, ArenaConfig},
    math::Vec2,
    net::{PlayerData, SessionId},
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

pub const MIN_HEALTH: i32 = 0;
pub const MAX_HEALTH: i32 = 100;

/// State shared by the local and remote players.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub username: String,
    pub position: Vec2,
    pub size: f32,
    pub color: String,
    pub health: i32,
}

fn clamp_health(health: i32) -> i32 {
    health.clamp(MIN_HEALTH, MAX_HEALTH)
}

/// Local + remote player state for one session.
pub struct EntityStore {
    local_id: Option<SessionId>,
    local: PlayerState,
    remotes: BTreeMap<SessionId, PlayerState>,
    default_health: i32,
    roster_applied: bool,
    rng: StdRng,
}

impl EntityStore {
    pub fn new(cfg: &ArenaConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Uses the given generator for fallback colors.
    pub fn with_rng(cfg: &ArenaConfig, rng: StdRng) -> Self {
        Self {
            local_id: None,
            local: PlayerState {
                username: normalize_username(&cfg.player_name),
                position: Vec2::ZERO,
                size: cfg.player_size,
                color: cfg.default_color.clone(),
                health: clamp_health(cfg.default_health),
            },
            remotes: BTreeMap::new(),
            default_health: clamp_health(cfg.default_health),
            roster_applied: false,
            rng,
        }
    }

    pub fn local_id(&self) -> Option<&SessionId> {
        self.local_id.as_ref()
    }

    pub fn set_local_id(&mut self, id: SessionId) {
        self.local_id = Some(id);
    }

    pub fn local(&self) -> &PlayerState {
        &self.local
    }

    pub fn remote(&self, id: &SessionId) -> Option<&PlayerState> {
        self.remotes.get(id)
    }

    /// Remote players in id order.
    pub fn remotes(&self) -> impl Iterator<Item = (&SessionId, &PlayerState)> {
        self.remotes.iter()
    }

    pub fn remote_count(&self) -> usize {
        self.remotes.len()
    }

    fn is_local(&self, id: &SessionId) -> bool {
        self.local_id.as_ref() == Some(id)
    }

    fn remote_from(&mut self, data: &PlayerData) -> PlayerState {
        let color = match &data.color {
            Some(c) if !c.is_empty() => c.clone(),
            _ => random_hex_color(&mut self.rng),
        };
        PlayerState {
            username: normalize_username(data.username.as_deref().unwrap_or_default()),
            position: Vec2::new(data.x, data.y),
            size: self.local.size,
            color,
            health: data.health.map(clamp_health).unwrap_or(self.default_health),
        }
    }

    /// Applies the initial roster. Only the first call has any effect.
    ///
    /// The entry matching the local id seeds the local player's position,
    /// color and health; every other entry becomes a remote player.
    pub fn apply_roster(&mut self, roster: &BTreeMap<SessionId, PlayerData>) -> bool {
        if self.roster_applied {
            debug!(entries = roster.len(), "Ignoring repeated roster");
            return false;
        }
        self.roster_applied = true;

        for (id, data) in roster {
            if self.is_local(id) {
                self.local.position = Vec2::new(data.x, data.y);
                if let Some(color) = data.color.as_ref().filter(|c| !c.is_empty()) {
                    self.local.color = color.clone();
                }
                if let Some(health) = data.health {
                    self.local.health = clamp_health(health);
                }
            } else {
                let state = self.remote_from(data);
                self.remotes.insert(id.clone(), state);
            }
        }
        true
    }

    /// Inserts (or replaces) a remote player. Self-echoes and id-less
    /// records are ignored.
    pub fn add_remote(&mut self, data: &PlayerData) -> bool {
        let Some(id) = data.id.clone() else {
            debug!("Ignoring player record without id");
            return false;
        };
        if self.is_local(&id) {
            return false;
        }
        let state = self.remote_from(data);
        self.remotes.insert(id, state);
        true
    }

    pub fn move_remote(&mut self, id: &SessionId, position: Vec2) -> bool {
        match self.remotes.get_mut(id) {
            Some(p) => {
                p.position = position;
                true
            }
            None => false,
        }
    }

    /// Routes a health value to the local player or a known remote.
    pub fn set_health(&mut self, id: &SessionId, health: i32) -> bool {
        if self.is_local(id) {
            self.local.health = clamp_health(health);
            return true;
        }
        match self.remotes.get_mut(id) {
            Some(p) => {
                p.health = clamp_health(health);
                true
            }
            None => false,
        }
    }

    pub fn remove_remote(&mut self, id: &SessionId) -> bool {
        self.remotes.remove(id).is_some()
    }

    /// Moves the local player by `delta`, then clamps it into
    /// `[size, world_size - size]` on both axes.
    pub fn integrate_local_movement(&mut self, delta: Vec2, world_size: f32) {
        let size = self.local.size;
        let next = self.local.position + delta;
        self.local.position = next.clamp_axes(size, (world_size - size).max(size));
    }
}
