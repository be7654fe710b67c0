//! Rendering abstraction.
//!
//! The engine does not draw. After each tick it produces a [`FrameSnapshot`]
//! that a renderer implementation consumes.

use arena_shared::{math::Vec2, net::SessionId};
use serde::Serialize;

use crate::store::{PlayerState, MAX_HEALTH};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: Option<SessionId>,
    pub label: String,
    pub position: Vec2,
    pub size: f32,
    pub color: String,
    pub health: i32,
    /// Health bar fill in $[0,1]$.
    pub health_ratio: f32,
    pub is_local: bool,
}

impl PlayerView {
    pub(crate) fn from_state(id: Option<&SessionId>, state: &PlayerState, is_local: bool) -> Self {
        Self {
            id: id.cloned(),
            label: state.username.clone(),
            position: state.position,
            size: state.size,
            color: state.color.clone(),
            health: state.health,
            health_ratio: state.health.max(0) as f32 / MAX_HEALTH as f32,
            is_local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectView {
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub camera: Vec2,
    pub local: PlayerView,
    /// Remote players in id order.
    pub remotes: Vec<PlayerView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    /// Remote players plus the local one.
    pub player_count: usize,
}

/// A minimal rendering API.
pub trait RenderBackend: Send {
    fn draw(&mut self, frame: &FrameSnapshot);
}

/// A no-op renderer useful for headless runs and tests.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn draw(&mut self, _frame: &FrameSnapshot) {}
}
