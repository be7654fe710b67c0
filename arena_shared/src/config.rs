//! Configuration system.
//!
//! Loads client configuration from JSON strings/files. Every field has a
//! default so partial files are accepted.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::tuning::{EffectTuning, ProjectileTuning, SoundTuning};

/// Root client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Server address, e.g. `127.0.0.1:40000`.
    #[serde(default = "default_server_addr")]
    pub server_addr: String,
    /// Display name sent on registration.
    #[serde(default = "default_player_name")]
    pub player_name: String,
    /// Frame rate of the headless tick loop.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Side length of the square world.
    #[serde(default = "default_world_size")]
    pub world_size: f32,
    /// Radius shared by every player in the session.
    #[serde(default = "default_player_size")]
    pub player_size: f32,
    /// Local movement speed in world units per second.
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    /// Local health before the server reports one.
    #[serde(default = "default_health")]
    pub default_health: i32,
    /// Local color before the server assigns one.
    #[serde(default = "default_color")]
    pub default_color: String,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    #[serde(default)]
    pub projectile: ProjectileTuning,
    #[serde(default)]
    pub effect: EffectTuning,
    #[serde(default)]
    pub sound: SoundTuning,
}

fn default_server_addr() -> String {
    "127.0.0.1:40000".to_string()
}

fn default_player_name() -> String {
    "Player".to_string()
}

fn default_tick_hz() -> u32 {
    60
}

fn default_world_size() -> f32 {
    3000.0
}

fn default_player_size() -> f32 {
    20.0
}

fn default_player_speed() -> f32 {
    240.0
}

fn default_health() -> i32 {
    90
}

fn default_color() -> String {
    "white".to_string()
}

fn default_viewport_width() -> f32 {
    1280.0
}

fn default_viewport_height() -> f32 {
    720.0
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            server_addr: default_server_addr(),
            player_name: default_player_name(),
            tick_hz: default_tick_hz(),
            world_size: default_world_size(),
            player_size: default_player_size(),
            player_speed: default_player_speed(),
            default_health: default_health(),
            default_color: default_color(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            projectile: ProjectileTuning::default(),
            effect: EffectTuning::default(),
            sound: SoundTuning::default(),
        }
    }
}

impl ArenaConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parse config {}", path.display()))
    }
}

/// Trims a user-entered name, falling back to `Player` when nothing is left.
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default_player_name()
    } else {
        trimmed.to_string()
    }
}
