//! `arena_client`
//!
//! Client-side state engine:
//! - Entity store (local + remote players)
//! - Projectile and effect simulation, frame-rate independent
//! - Synchronization controller (inbound queue, outbound dedup)
//! - Tick driver producing render snapshots
//! - Audio/render collaborator boundaries and networked client glue

pub mod audio;
pub mod client;
pub mod effect;
pub mod input;
pub mod projectile;
pub mod render;
pub mod session;
pub mod store;
pub mod sync;

pub use client::GameClient;
pub use session::Session;
