//! Tick driver.
//!
//! A [`Session`] owns every piece of client state and advances it one frame at
//! a time. Each tick runs, in order:
//! 1. apply queued inbound events
//! 2. integrate local movement from held input, clamped to the world
//! 3. recompute the camera
//! 4. queue a movement update if the position changed
//! 5. advance projectiles, turning detonations into effects and sound cues
//! 6. advance effects

use arena_shared::{config::ArenaConfig, math::Vec2, net::ClientMsg, tuning::SoundTuning};

use crate::{
    audio::{AudioSink, SoundCue, SoundKey},
    effect::EffectSet,
    input::InputState,
    projectile::{Detonation, ProjectileSet},
    render::{EffectView, FrameSnapshot, PlayerView, ProjectileView},
    store::EntityStore,
    sync::{ConnectionState, Inbound, SyncController, SyncTargets},
};

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub applied_events: usize,
    pub moved: bool,
    pub detonations: Vec<Detonation>,
}

pub struct Session {
    world_size: f32,
    player_speed: f32,
    sound: SoundTuning,
    store: EntityStore,
    projectiles: ProjectileSet,
    effects: EffectSet,
    sync: SyncController,
    input: InputState,
    viewport: Vec2,
    camera: Vec2,
    audio: Box<dyn AudioSink>,
    tick: u64,
}

impl Session {
    pub fn new(cfg: &ArenaConfig, audio: Box<dyn AudioSink>) -> Self {
        Self {
            world_size: cfg.world_size,
            player_speed: cfg.player_speed,
            sound: cfg.sound,
            store: EntityStore::new(cfg),
            projectiles: ProjectileSet::new(cfg.projectile),
            effects: EffectSet::new(cfg.effect),
            sync: SyncController::new(),
            input: InputState::default(),
            viewport: Vec2::new(cfg.viewport_width, cfg.viewport_height),
            camera: Vec2::ZERO,
            audio,
            tick: 0,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        self.sync.state()
    }

    pub fn is_closed(&self) -> bool {
        self.sync.state().is_closed()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn projectiles(&self) -> &ProjectileSet {
        &self.projectiles
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Takes effect on the next camera update.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn begin_connect(&mut self) {
        self.sync.begin_connect();
    }

    /// Queues a transport event for the next tick.
    pub fn enqueue(&mut self, event: Inbound) {
        self.sync.enqueue(event);
    }

    pub fn disconnect(&mut self) {
        self.sync.disconnect();
    }

    /// Requests a throw toward a viewport-space pointer position.
    pub fn fire(&mut self, screen_x: f32, screen_y: f32) -> bool {
        let target = Vec2::new(screen_x, screen_y) + self.camera;
        self.sync.request_throw(&self.store, target)
    }

    pub fn drain_outbox(&mut self) -> Vec<ClientMsg> {
        self.sync.drain_outbox()
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        self.sync.take_notices()
    }

    /// Runs one simulation step of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let dt = dt.max(0.0);
        self.tick += 1;

        let applied_events = self.sync.apply_pending(&mut SyncTargets {
            store: &mut self.store,
            projectiles: &mut self.projectiles,
            audio: &mut *self.audio,
            sound: self.sound,
        });

        let velocity = self.input.velocity(self.player_speed);
        self.store
            .integrate_local_movement(velocity * dt, self.world_size);

        let local = self.store.local().position;
        self.camera = local - self.viewport * 0.5;

        let moved = self.sync.flush_movement(local);

        let detonations = self.projectiles.advance(dt);
        for d in &detonations {
            self.effects.spawn(d.position);
            self.audio.play(&SoundCue::new(
                SoundKey::Detonation,
                local,
                d.position,
                self.sound.detonation_max_distance,
            ));
        }

        self.effects.advance(dt);

        TickReport {
            applied_events,
            moved,
            detonations,
        }
    }

    /// Read-only view of the current state for a renderer.
    pub fn snapshot(&self) -> FrameSnapshot {
        let local = PlayerView::from_state(self.store.local_id(), self.store.local(), true);
        let remotes: Vec<PlayerView> = self
            .store
            .remotes()
            .map(|(id, p)| PlayerView::from_state(Some(id), p, false))
            .collect();
        FrameSnapshot {
            tick: self.tick,
            camera: self.camera,
            local,
            player_count: remotes.len() + 1,
            remotes,
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    position: p.position,
                    rotation: p.rotation,
                })
                .collect(),
            effects: self
                .effects
                .iter()
                .map(|e| EffectView {
                    center: e.center,
                    radius: e.radius,
                    opacity: e.opacity,
                })
                .collect(),
        }
    }
}
