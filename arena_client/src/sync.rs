//! Synchronization controller.
//!
//! Inbound transport events are queued as [`Inbound`] commands and applied in
//! one batch at the start of a tick, so the entity store and projectile set
//! only ever have a single writer. Outbound events are collected in an outbox
//! that the transport drains after the tick.
//!
//! Connection lifecycle:
//! `Disconnected -> Connecting -> Connected -> Registered -> Active`,
//! ending in `Rejected` (server full) or `Terminated` (either side closed).

use std::collections::VecDeque;

use arena_shared::{
    math::Vec2,
    net::{ClientMsg, DropBomb, PlayerMove, RegisterPlayer, ServerMsg},
    tuning::SoundTuning,
};
use tracing::{debug, info, warn};

use crate::{
    audio::{AudioSink, SoundCue, SoundKey},
    projectile::ProjectileSet,
    store::EntityStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// Transport is open; the session id has not arrived yet.
    Connected,
    /// Session id assigned and registration sent.
    Registered,
    /// Roster received.
    Active,
    /// Server refused the session. Terminal.
    Rejected,
    /// Connection ended. Terminal.
    Terminated,
}

impl ConnectionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionState::Rejected | ConnectionState::Terminated)
    }

    /// Whether gameplay events may be sent.
    pub fn can_send(&self) -> bool {
        matches!(self, ConnectionState::Registered | ConnectionState::Active)
    }
}

/// A transport notification waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Opened,
    Server(ServerMsg),
    Closed { reason: String },
}

/// Subsystems the controller mutates while applying inbound events.
pub struct SyncTargets<'a> {
    pub store: &'a mut EntityStore,
    pub projectiles: &'a mut ProjectileSet,
    pub audio: &'a mut dyn AudioSink,
    pub sound: SoundTuning,
}

pub struct SyncController {
    state: ConnectionState,
    inbox: VecDeque<Inbound>,
    outbox: Vec<ClientMsg>,
    last_sent: Option<Vec2>,
    notices: Vec<String>,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncController {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            inbox: VecDeque::new(),
            outbox: Vec::new(),
            last_sent: None,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn begin_connect(&mut self) {
        if self.state == ConnectionState::Disconnected {
            self.state = ConnectionState::Connecting;
        }
    }

    pub fn enqueue(&mut self, event: Inbound) {
        self.inbox.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    /// Applies every queued inbound event in arrival order.
    pub fn apply_pending(&mut self, targets: &mut SyncTargets<'_>) -> usize {
        let mut applied = 0;
        while let Some(event) = self.inbox.pop_front() {
            self.apply(event, targets);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: Inbound, targets: &mut SyncTargets<'_>) {
        if self.state.is_closed() {
            debug!(?event, "Dropping event after session end");
            return;
        }
        match event {
            Inbound::Opened => {
                if matches!(
                    self.state,
                    ConnectionState::Disconnected | ConnectionState::Connecting
                ) {
                    self.state = ConnectionState::Connected;
                }
            }
            Inbound::Closed { reason } => {
                info!(reason = %reason, "Connection closed");
                self.state = ConnectionState::Terminated;
            }
            Inbound::Server(msg) => self.handle_server(msg, targets),
        }
    }

    fn handle_server(&mut self, msg: ServerMsg, t: &mut SyncTargets<'_>) {
        match msg {
            ServerMsg::Welcome(welcome) => {
                info!(id = %welcome.id, "Connected to server");
                t.store.set_local_id(welcome.id);
                self.outbox.push(ClientMsg::RegisterPlayer(RegisterPlayer {
                    username: t.store.local().username.clone(),
                }));
                self.state = ConnectionState::Registered;
            }
            ServerMsg::ServerFull(full) => {
                warn!(message = %full.message, "Server full");
                self.notices.push(full.message);
                self.state = ConnectionState::Rejected;
            }
            ServerMsg::CurrentPlayers(roster) => {
                if t.store.apply_roster(&roster) {
                    info!(players = roster.len(), "Roster received");
                    self.state = ConnectionState::Active;
                }
            }
            ServerMsg::NewPlayer(data) => {
                if t.store.add_remote(&data) {
                    info!(id = ?data.id, "Player joined");
                }
            }
            ServerMsg::PlayerMoved(moved) => {
                if !t.store.move_remote(&moved.id, Vec2::new(moved.x, moved.y)) {
                    debug!(id = %moved.id, "Move for unknown player");
                }
            }
            ServerMsg::BombDropped(bomb) => {
                let start = Vec2::new(bomb.start_x, bomb.start_y);
                let target = Vec2::new(bomb.target_x, bomb.target_y);
                t.projectiles.spawn(start, target, bomb.owner_id);
                t.audio.play(&SoundCue::new(
                    SoundKey::Throw,
                    t.store.local().position,
                    start,
                    t.sound.throw_max_distance,
                ));
            }
            ServerMsg::PlayerHealthUpdate(update) => {
                if !t.store.set_health(&update.id, update.health) {
                    debug!(id = %update.id, "Health for unknown player");
                }
            }
            ServerMsg::PlayerDisconnected(id) => {
                if t.store.remove_remote(&id) {
                    info!(id = %id, "Player left");
                }
            }
        }
    }

    /// Queues a movement update if `position` differs from the last one sent.
    pub fn flush_movement(&mut self, position: Vec2) -> bool {
        if !self.state.can_send() || self.last_sent == Some(position) {
            return false;
        }
        self.outbox.push(ClientMsg::PlayerMove(PlayerMove {
            x: position.x,
            y: position.y,
        }));
        self.last_sent = Some(position);
        true
    }

    /// Queues a throw from `start` toward `target` on behalf of the local player.
    pub fn request_throw(&mut self, store: &EntityStore, target: Vec2) -> bool {
        let Some(id) = store.local_id() else {
            debug!("Throw before session id assigned");
            return false;
        };
        if !self.state.can_send() {
            return false;
        }
        let start = store.local().position;
        self.outbox.push(ClientMsg::DropBomb(DropBomb {
            start_x: start.x,
            start_y: start.y,
            target_x: target.x,
            target_y: target.y,
            id: id.clone(),
        }));
        true
    }

    /// Ends the session from the local side.
    pub fn disconnect(&mut self) {
        if !self.state.is_closed() {
            info!("Disconnecting");
            self.state = ConnectionState::Terminated;
        }
        self.inbox.clear();
    }

    pub fn drain_outbox(&mut self) -> Vec<ClientMsg> {
        std::mem::take(&mut self.outbox)
    }

    /// User-facing messages (e.g. the server-full reason).
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use arena_shared::{
        config::ArenaConfig,
        net::{BombDropped, HealthUpdate, PlayerData, PlayerMoved, ServerFull, SessionId, Welcome},
        tuning::ProjectileTuning,
    };

    use super::*;
    use crate::audio::NullAudio;

    struct Fixture {
        sync: SyncController,
        store: EntityStore,
        projectiles: ProjectileSet,
        audio: NullAudio,
    }

    impl Fixture {
        fn new() -> Self {
            let mut cfg = ArenaConfig::default();
            cfg.player_name = "ana".to_string();
            Self {
                sync: SyncController::new(),
                store: EntityStore::new(&cfg),
                projectiles: ProjectileSet::new(ProjectileTuning::default()),
                audio: NullAudio,
            }
        }

        fn push(&mut self, msg: ServerMsg) {
            self.sync.enqueue(Inbound::Server(msg));
        }

        fn apply(&mut self) -> usize {
            let mut targets = SyncTargets {
                store: &mut self.store,
                projectiles: &mut self.projectiles,
                audio: &mut self.audio,
                sound: SoundTuning::default(),
            };
            self.sync.apply_pending(&mut targets)
        }

        fn welcome(&mut self, id: &str) {
            self.sync.begin_connect();
            self.sync.enqueue(Inbound::Opened);
            self.push(ServerMsg::Welcome(Welcome { id: id.into() }));
            self.apply();
        }
    }

    #[test]
    fn welcome_registers_with_username() {
        let mut f = Fixture::new();
        f.welcome("me");
        assert_eq!(f.sync.state(), &ConnectionState::Registered);
        assert_eq!(f.store.local_id(), Some(&SessionId::from("me")));
        assert_eq!(
            f.sync.drain_outbox(),
            vec![ClientMsg::RegisterPlayer(RegisterPlayer {
                username: "ana".to_string()
            })]
        );
    }

    #[test]
    fn events_wait_in_queue_until_applied() {
        let mut f = Fixture::new();
        f.welcome("me");
        f.push(ServerMsg::NewPlayer(PlayerData {
            id: Some("B".into()),
            ..PlayerData::default()
        }));
        assert_eq!(f.sync.pending(), 1);
        assert_eq!(f.store.remote_count(), 0);
        assert_eq!(f.apply(), 1);
        assert_eq!(f.store.remote_count(), 1);
    }

    #[test]
    fn roster_activates_session() {
        let mut f = Fixture::new();
        f.welcome("me");
        let mut roster = BTreeMap::new();
        roster.insert(SessionId::from("A"), PlayerData::default());
        f.push(ServerMsg::CurrentPlayers(roster));
        f.apply();
        assert_eq!(f.sync.state(), &ConnectionState::Active);
    }

    #[test]
    fn server_full_is_terminal() {
        let mut f = Fixture::new();
        f.sync.begin_connect();
        f.push(ServerMsg::ServerFull(ServerFull {
            message: "Server is full".to_string(),
        }));
        f.push(ServerMsg::Welcome(Welcome { id: "late".into() }));
        f.sync.enqueue(Inbound::Closed {
            reason: "eof".to_string(),
        });
        f.apply();

        assert_eq!(f.sync.state(), &ConnectionState::Rejected);
        assert_eq!(f.sync.take_notices(), vec!["Server is full".to_string()]);
        assert!(f.store.local_id().is_none());
        assert!(f.sync.drain_outbox().is_empty());
    }

    #[test]
    fn stale_move_after_disconnect_is_ignored() {
        let mut f = Fixture::new();
        f.welcome("me");
        f.push(ServerMsg::NewPlayer(PlayerData {
            id: Some("B".into()),
            ..PlayerData::default()
        }));
        f.push(ServerMsg::PlayerDisconnected("B".into()));
        f.push(ServerMsg::PlayerMoved(PlayerMoved {
            id: "B".into(),
            x: 1.0,
            y: 1.0,
        }));
        f.push(ServerMsg::PlayerHealthUpdate(HealthUpdate {
            id: "B".into(),
            health: 5,
        }));
        assert_eq!(f.apply(), 4);
        assert_eq!(f.store.remote_count(), 0);
    }

    #[test]
    fn bomb_dropped_spawns_projectile() {
        let mut f = Fixture::new();
        f.welcome("me");
        f.push(ServerMsg::BombDropped(BombDropped {
            start_x: 10.0,
            start_y: 10.0,
            target_x: 300.0,
            target_y: 10.0,
            owner_id: None,
        }));
        f.apply();
        assert_eq!(f.projectiles.len(), 1);
    }

    #[test]
    fn movement_is_deduplicated() {
        let mut f = Fixture::new();
        f.welcome("me");
        f.sync.drain_outbox();

        let p = Vec2::new(20.0, 20.0);
        assert!(f.sync.flush_movement(p));
        assert!(!f.sync.flush_movement(p));
        assert!(f.sync.flush_movement(Vec2::new(24.0, 20.0)));
        assert_eq!(f.sync.drain_outbox().len(), 2);
    }

    #[test]
    fn nothing_is_sent_before_registration() {
        let mut f = Fixture::new();
        assert!(!f.sync.flush_movement(Vec2::new(1.0, 1.0)));
        assert!(!f.sync.request_throw(&f.store, Vec2::new(5.0, 5.0)));
        assert!(f.sync.drain_outbox().is_empty());
    }

    #[test]
    fn throw_carries_local_position_and_id() {
        let mut f = Fixture::new();
        f.welcome("me");
        f.sync.drain_outbox();
        assert!(f.sync.request_throw(&f.store, Vec2::new(400.0, 500.0)));
        assert_eq!(
            f.sync.drain_outbox(),
            vec![ClientMsg::DropBomb(DropBomb {
                start_x: 0.0,
                start_y: 0.0,
                target_x: 400.0,
                target_y: 500.0,
                id: "me".into(),
            })]
        );
    }

    #[test]
    fn local_disconnect_terminates() {
        let mut f = Fixture::new();
        f.welcome("me");
        f.push(ServerMsg::NewPlayer(PlayerData {
            id: Some("B".into()),
            ..PlayerData::default()
        }));
        f.sync.disconnect();
        f.apply();
        assert_eq!(f.sync.state(), &ConnectionState::Terminated);
        assert_eq!(f.store.remote_count(), 0);
    }
}
