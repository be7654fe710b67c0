//! Test support: a loopback server speaking the client's wire protocol.
//!
//! The fake server has no game logic. Tests script exactly which events it
//! pushes and inspect what the client sends back.

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use arena_client::GameClient;
use arena_shared::{
    config::ArenaConfig,
    net::{ClientMsg, ReliableConn, ReliableListener, ServerMsg, Welcome},
};

/// Nominal frame time used by the tests.
pub const FRAME: f32 = 1.0 / 60.0;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub struct FakeServer {
    listener: ReliableListener,
}

impl FakeServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = ReliableListener::bind("127.0.0.1:0".parse()?).await?;
        Ok(Self { listener })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Client config pointing at this server.
    pub fn client_config(&self, name: &str) -> anyhow::Result<ArenaConfig> {
        Ok(ArenaConfig {
            server_addr: self.addr()?.to_string(),
            player_name: name.to_string(),
            ..ArenaConfig::default()
        })
    }

    /// Accepts one connection and greets it with `session_id`.
    pub async fn accept(&self, session_id: &str) -> anyhow::Result<FakePeer> {
        let (conn, _) = tokio::time::timeout(Duration::from_secs(5), self.listener.accept())
            .await
            .context("accept timed out")??;
        let mut peer = FakePeer { conn };
        peer.send(ServerMsg::Welcome(Welcome {
            id: session_id.into(),
        }))
        .await?;
        Ok(peer)
    }
}

/// Server side of one accepted connection.
pub struct FakePeer {
    conn: ReliableConn,
}

impl FakePeer {
    pub async fn send(&mut self, msg: ServerMsg) -> anyhow::Result<()> {
        self.conn.send(&msg).await
    }

    /// Next client event, `None` if nothing arrives within `wait`.
    /// Errors once the client has closed the connection.
    pub async fn recv_within(&mut self, wait: Duration) -> anyhow::Result<Option<ClientMsg>> {
        match tokio::time::timeout(wait, self.conn.recv::<ClientMsg>()).await {
            Ok(msg) => msg.map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Every client event that arrives until the line goes quiet.
    pub async fn drain(&mut self) -> anyhow::Result<Vec<ClientMsg>> {
        let mut out = Vec::new();
        while let Some(msg) = self.recv_within(Duration::from_millis(100)).await? {
            out.push(msg);
        }
        Ok(out)
    }
}

/// Steps the client at the nominal frame time until `done` holds.
pub async fn step_until<F>(client: &mut GameClient, max_frames: usize, mut done: F) -> anyhow::Result<()>
where
    F: FnMut(&GameClient) -> bool,
{
    for _ in 0..max_frames {
        client.step(FRAME).await;
        if done(client) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    anyhow::bail!("condition not reached within {max_frames} frames")
}
