//! Networked client.
//!
//! Wraps a [`Session`] around a reliable connection:
//! - a reader task decodes server frames and forwards them over a channel
//! - `step` drains that channel into the session, ticks it, then flushes the
//!   outbox to the server
//!
//! The session is never touched by the reader task, so inbound application
//! and tick advancement stay serialized on the caller's task.

use std::net::SocketAddr;

use anyhow::Context;
use arena_shared::{
    config::ArenaConfig,
    net::{ReliableConn, ReliableReader, ReliableWriter, ServerMsg},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    audio::AudioSink,
    session::{Session, TickReport},
    sync::{ConnectionState, Inbound},
};

/// High-level game client.
pub struct GameClient {
    pub session: Session,
    writer: Option<ReliableWriter>,
    inbound_rx: mpsc::UnboundedReceiver<Inbound>,
    reader: JoinHandle<()>,
}

impl GameClient {
    /// Connects to the configured server. Registration happens once the
    /// server's welcome frame is applied by the first `step`.
    pub async fn connect(cfg: &ArenaConfig, audio: Box<dyn AudioSink>) -> anyhow::Result<Self> {
        let server_addr: SocketAddr = cfg.server_addr.parse().context("parse server_addr")?;
        let mut session = Session::new(cfg, audio);
        session.begin_connect();

        info!(server = %server_addr, "Connecting to server");
        let conn = ReliableConn::connect(server_addr).await?;
        let (reader, writer) = conn.into_split();

        let (tx, inbound_rx) = mpsc::unbounded_channel();
        // Opened goes first so it is applied before any server frame.
        let _ = tx.send(Inbound::Opened);
        let reader = tokio::spawn(read_loop(reader, tx));

        Ok(Self {
            session,
            writer: Some(writer),
            inbound_rx,
            reader,
        })
    }

    pub fn state(&self) -> &ConnectionState {
        self.session.state()
    }

    /// Moves every event received so far into the session queue.
    fn pump(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.inbound_rx.try_recv() {
            self.session.enqueue(event);
            n += 1;
        }
        n
    }

    /// Runs one frame: apply inbound, tick, send outbound.
    pub async fn step(&mut self, dt: f32) -> TickReport {
        self.pump();
        let report = self.session.tick(dt);
        self.flush().await;
        if self.session.is_closed() {
            self.close().await;
        }
        report
    }

    /// Requests a throw toward a viewport-space pointer position.
    pub fn fire(&mut self, screen_x: f32, screen_y: f32) -> bool {
        self.session.fire(screen_x, screen_y)
    }

    async fn flush(&mut self) {
        let outbox = self.session.drain_outbox();
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        for msg in outbox {
            if let Err(e) = writer.send(&msg).await {
                warn!(error = %e, "Send failed");
                self.session.enqueue(Inbound::Closed {
                    reason: format!("{e:#}"),
                });
                self.writer = None;
                return;
            }
        }
    }

    /// Ends the session locally and closes the socket.
    pub async fn disconnect(&mut self) {
        self.session.disconnect();
        self.close().await;
    }

    async fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.shutdown().await {
                debug!(error = %e, "Shutdown after close");
            }
            info!("Connection torn down");
        }
        self.reader.abort();
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(mut reader: ReliableReader, tx: mpsc::UnboundedSender<Inbound>) {
    loop {
        match reader.recv::<ServerMsg>().await {
            Ok(msg) => {
                debug!(?msg, "Received");
                if tx.send(Inbound::Server(msg)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Inbound::Closed {
                    reason: format!("{e:#}"),
                });
                break;
            }
        }
    }
}
