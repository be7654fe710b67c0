//! Socket-level tests: a real client against the loopback fake server.

use std::collections::BTreeMap;
use std::time::Duration;

use arena_client::{audio::NullAudio, sync::ConnectionState, GameClient};
use arena_shared::{
    math::Vec2,
    net::{
        BombDropped, ClientMsg, PlayerData, PlayerMove, PlayerMoved, RegisterPlayer, ServerFull,
        ServerMsg, SessionId,
    },
};
use arena_tests::{init_tracing, step_until, FakeServer};

#[tokio::test]
async fn registers_then_applies_roster() -> anyhow::Result<()> {
    init_tracing();
    let server = FakeServer::bind().await?;
    let mut client =
        GameClient::connect(&server.client_config("  neo ")?, Box::new(NullAudio)).await?;
    let mut peer = server.accept("me").await?;

    step_until(&mut client, 500, |c| *c.state() == ConnectionState::Registered).await?;
    assert_eq!(
        peer.recv_within(Duration::from_secs(2)).await?,
        Some(ClientMsg::RegisterPlayer(RegisterPlayer {
            username: "neo".to_string()
        }))
    );

    let mut roster = BTreeMap::new();
    roster.insert(
        SessionId::from("me"),
        PlayerData {
            x: 100.0,
            y: 150.0,
            health: Some(70),
            color: Some("#112233".to_string()),
            ..PlayerData::default()
        },
    );
    roster.insert(
        SessionId::from("A"),
        PlayerData {
            x: 1.0,
            y: 2.0,
            ..PlayerData::default()
        },
    );
    peer.send(ServerMsg::CurrentPlayers(roster)).await?;
    peer.send(ServerMsg::PlayerMoved(PlayerMoved {
        id: "A".into(),
        x: 9.0,
        y: 9.0,
    }))
    .await?;

    step_until(&mut client, 500, |c| {
        c.session
            .store()
            .remote(&SessionId::from("A"))
            .is_some_and(|a| a.position == Vec2::new(9.0, 9.0))
    })
    .await?;
    for _ in 0..5 {
        client.step(arena_tests::FRAME).await;
    }

    let local = client.session.store().local();
    assert_eq!(local.position, Vec2::new(100.0, 150.0));
    assert_eq!(local.health, 70);
    assert_eq!(local.color, "#112233");
    assert_eq!(*client.state(), ConnectionState::Active);

    // The idle player only reports each distinct position once.
    let moves: Vec<PlayerMove> = peer
        .drain()
        .await?
        .into_iter()
        .filter_map(|m| match m {
            ClientMsg::PlayerMove(mv) => Some(mv),
            _ => None,
        })
        .collect();
    assert_eq!(moves.last(), Some(&PlayerMove { x: 100.0, y: 150.0 }));
    for pair in moves.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    Ok(())
}

#[tokio::test]
async fn server_full_rejects_and_closes() -> anyhow::Result<()> {
    init_tracing();
    let server = FakeServer::bind().await?;
    let mut client = GameClient::connect(&server.client_config("late")?, Box::new(NullAudio)).await?;
    let mut peer = server.accept("me").await?;
    peer.send(ServerMsg::ServerFull(ServerFull {
        message: "Server is full".to_string(),
    }))
    .await?;

    step_until(&mut client, 500, |c| *c.state() == ConnectionState::Rejected).await?;
    assert_eq!(client.session.take_notices(), vec!["Server is full".to_string()]);

    // The client hangs up; the server sees end-of-stream after any buffered frames.
    let mut closed = false;
    for _ in 0..10 {
        match peer.recv_within(Duration::from_millis(500)).await {
            Err(_) => {
                closed = true;
                break;
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
        }
    }
    assert!(closed, "client kept the connection open");

    // Terminal: further frames are not retried or applied.
    client.step(arena_tests::FRAME).await;
    assert_eq!(*client.state(), ConnectionState::Rejected);
    Ok(())
}

#[tokio::test]
async fn thrown_bomb_detonates_into_effect() -> anyhow::Result<()> {
    init_tracing();
    let server = FakeServer::bind().await?;
    let mut client = GameClient::connect(&server.client_config("ana")?, Box::new(NullAudio)).await?;
    let mut peer = server.accept("me").await?;

    step_until(&mut client, 500, |c| *c.state() == ConnectionState::Registered).await?;
    assert!(client.fire(700.0, 400.0));

    peer.send(ServerMsg::BombDropped(BombDropped {
        start_x: 20.0,
        start_y: 20.0,
        target_x: 400.0,
        target_y: 20.0,
        owner_id: Some("me".into()),
    }))
    .await?;

    step_until(&mut client, 500, |c| !c.session.projectiles().is_empty()).await?;
    step_until(&mut client, 200, |c| c.session.effects().len() == 1).await?;
    assert!(client.session.projectiles().is_empty());
    step_until(&mut client, 200, |c| c.session.effects().is_empty()).await?;

    let sent = peer.drain().await?;
    assert!(sent.iter().any(|m| matches!(
        m,
        ClientMsg::DropBomb(b) if b.id == SessionId::from("me") && b.start_x == 20.0
    )));
    Ok(())
}

#[tokio::test]
async fn peer_hangup_terminates_session() -> anyhow::Result<()> {
    init_tracing();
    let server = FakeServer::bind().await?;
    let mut client = GameClient::connect(&server.client_config("ana")?, Box::new(NullAudio)).await?;
    let peer = server.accept("me").await?;

    step_until(&mut client, 500, |c| *c.state() == ConnectionState::Registered).await?;
    drop(peer);
    step_until(&mut client, 500, |c| *c.state() == ConnectionState::Terminated).await?;
    assert!(!client.fire(10.0, 10.0));

    // A closed session keeps ticking locally but neither applies nor sends anything.
    let report = client.step(arena_tests::FRAME).await;
    assert_eq!(report.applied_events, 0);
    assert!(!report.moved);
    Ok(())
}
