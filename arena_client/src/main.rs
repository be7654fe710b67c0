//! Standalone headless client binary.
//!
//! Usage:
//!   cargo run -p arena_client -- [--addr 127.0.0.1:40000] [--name bob] [--config client.json] [--tick-hz 60]
//!
//! The client connects, registers, and runs the tick loop. Sound cues are
//! logged and frames go to a null renderer.
//!
//! Console commands:
//!   hold <keys...>     - Hold movement keys (w a s d / arrow names)
//!   release <keys...>  - Release movement keys
//!   throw <sx> <sy>    - Throw toward a viewport position
//!   status             - Show client status
//!   quit               - Disconnect and exit

use std::env;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use arena_client::{
    audio::LogAudio,
    render::{NullRenderer, RenderBackend},
    GameClient,
};
use arena_shared::config::{normalize_username, ArenaConfig};
use tokio::{sync::mpsc, time::Instant};
use tracing::info;

struct Args {
    config: Option<PathBuf>,
    addr: Option<String>,
    name: Option<String>,
    tick_hz: Option<u32>,
}

fn parse_args() -> Args {
    let mut out = Args {
        config: None,
        addr: None,
        name: None,
        tick_hz: None,
    };
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                out.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--addr" if i + 1 < args.len() => {
                out.addr = Some(args[i + 1].clone());
                i += 2;
            }
            "--name" if i + 1 < args.len() => {
                out.name = Some(args[i + 1].clone());
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                out.tick_hz = args[i + 1].parse().ok();
                i += 2;
            }
            _ => i += 1,
        }
    }
    out
}

fn load_config(args: Args) -> anyhow::Result<ArenaConfig> {
    let mut cfg = match &args.config {
        Some(path) => ArenaConfig::from_json_file(path)?,
        None => ArenaConfig::default(),
    };
    if let Some(addr) = args.addr {
        cfg.server_addr = addr;
    }
    if let Some(name) = args.name {
        cfg.player_name = name;
    }
    if let Some(hz) = args.tick_hz {
        cfg.tick_hz = hz;
    }
    cfg.player_name = normalize_username(&cfg.player_name);
    cfg.tick_hz = cfg.tick_hz.max(1);
    Ok(cfg)
}

/// Applies one console line. Returns false when the user asked to quit.
fn exec_console(client: &mut GameClient, line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["hold", keys @ ..] => {
            for key in keys {
                if !client.session.input_mut().press(key) {
                    println!("Unknown key: {key}");
                }
            }
        }
        ["release", keys @ ..] => {
            for key in keys {
                client.session.input_mut().release(key);
            }
        }
        ["throw", sx, sy] => match (sx.parse::<f32>(), sy.parse::<f32>()) {
            (Ok(x), Ok(y)) => {
                if !client.fire(x, y) {
                    println!("Not connected yet");
                }
            }
            _ => println!("Usage: throw <sx> <sy>"),
        },
        ["status"] => {
            let frame = client.session.snapshot();
            println!("State: {:?}", client.state());
            println!("Id: {:?}", frame.local.id);
            println!(
                "Position: ({:.1}, {:.1})  Health: {}",
                frame.local.position.x, frame.local.position.y, frame.local.health
            );
            println!("Players: {}", frame.player_count);
            println!(
                "Projectiles: {}  Effects: {}",
                frame.projectiles.len(),
                frame.effects.len()
            );
        }
        ["quit"] | ["exit"] => return false,
        [] => {}
        _ => println!("Unknown command: {line}"),
    }
    true
}

/// Forwards non-empty console lines until end of input or the receiver is gone.
fn read_console<R: BufRead, W: Write>(mut input: R, mut prompt: W, tx: mpsc::Sender<String>) {
    loop {
        let _ = write!(prompt, "] ");
        let _ = prompt.flush();
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim().to_string();
        if !line.is_empty() && tx.blocking_send(line).is_err() {
            break;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = load_config(parse_args()).context("load config")?;
    info!(server = %cfg.server_addr, name = %cfg.player_name, tick_hz = cfg.tick_hz, "Starting client");

    let mut client = GameClient::connect(&cfg, Box::new(LogAudio))
        .await
        .context("connect")?;
    let mut renderer = NullRenderer;

    // Set up console input channel.
    let (console_tx, mut console_rx) = mpsc::channel::<String>(32);

    // Spawn stdin reader thread.
    std::thread::spawn(move || {
        read_console(std::io::stdin().lock(), std::io::stdout(), console_tx);
    });

    let tick_interval = Duration::from_secs_f32(1.0 / cfg.tick_hz as f32);
    let mut next_tick = Instant::now();
    let mut last = Instant::now();

    loop {
        while let Ok(line) = console_rx.try_recv() {
            if !exec_console(&mut client, &line) {
                client.disconnect().await;
                return Ok(());
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let report = client.step(dt).await;
        renderer.draw(&client.session.snapshot());

        for notice in client.session.take_notices() {
            println!("{notice}");
        }
        if !report.detonations.is_empty() {
            info!(count = report.detonations.len(), "Detonation");
        }
        if client.session.is_closed() {
            println!("Disconnected from server.");
            break;
        }

        next_tick += tick_interval;
        tokio::time::sleep_until(next_tick).await;
    }

    Ok(())
}
