//! # Radio Daemon
//!
//! Owns the mpg123 player and serves the control socket the button agent,
//! the selector daemon and the streamer all talk to. Command set matches the
//! wire: `push`, `play`, `next`, `previous`, `stop` (alias `pause`).

use std::io;

use log::{info, warn};
use tokio::signal::unix::{SignalKind, signal};

use crate::core::config::ResolvedConfig;
use crate::net::{Notifier, control};
use crate::player::RadioPlayer;

pub async fn run(config: ResolvedConfig) -> io::Result<()> {
    let notifier = Notifier::new(config.notify_addr).await?;
    let mut player = RadioPlayer::new(
        config.radio_player,
        config.stations,
        config.cache_dir,
        notifier,
    );

    let listener = control::bind(&config.radio_socket)?;
    info!("radio: listening on {}", config.radio_socket.display());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sigusr2 = signal(SignalKind::user_defined2())?;

    loop {
        tokio::select! {
            command = control::recv_command(&listener) => match command {
                Ok(command) => handle_command(&mut player, &command).await?,
                Err(e) => warn!("radio: control socket error: {}", e),
            },
            _ = sigterm.recv() => break,
            _ = sigint.recv() => break,
            _ = sigusr1.recv() => {
                info!("radio: usr1");
                player.stop().await;
            }
            _ = sigusr2.recv() => {
                info!("radio: usr2");
                player.play_first().await?;
            }
        }
    }

    player.stop().await;
    info!("radio: bye");
    Ok(())
}

async fn handle_command(player: &mut RadioPlayer, command: &str) -> io::Result<()> {
    match command {
        "push" => player.push().await,
        "play" => player.play().await,
        "next" => player.next().await,
        "previous" => player.previous().await,
        "stop" | "pause" => {
            player.stop().await;
            Ok(())
        }
        other => {
            warn!("radio: unknown command {:?}", other);
            Ok(())
        }
    }
}
