//! # Video Streamer
//!
//! Supervises the single video player subprocess (cvlc by default). Starting
//! a stream stops whatever was playing, asks the radio daemon to release the
//! audio device, flips the overlay visible and spawns the player. A monitor
//! task owns the child: it waits for natural exit or a commanded stop, then
//! hides the overlay and reports `ModuleFinished` so the dispatcher resets
//! to the menu.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use log::{debug, info, warn};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

use crate::core::event::RegistryEvent;
use crate::net::{Notifier, control};

pub struct Streamer {
    command: Vec<String>,
    radio_socket: PathBuf,
    notifier: Notifier,
    events: mpsc::Sender<RegistryEvent>,
    /// Stop handle for the running monitor task. Closed = player exited.
    stop: Option<oneshot::Sender<()>>,
}

impl Streamer {
    pub fn new(
        command: Vec<String>,
        radio_socket: PathBuf,
        notifier: Notifier,
        events: mpsc::Sender<RegistryEvent>,
    ) -> Self {
        Self {
            command,
            radio_socket,
            notifier,
            events,
            stop: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stop.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Play `url`, replacing any running stream. `start_time` is seconds
    /// into the media.
    pub async fn play(&mut self, url: &str, start_time: Option<u32>) -> io::Result<()> {
        info!("streamer: play {}", url);
        self.stop().await;

        // The radio daemon holds the ALSA device; tell it to let go.
        if let Err(e) = control::send(&self.radio_socket, "stop").await {
            debug!("streamer: radio daemon not reachable: {}", e);
        }

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty player command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(secs) = start_time {
            cmd.arg(format!("--start-time={secs}"));
        }
        cmd.arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn()?;

        self.notifier.notify("infoscreen/overlay/visible", "true").await;
        self.notifier.notify("infoscreen/selector/visible", "false").await;

        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop = Some(stop_tx);
        tokio::spawn(monitor(child, stop_rx, self.notifier.clone(), self.events.clone()));
        Ok(())
    }

    /// Stop the running player, if any. Safe to call when idle.
    pub async fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // Monitor may already be gone after a natural exit.
            let _ = stop.send(());
        }
    }
}

async fn monitor(
    mut child: Child,
    stop_rx: oneshot::Receiver<()>,
    notifier: Notifier,
    events: mpsc::Sender<RegistryEvent>,
) {
    tokio::select! {
        status = child.wait() => match status {
            Ok(status) => info!("streamer: player exited ({})", status),
            Err(e) => warn!("streamer: wait failed: {}", e),
        },
        _ = stop_rx => {
            if let Err(e) = child.start_kill() {
                warn!("streamer: kill failed: {}", e);
            }
            let _ = child.wait().await;
            info!("streamer: player stopped");
        }
    }

    notifier.notify("infoscreen/overlay/visible", "false").await;
    let _ = events.send(RegistryEvent::ModuleFinished).await;
}
