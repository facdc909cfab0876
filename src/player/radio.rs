//! # Radio Player
//!
//! Supervises the mpg123 subprocess for the radio daemon. Keeps the current
//! station index, wraps in both directions, and pushes now-playing metadata
//! to the infoscreen: the station name immediately, then artist/title as
//! ICY metadata shows up on the player's stderr.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;

use crate::core::cache;
use crate::core::config::StationEntry;
use crate::net::Notifier;
use crate::player::icy::{self, TitleFormat};

pub struct RadioPlayer {
    command: Vec<String>,
    stations: Vec<StationEntry>,
    current: usize,
    notifier: Notifier,
    cache_dir: PathBuf,
    http: reqwest::Client,
    /// Stop handle for the running reader task. Closed = player exited.
    stop: Option<oneshot::Sender<()>>,
}

impl RadioPlayer {
    pub fn new(
        command: Vec<String>,
        stations: Vec<StationEntry>,
        cache_dir: PathBuf,
        notifier: Notifier,
    ) -> Self {
        Self {
            command,
            stations,
            current: 0,
            notifier,
            cache_dir,
            http: reqwest::Client::new(),
            stop: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stop.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    pub fn current_station(&self) -> Option<&StationEntry> {
        self.stations.get(self.current)
    }

    /// Play if idle, otherwise skip to the next station. The single-button
    /// behavior.
    pub async fn push(&mut self) -> io::Result<()> {
        if self.is_playing() {
            self.next().await
        } else {
            self.play().await
        }
    }

    pub async fn next(&mut self) -> io::Result<()> {
        if self.stations.is_empty() {
            return Ok(());
        }
        info!("radio: next station");
        self.current = (self.current + 1) % self.stations.len();
        self.play().await
    }

    pub async fn previous(&mut self) -> io::Result<()> {
        if self.stations.is_empty() {
            return Ok(());
        }
        info!("radio: previous station");
        self.current = (self.current + self.stations.len() - 1) % self.stations.len();
        self.play().await
    }

    /// Restart from the first station.
    pub async fn play_first(&mut self) -> io::Result<()> {
        self.current = 0;
        self.play().await
    }

    /// (Re)start playback of the current station.
    pub async fn play(&mut self) -> io::Result<()> {
        let Some(station) = self.stations.get(self.current).cloned() else {
            warn!("radio: no stations configured");
            return Ok(());
        };
        info!("radio: play {}", station.name);

        self.kill_player().await;

        if let Err(e) =
            cache::download_picon(&self.http, &self.cache_dir, &station.short, &station.image)
                .await
        {
            warn!("radio: station logo download failed: {}", e);
        }

        self.notifier.notify("infoscreen/music/title", &station.name).await;
        self.notifier.notify("infoscreen/music/artists", "").await;
        self.notifier.notify("infoscreen/music/image", &station.short).await;
        self.notifier.notify("infoscreen/music/playing", "true").await;

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty player command"))?;
        let mut child = Command::new(program)
            .args(args)
            .arg(&station.stream)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr = child.stderr.take().ok_or_else(|| {
            io::Error::other("player stderr not captured")
        })?;

        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop = Some(stop_tx);
        tokio::spawn(read_metadata(
            child,
            stderr,
            stop_rx,
            TitleFormat::from(&station),
            station.short.clone(),
            self.notifier.clone(),
        ));
        Ok(())
    }

    /// Stop playback and tell the display the music is gone.
    pub async fn stop(&mut self) {
        if let Some(station) = self.current_station() {
            info!("radio: stop {}", station.name);
        }
        self.kill_player().await;
        self.notifier.notify("infoscreen/music/playing", "false").await;
    }

    async fn kill_player(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Owns the child: scans its stderr for ICY metadata until the process exits
/// or a stop is commanded.
async fn read_metadata(
    mut child: tokio::process::Child,
    stderr: tokio::process::ChildStderr,
    mut stop_rx: oneshot::Receiver<()>,
    format: TitleFormat,
    image_key: String,
    notifier: Notifier,
) {
    let mut lines = BufReader::new(stderr).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some((artist, title)) = icy::parse_stream_title(&line, &format) {
                        info!("radio: now playing {} - {}", artist, title);
                        notifier.notify("infoscreen/music/title", &title).await;
                        notifier.notify("infoscreen/music/artists", &artist).await;
                        notifier.notify("infoscreen/music/image", &image_key).await;
                        notifier.notify("infoscreen/music/playing", "true").await;
                    }
                }
                // EOF or read error: the player is gone either way.
                Ok(None) => break,
                Err(e) => {
                    warn!("radio: stderr read failed: {}", e);
                    break;
                }
            },
            _ = &mut stop_rx => {
                if let Err(e) = child.start_kill() {
                    warn!("radio: kill failed: {}", e);
                }
                break;
            }
        }
    }

    let _ = child.wait().await;
}
