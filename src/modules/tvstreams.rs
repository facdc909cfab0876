//! Live TV module: the configured channel list, straight into the streamer.
//! Channel logos are cached under `tmp_` keys so an external cleanup job can
//! purge them.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::core::cache;
use crate::core::config::ChannelEntry;
use crate::core::module::{EntryRef, Module, ModuleError, ModuleInfo};
use crate::net::{Notifier, SelectorEntry};
use crate::player::streamer::Streamer;

const PICON_URL: &str = "https://cdn1.vectorstock.com/i/1000x1000/02/90/tv-icon-vector-13820290.jpg";

pub struct TvStreams {
    channels: Vec<ChannelEntry>,
    selection: Option<usize>,
    cache_dir: PathBuf,
    http: reqwest::Client,
    notifier: Notifier,
    streamer: Arc<Mutex<Streamer>>,
}

impl TvStreams {
    pub const ID: &'static str = "tvstreams";

    pub fn new(
        channels: Vec<ChannelEntry>,
        cache_dir: PathBuf,
        notifier: Notifier,
        streamer: Arc<Mutex<Streamer>>,
    ) -> Self {
        Self {
            channels,
            selection: None,
            cache_dir,
            http: reqwest::Client::new(),
            notifier,
            streamer,
        }
    }

    fn selector_entries(&self) -> Vec<SelectorEntry> {
        self.channels
            .iter()
            .map(|channel| SelectorEntry {
                title: channel.name.clone(),
                picon: cache::tmp_key(&channel.short),
                subtitle: String::new(),
            })
            .collect()
    }
}

#[async_trait]
impl Module for TvStreams {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            picon_url: Some(PICON_URL.to_string()),
            ..ModuleInfo::new(Self::ID, "Live TV")
        }
    }

    async fn refresh(&mut self) -> Result<(), ModuleError> {
        for channel in &self.channels {
            cache::download_picon(
                &self.http,
                &self.cache_dir,
                &cache::tmp_key(&channel.short),
                &channel.picon,
            )
            .await?;
        }
        Ok(())
    }

    async fn on_visible(&mut self) {
        debug!("tvstreams: on_visible");
        if !self.channels.is_empty() {
            self.selection = Some(0);
            self.notifier.update_selection(0).await;
        }
        if let Err(e) = self
            .notifier
            .update_selector(&self.selector_entries(), &[])
            .await
        {
            warn!("tvstreams: list update failed: {}", e);
        }
        self.notifier.notify("infoscreen/selector/visible", "true").await;
    }

    fn entries(&self) -> Vec<EntryRef> {
        self.channels
            .iter()
            .map(|channel| EntryRef {
                id: channel.short.clone(),
                title: channel.name.clone(),
            })
            .collect()
    }

    async fn on_up(&mut self) {
        debug!("tvstreams: up");
        let Some(selection) = self.selection else { return };
        let selection = (selection + self.channels.len() - 1) % self.channels.len();
        self.selection = Some(selection);
        self.notifier.update_selection(selection).await;
    }

    async fn on_down(&mut self) {
        debug!("tvstreams: down");
        let Some(selection) = self.selection else { return };
        let selection = (selection + 1) % self.channels.len();
        self.selection = Some(selection);
        self.notifier.update_selection(selection).await;
    }

    async fn on_select(&mut self, selection: Option<usize>) {
        debug!("tvstreams: select");
        let Some(index) = selection.or(self.selection) else { return };
        let Some(channel) = self.channels.get(index) else {
            warn!("tvstreams: selection {} out of range", index);
            return;
        };
        let stream = channel.stream.clone();
        if let Err(e) = self.streamer.lock().await.play(&stream, None).await {
            warn!("tvstreams: playback failed: {}", e);
        }
    }

    async fn on_exit(&mut self) {
        debug!("tvstreams: on_exit");
        self.streamer.lock().await.stop().await;
        self.selection = None;
    }

    async fn on_terminate(&mut self) {
        debug!("tvstreams: terminate");
        self.streamer.lock().await.stop().await;
        self.selection = None;
    }
}
