//! # TV News
//!
//! Plays recorded news programmes (Tagesschau and friends) from the EPG file
//! an external fetcher maintains in the cache dir. Entries are rendered with
//! a `DD.MM.YYYY, HH:MM - N min` subtitle; selecting one hands its video URL
//! to the streamer.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::core::cache;
use crate::core::config::ProgramEntry;
use crate::core::epg::{self, EpgEntry};
use crate::core::module::{EntryRef, Module, ModuleError, ModuleInfo};
use crate::net::{Notifier, SelectorEntry};
use crate::player::streamer::Streamer;

const PICON_URL: &str =
    "https://img.ardmediathek.de/standard/00/31/33/22/50/-2114473875/16x9/320?mandant=ard";

pub struct TvNews {
    programs: Vec<ProgramEntry>,
    epg: Vec<EpgEntry>,
    selection: Option<usize>,
    cache_dir: PathBuf,
    http: reqwest::Client,
    notifier: Notifier,
    streamer: Arc<Mutex<Streamer>>,
}

impl TvNews {
    pub const ID: &'static str = "tvnews";

    pub fn new(
        programs: Vec<ProgramEntry>,
        cache_dir: PathBuf,
        notifier: Notifier,
        streamer: Arc<Mutex<Streamer>>,
    ) -> Self {
        Self {
            programs,
            epg: Vec::new(),
            selection: None,
            cache_dir,
            http: reqwest::Client::new(),
            notifier,
            streamer,
        }
    }

    fn subtitle(entry: &EpgEntry) -> String {
        let date = Local
            .timestamp_opt(entry.published, 0)
            .single()
            .map(|d| d.format("%d.%m.%Y, %H:%M").to_string())
            .unwrap_or_default();
        format!("{} - {} min", date, entry.duration)
    }

    fn selector_entries(&self) -> Vec<SelectorEntry> {
        self.epg
            .iter()
            .filter_map(|entry| {
                let program = self.programs.get(entry.program_id)?;
                Some(SelectorEntry {
                    title: program.name.clone(),
                    picon: program.short.clone(),
                    subtitle: Self::subtitle(entry),
                })
            })
            .collect()
    }

    async fn update(&mut self) {
        if self.epg.is_empty() {
            self.selection = None;
        } else {
            self.selection = Some(0);
            self.notifier.update_selection(0).await;
        }
        if let Err(e) = self
            .notifier
            .update_selector(&self.selector_entries(), &[])
            .await
        {
            warn!("tvnews: list update failed: {}", e);
        }
    }
}

#[async_trait]
impl Module for TvNews {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            picon_url: Some(PICON_URL.to_string()),
            ..ModuleInfo::new(Self::ID, "Nachrichten")
        }
    }

    async fn refresh(&mut self) -> Result<(), ModuleError> {
        for program in &self.programs {
            cache::download_picon(&self.http, &self.cache_dir, &program.short, &program.picon)
                .await?;
        }
        self.epg = epg::load(&self.cache_dir)?;
        // The EPG may have shrunk underneath a stale selection.
        if self.selection.is_some_and(|s| s >= self.epg.len()) {
            self.selection = None;
        }
        info!("tvnews: {} programmes available", self.epg.len());
        Ok(())
    }

    async fn on_visible(&mut self) {
        debug!("tvnews: on_visible");
        self.update().await;
        self.notifier.notify("infoscreen/selector/visible", "true").await;
    }

    fn entries(&self) -> Vec<EntryRef> {
        self.epg
            .iter()
            .filter_map(|entry| {
                let program = self.programs.get(entry.program_id)?;
                Some(EntryRef {
                    id: program.short.clone(),
                    title: program.name.clone(),
                })
            })
            .collect()
    }

    async fn on_up(&mut self) {
        debug!("tvnews: up");
        if self.epg.is_empty() {
            return;
        }
        let Some(selection) = self.selection else { return };
        let selection = (selection + self.epg.len() - 1) % self.epg.len();
        self.selection = Some(selection);
        self.notifier.update_selection(selection).await;
    }

    async fn on_down(&mut self) {
        debug!("tvnews: down");
        if self.epg.is_empty() {
            return;
        }
        let Some(selection) = self.selection else { return };
        let selection = (selection + 1) % self.epg.len();
        self.selection = Some(selection);
        self.notifier.update_selection(selection).await;
    }

    async fn on_select(&mut self, selection: Option<usize>) {
        debug!("tvnews: select");
        let Some(index) = selection.or(self.selection) else { return };
        let Some(entry) = self.epg.get(index) else {
            warn!("tvnews: selection {} out of range", index);
            return;
        };
        let video = entry.video.clone();
        if let Err(e) = self.streamer.lock().await.play(&video, None).await {
            warn!("tvnews: playback failed: {}", e);
        }
    }

    async fn on_exit(&mut self) {
        debug!("tvnews: on_exit");
        self.streamer.lock().await.stop().await;
        self.selection = None;
    }

    async fn on_terminate(&mut self) {
        debug!("tvnews: terminate");
        self.streamer.lock().await.stop().await;
        self.selection = None;
    }
}
