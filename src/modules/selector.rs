//! # Selector Menu
//!
//! The menu the infoscreen shows between modules: one row per registered
//! module, a wrapping highlight, and select hands the highlighted index back
//! to the dispatcher.

use async_trait::async_trait;
use log::debug;

use crate::core::module::{EntryRef, Module, ModuleInfo};
use crate::net::{Notifier, SelectorEntry};

pub struct SelectorMenu {
    entries: Vec<ModuleInfo>,
    selection: usize,
    notifier: Notifier,
}

impl SelectorMenu {
    pub fn new(entries: Vec<ModuleInfo>, notifier: Notifier) -> Self {
        Self {
            entries,
            selection: 0,
            notifier,
        }
    }

    /// Index of the highlighted module, in registration order.
    pub fn selected(&self) -> usize {
        self.selection
    }

    fn selector_entries(&self) -> Vec<SelectorEntry> {
        self.entries
            .iter()
            .map(|info| SelectorEntry {
                title: info.title.clone(),
                picon: info.picon.clone(),
                subtitle: info.subtitle.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl Module for SelectorMenu {
    fn info(&self) -> ModuleInfo {
        ModuleInfo::new("selector", "Selector")
    }

    async fn on_visible(&mut self) {
        debug!("selector: on_visible");
        self.selection = 0;

        self.notifier.update_selection(self.selection).await;
        if let Err(e) = self
            .notifier
            .update_selector(&self.selector_entries(), &[])
            .await
        {
            log::warn!("selector: list update failed: {}", e);
        }
        self.notifier.notify("infoscreen/selector/visible", "true").await;
    }

    fn entries(&self) -> Vec<EntryRef> {
        self.entries
            .iter()
            .map(|info| EntryRef {
                id: info.id.clone(),
                title: info.title.clone(),
            })
            .collect()
    }

    async fn on_up(&mut self) {
        debug!("selector: up");
        if self.entries.is_empty() {
            return;
        }
        self.selection = (self.selection + self.entries.len() - 1) % self.entries.len();
        self.notifier.update_selection(self.selection).await;
    }

    async fn on_down(&mut self) {
        debug!("selector: down");
        if self.entries.is_empty() {
            return;
        }
        self.selection = (self.selection + 1) % self.entries.len();
        self.notifier.update_selection(self.selection).await;
    }

    async fn on_exit(&mut self) {
        debug!("selector: on_exit");
    }

    async fn on_terminate(&mut self) {
        debug!("selector: terminate");
        self.notifier.notify("infoscreen/selector/visible", "false").await;
    }
}
