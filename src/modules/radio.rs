//! Radio menu entry. The actual playback lives in the radio daemon; this
//! module just proxies navigation onto its control socket, so selecting it
//! behaves like the hardware button: play if idle, otherwise next station.

use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, warn};

use crate::core::module::{Module, ModuleInfo};
use crate::net::control;

pub struct RadioModule {
    ctrl_socket: PathBuf,
}

impl RadioModule {
    pub const ID: &'static str = "radio";

    pub fn new(ctrl_socket: PathBuf) -> Self {
        Self { ctrl_socket }
    }

    async fn send(&self, command: &str) {
        if let Err(e) = control::send(&self.ctrl_socket, command).await {
            warn!("radio module: {} failed (daemon down?): {}", command, e);
        }
    }
}

#[async_trait]
impl Module for RadioModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            subtitle: "Webradio".to_string(),
            ..ModuleInfo::new(Self::ID, "Radio")
        }
    }

    async fn on_visible(&mut self) {
        debug!("radio module: on_visible");
    }

    async fn on_up(&mut self) {
        self.send("previous").await;
    }

    async fn on_down(&mut self) {
        self.send("next").await;
    }

    async fn on_select(&mut self, _selection: Option<usize>) {
        self.send("push").await;
    }

    async fn on_exit(&mut self) {
        debug!("radio module: on_exit");
        self.send("stop").await;
    }

    async fn on_terminate(&mut self) {
        self.send("stop").await;
    }
}
