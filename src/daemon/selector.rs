//! # Selector Daemon
//!
//! The dispatch loop around the module registry: navigation commands come in
//! on the control socket, registry events come back from the player monitor
//! and the YouTube submission server, and signals handle reset / refresh /
//! shutdown. The selector menu is in control whenever no module is active.

use std::io;
use std::sync::Arc;

use log::{info, warn};
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::{Mutex, mpsc};

use crate::core::config::ResolvedConfig;
use crate::core::event::{NavCommand, RegistryEvent};
use crate::core::module::Module;
use crate::core::registry::Registry;
use crate::modules::{RadioModule, SelectorMenu, TvNews, TvStreams, YouTube};
use crate::net::{Notifier, control};
use crate::player::Streamer;

pub async fn run(config: ResolvedConfig) -> io::Result<()> {
    let notifier = Notifier::new(config.notify_addr).await?;
    let (events_tx, mut events_rx) = mpsc::channel::<RegistryEvent>(32);

    let streamer = Arc::new(Mutex::new(Streamer::new(
        config.video_player.clone(),
        config.radio_socket.clone(),
        notifier.clone(),
        events_tx.clone(),
    )));

    let mut registry = Registry::new();
    registry.register(Box::new(RadioModule::new(config.radio_socket.clone())));
    registry.register(Box::new(TvNews::new(
        config.programs.clone(),
        config.cache_dir.clone(),
        notifier.clone(),
        streamer.clone(),
    )));
    registry.register(Box::new(TvStreams::new(
        config.channels.clone(),
        config.cache_dir.clone(),
        notifier.clone(),
        streamer.clone(),
    )));
    let youtube = YouTube::new(config.youtube_port, streamer.clone(), events_tx.clone());
    if !youtube.server_running() {
        warn!("selector: youtube submissions unavailable");
    }
    registry.register(Box::new(youtube));

    let menu = SelectorMenu::new(registry.infos(), notifier);
    let mut dispatcher = Dispatcher {
        registry,
        menu,
        streamer,
    };

    dispatcher.registry.refresh_all().await;
    dispatcher.reset().await;

    let listener = control::bind(&config.selector_socket)?;
    info!("selector: listening on {}", config.selector_socket.display());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sigusr2 = signal(SignalKind::user_defined2())?;

    loop {
        tokio::select! {
            command = control::recv_command(&listener) => match command {
                Ok(command) => match command.parse::<NavCommand>() {
                    Ok(nav) => dispatcher.handle_nav(nav).await,
                    Err(e) => warn!("selector: {}", e),
                },
                Err(e) => warn!("selector: control socket error: {}", e),
            },
            Some(event) = events_rx.recv() => dispatcher.handle_event(event).await,
            _ = sigterm.recv() => break,
            _ = sigint.recv() => break,
            _ = sigusr1.recv() => {
                info!("selector: usr1");
                dispatcher.reset().await;
            }
            _ = sigusr2.recv() => {
                info!("selector: usr2");
                dispatcher.registry.refresh_all().await;
                dispatcher.reset().await;
            }
        }
    }

    dispatcher.terminate().await;
    info!("selector: bye");
    Ok(())
}

/// Routes navigation and registry events between the menu, the modules and
/// the player.
pub struct Dispatcher {
    pub registry: Registry,
    pub menu: SelectorMenu,
    pub streamer: Arc<Mutex<Streamer>>,
}

impl Dispatcher {
    pub async fn handle_nav(&mut self, command: NavCommand) {
        match command {
            NavCommand::Up => match self.registry.active_mut() {
                Some(module) => module.on_up().await,
                None => self.menu.on_up().await,
            },
            NavCommand::Down => match self.registry.active_mut() {
                Some(module) => module.on_down().await,
                None => self.menu.on_down().await,
            },
            NavCommand::Select => match self.registry.active_mut() {
                Some(module) => module.on_select(None).await,
                None => {
                    if !self.registry.ready() {
                        warn!("selector: not all modules ready, ignoring select");
                        return;
                    }
                    let index = self.menu.selected();
                    self.menu.on_exit().await;
                    self.registry.activate(index).await;
                }
            },
            NavCommand::Exit => {
                if let Some(module) = self.registry.active_mut() {
                    module.on_exit().await;
                }
                self.reset().await;
            }
        }
    }

    pub async fn handle_event(&mut self, event: RegistryEvent) {
        match event {
            RegistryEvent::ModuleFinished => {
                // Idempotent: a commanded stop already reset to the menu.
                if self.registry.active_index().is_some() {
                    self.reset().await;
                }
            }
            RegistryEvent::SelfActivate(id) => {
                self.registry.self_activate(&id);
            }
            RegistryEvent::PlaySubmitted { url, start_time } => {
                if !self.registry.self_activate(YouTube::ID) {
                    return;
                }
                // Bind before matching so the streamer lock is released.
                let played = self.streamer.lock().await.play(&url, start_time).await;
                if let Err(e) = played {
                    warn!("selector: submitted playback failed: {}", e);
                    self.reset().await;
                }
            }
        }
    }

    /// Back to the menu. Safe to call when the menu is already in control.
    pub async fn reset(&mut self) {
        self.registry.reset();
        self.menu.on_visible().await;
    }

    /// Daemon shutdown: stop playback, terminate the active module, hide
    /// the menu.
    pub async fn terminate(&mut self) {
        self.streamer.lock().await.stop().await;
        self.registry.terminate().await;
        self.menu.on_terminate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::module::ModuleInfo;
    use crate::test_support::{CallLog, NoopModule, test_notifier, test_streamer};

    async fn dispatcher_with(ids: &[&str]) -> (Dispatcher, CallLog, mpsc::Receiver<RegistryEvent>) {
        let log = CallLog::new();
        let (notifier, _rx) = test_notifier().await;
        let (streamer, events_rx) = test_streamer(&["true"], notifier.clone());

        let mut registry = Registry::new();
        for id in ids {
            registry.register(Box::new(NoopModule::new(id, log.clone())));
        }
        registry.refresh_all().await;

        let infos: Vec<ModuleInfo> = registry.infos();
        let menu = SelectorMenu::new(infos, notifier);
        let dispatcher = Dispatcher {
            registry,
            menu,
            streamer: Arc::new(Mutex::new(streamer)),
        };
        (dispatcher, log, events_rx)
    }

    #[tokio::test]
    async fn test_select_activates_highlighted_module() {
        let (mut d, log, _rx) = dispatcher_with(&["radio", "tvnews"]).await;
        d.handle_nav(NavCommand::Down).await;
        d.handle_nav(NavCommand::Select).await;
        assert_eq!(d.registry.active_index(), Some(1));
        assert_eq!(log.take(), vec!["tvnews:on_visible"]);
    }

    #[tokio::test]
    async fn test_nav_routes_to_active_module() {
        let (mut d, log, _rx) = dispatcher_with(&["radio", "tvnews"]).await;
        d.handle_nav(NavCommand::Select).await;
        log.take();

        d.handle_nav(NavCommand::Up).await;
        d.handle_nav(NavCommand::Down).await;
        d.handle_nav(NavCommand::Select).await;
        assert_eq!(
            log.take(),
            vec!["radio:on_up", "radio:on_down", "radio:on_select"]
        );
    }

    #[tokio::test]
    async fn test_exit_returns_to_menu() {
        let (mut d, log, _rx) = dispatcher_with(&["radio"]).await;
        d.handle_nav(NavCommand::Select).await;
        log.take();

        d.handle_nav(NavCommand::Exit).await;
        assert_eq!(d.registry.active_index(), None);
        assert_eq!(log.take(), vec!["radio:on_exit"]);
    }

    #[tokio::test]
    async fn test_exit_on_menu_just_reshows_it() {
        let (mut d, log, _rx) = dispatcher_with(&["radio"]).await;
        d.handle_nav(NavCommand::Exit).await;
        assert_eq!(d.registry.active_index(), None);
        assert!(log.take().is_empty());
    }

    #[tokio::test]
    async fn test_module_finished_resets_once() {
        let (mut d, log, _rx) = dispatcher_with(&["radio"]).await;
        d.handle_nav(NavCommand::Select).await;
        log.take();

        d.handle_event(RegistryEvent::ModuleFinished).await;
        assert_eq!(d.registry.active_index(), None);
        // A second finish (stop raced with natural exit) changes nothing.
        d.handle_event(RegistryEvent::ModuleFinished).await;
        assert_eq!(d.registry.active_index(), None);
        assert!(log.take().is_empty());
    }

    #[tokio::test]
    async fn test_select_blocked_until_ready() {
        let log = CallLog::new();
        let (notifier, _rx) = test_notifier().await;
        let (streamer, _events_rx) = test_streamer(&["true"], notifier.clone());

        let mut registry = Registry::new();
        registry.register(Box::new(NoopModule::new("radio", log.clone())));
        // No refresh_all: registry not ready.
        let menu = SelectorMenu::new(registry.infos(), notifier);
        let mut d = Dispatcher {
            registry,
            menu,
            streamer: Arc::new(Mutex::new(streamer)),
        };

        d.handle_nav(NavCommand::Select).await;
        assert_eq!(d.registry.active_index(), None);
        assert!(log.take().is_empty());
    }

    #[tokio::test]
    async fn test_play_submitted_self_activates_youtube() {
        let (mut d, _log, _rx) = dispatcher_with(&["radio", "youtube"]).await;
        d.handle_event(RegistryEvent::PlaySubmitted {
            // `true` exits immediately; only the activation matters here.
            url: "ignored".to_string(),
            start_time: None,
        })
        .await;
        assert_eq!(d.registry.active_index(), Some(1));
    }

    #[tokio::test]
    async fn test_play_submitted_failure_resets_to_menu() {
        let log = CallLog::new();
        let (notifier, _rx) = test_notifier().await;
        // Empty player command: play() fails immediately.
        let (streamer, _events_rx) = test_streamer(&[], notifier.clone());

        let mut registry = Registry::new();
        registry.register(Box::new(NoopModule::new("youtube", log.clone())));
        registry.refresh_all().await;
        let menu = SelectorMenu::new(registry.infos(), notifier);
        let mut d = Dispatcher {
            registry,
            menu,
            streamer: Arc::new(Mutex::new(streamer)),
        };

        d.handle_event(RegistryEvent::PlaySubmitted {
            url: "x".to_string(),
            start_time: None,
        })
        .await;
        assert_eq!(d.registry.active_index(), None);
    }

    #[tokio::test]
    async fn test_play_submitted_for_missing_module_is_ignored() {
        let (mut d, _log, _rx) = dispatcher_with(&["radio"]).await;
        d.handle_event(RegistryEvent::PlaySubmitted {
            url: "x".to_string(),
            start_time: None,
        })
        .await;
        assert_eq!(d.registry.active_index(), None);
    }
}
