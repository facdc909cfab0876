//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use crate::core::event::RegistryEvent;
use crate::core::module::{Module, ModuleInfo};
use crate::net::Notifier;
use crate::player::Streamer;

/// Shared record of lifecycle calls, for asserting dispatch order.
#[derive(Clone)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// A do-nothing module that records which hooks fired.
pub struct NoopModule {
    id: String,
    log: CallLog,
}

impl NoopModule {
    pub fn new(id: &str, log: CallLog) -> Self {
        Self {
            id: id.to_string(),
            log,
        }
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{}:{}", self.id, hook));
    }
}

#[async_trait]
impl Module for NoopModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo::new(&self.id, &self.id)
    }

    async fn on_visible(&mut self) {
        self.record("on_visible");
    }

    async fn on_up(&mut self) {
        self.record("on_up");
    }

    async fn on_down(&mut self) {
        self.record("on_down");
    }

    async fn on_select(&mut self, _selection: Option<usize>) {
        self.record("on_select");
    }

    async fn on_exit(&mut self) {
        self.record("on_exit");
    }

    async fn on_terminate(&mut self) {
        self.record("on_terminate");
    }
}

/// A Notifier wired to a fresh local UDP socket, plus the receiving end.
pub async fn test_notifier() -> (Notifier, UdpSocket) {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = receiver.local_addr().unwrap();
    let notifier = Notifier::new(addr).await.unwrap();
    (notifier, receiver)
}

/// Receive one `path:data` datagram, panicking after a generous timeout.
pub async fn recv_notification(socket: &UdpSocket) -> String {
    let mut buf = [0u8; 1024];
    let n = tokio::time::timeout(Duration::from_secs(5), socket.recv(&mut buf))
        .await
        .expect("no notification arrived")
        .unwrap();
    String::from_utf8_lossy(&buf[..n]).to_string()
}

/// A Streamer with the given player command and a throwaway radio socket.
pub fn test_streamer(
    command: &[&str],
    notifier: Notifier,
) -> (Streamer, mpsc::Receiver<RegistryEvent>) {
    let (tx, rx) = mpsc::channel(8);
    let streamer = Streamer::new(
        command.iter().map(|s| s.to_string()).collect(),
        PathBuf::from("/tmp/infoscreen-test-missing.ctrl"),
        notifier,
        tx,
    );
    (streamer, rx)
}
