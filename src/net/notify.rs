//! # Infoscreen Notifications
//!
//! The display process is an external collaborator listening on one port for
//! two things:
//!
//! - UDP datagrams `path:data` for tiny state pushes (visibility flags,
//!   now-playing metadata, the 1-based menu selection)
//! - a TCP handshake for bulk selector list updates: greeting, `selector\n`,
//!   ack, then one JSON line `{"entries": [...], "messages": [...]}`
//!
//! Notifications are fire-and-forget; a dead display must never take a
//! daemon down with it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

/// One row of the selector list as the display renders it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectorEntry {
    pub title: String,
    pub picon: String,
    pub subtitle: String,
}

#[derive(Serialize)]
struct SelectorUpdate<'a> {
    entries: &'a [SelectorEntry],
    messages: &'a [String],
}

/// Cheap-to-clone handle for pushing state to the infoscreen display.
#[derive(Clone)]
pub struct Notifier {
    socket: Arc<UdpSocket>,
    addr: SocketAddr,
}

impl Notifier {
    pub async fn new(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        Ok(Self {
            socket: Arc::new(socket),
            addr,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Send a one-way `path:data` datagram. Best effort.
    pub async fn notify(&self, path: &str, data: &str) {
        let payload = format!("{path}:{data}");
        if let Err(e) = self.socket.send_to(payload.as_bytes(), self.addr).await {
            warn!("notify {} failed: {}", path, e);
        } else {
            debug!("notify {}", payload);
        }
    }

    /// Highlight row `selection` in the selector list (display is 1-based).
    pub async fn update_selection(&self, selection: usize) {
        self.notify("selector/selection", &(selection + 1).to_string())
            .await;
    }

    /// Push the full selector list over TCP.
    pub async fn update_selector(
        &self,
        entries: &[SelectorEntry],
        messages: &[String],
    ) -> io::Result<()> {
        let mut stream = TcpStream::connect(self.addr).await?;

        // Greeting, channel name, ack, then one JSON line.
        let mut buf = [0u8; 1000];
        let _ = stream.read(&mut buf).await?;
        stream.write_all(b"selector\n").await?;
        let _ = stream.read(&mut buf).await?;

        let update = SelectorUpdate { entries, messages };
        let mut payload = serde_json::to_vec(&update)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        payload.push(b'\n');
        stream.write_all(&payload).await?;
        stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_update_serializes_as_display_expects() {
        let entries = vec![SelectorEntry {
            title: "Nachrichten".to_string(),
            picon: "tvnews".to_string(),
            subtitle: String::new(),
        }];
        let update = SelectorUpdate {
            entries: &entries,
            messages: &[],
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(
            json,
            r#"{"entries":[{"title":"Nachrichten","picon":"tvnews","subtitle":""}],"messages":[]}"#
        );
    }
}
