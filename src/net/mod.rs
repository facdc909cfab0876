//! Socket plumbing: infoscreen notifications and daemon control sockets.

pub mod control;
pub mod notify;

pub use notify::{Notifier, SelectorEntry};

/// Best-effort primary LAN address, used only for display strings (the
/// YouTube submission URL). Falls back to localhost.
pub fn primary_ip() -> String {
    // Connecting a UDP socket never sends a packet; it just makes the OS
    // pick the outbound interface.
    std::net::UdpSocket::bind("0.0.0.0:0")
        .and_then(|s| {
            s.connect("8.8.8.8:80")?;
            s.local_addr()
        })
        .map(|a| a.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}
