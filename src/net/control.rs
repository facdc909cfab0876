//! # Control Sockets
//!
//! Both daemons accept single-word commands on a UNIX stream socket: one
//! short connection per command, read, act, close. The radio daemon is also
//! a client of its own protocol: the streamer sends it `stop` before taking
//! over the audio device.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};

/// Bind a control socket, replacing a stale one from a previous run.
/// The socket is world-writable so button agents under other users can send.
pub fn bind(path: &Path) -> io::Result<UnixListener> {
    match fs::remove_file(path) {
        Ok(()) => debug!("removed stale control socket {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    let listener = UnixListener::bind(path)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o666))?;
    Ok(listener)
}

/// Accept one connection and read its command word.
pub async fn recv_command(listener: &UnixListener) -> io::Result<String> {
    let (mut conn, _addr) = listener.accept().await?;
    let mut buf = [0u8; 64];
    let n = conn.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..n]).trim().to_string())
}

/// Send one command word to a control socket.
pub async fn send(path: &Path, command: &str) -> io::Result<()> {
    let mut stream = UnixStream::connect(path).await?;
    stream.write_all(command.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
