use std::time::Duration;

use infoscreen::core::cache;
use infoscreen::net::{Notifier, SelectorEntry, control};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, UdpSocket};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

async fn local_notifier() -> (Notifier, UdpSocket) {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = receiver.local_addr().unwrap();
    (Notifier::new(addr).await.unwrap(), receiver)
}

async fn recv_datagram(socket: &UdpSocket) -> String {
    let mut buf = [0u8; 1024];
    let n = tokio::time::timeout(Duration::from_secs(5), socket.recv(&mut buf))
        .await
        .expect("no datagram arrived")
        .unwrap();
    String::from_utf8_lossy(&buf[..n]).to_string()
}

// ============================================================================
// Picon Cache
// ============================================================================

#[tokio::test]
async fn test_picon_download_uses_content_type_extension() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/logo"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89u8, 0x50, 0x4e, 0x47]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();
    let url = format!("{}/logo", mock_server.uri());

    let filename = cache::download_picon(&client, dir.path(), "daserste", &url)
        .await
        .unwrap()
        .expect("picon should download");
    assert_eq!(filename, "daserste.png");
    assert_eq!(std::fs::read(dir.path().join(&filename)).unwrap().len(), 4);

    // Second call hits the cache, not the GET endpoint (expect(1) above).
    let again = cache::download_picon(&client, dir.path(), "daserste", &url)
        .await
        .unwrap();
    assert_eq!(again.as_deref(), Some("daserste.png"));
}

#[tokio::test]
async fn test_picon_download_failure_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();
    let url = format!("{}/gone", mock_server.uri());

    let result = cache::download_picon(&client, dir.path(), "missing", &url)
        .await
        .unwrap();
    assert_eq!(result, None);
}

// ============================================================================
// Infoscreen Notifications
// ============================================================================

#[tokio::test]
async fn test_udp_notifications_carry_path_and_data() {
    let (notifier, receiver) = local_notifier().await;

    notifier.notify("infoscreen/music/playing", "true").await;
    assert_eq!(recv_datagram(&receiver).await, "infoscreen/music/playing:true");

    notifier.update_selection(0).await;
    assert_eq!(recv_datagram(&receiver).await, "selector/selection:1");
}

#[tokio::test]
async fn test_tcp_selector_update_handshake() {
    // Stand-in for the display: greeting, channel name, ack, JSON line.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let display = tokio::spawn(async move {
        let (stream, _peer) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);
        reader.get_mut().write_all(b"hello\n").await.unwrap();

        let mut channel = String::new();
        reader.read_line(&mut channel).await.unwrap();
        assert_eq!(channel, "selector\n");
        reader.get_mut().write_all(b"ok\n").await.unwrap();

        let mut payload = String::new();
        reader.read_line(&mut payload).await.unwrap();
        payload
    });

    let notifier = Notifier::new(addr).await.unwrap();
    let entries = vec![SelectorEntry {
        title: "Live TV".to_string(),
        picon: "tvstreams".to_string(),
        subtitle: String::new(),
    }];
    notifier.update_selector(&entries, &[]).await.unwrap();

    let payload = display.await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(payload.trim()).unwrap();
    assert_eq!(parsed["entries"][0]["title"], "Live TV");
    assert_eq!(parsed["messages"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_tcp_selector_update_without_display_fails_cleanly() {
    // Nothing listens on this port; update must surface an error, not hang.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = Notifier::new(addr).await.unwrap();
    let result = notifier.update_selector(&[], &[]).await;
    assert!(result.is_err());
}

// ============================================================================
// Control Sockets
// ============================================================================

#[tokio::test]
async fn test_control_socket_one_command_per_connection() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("selector.ctrl");
    let listener = control::bind(&socket).unwrap();

    let sender = tokio::spawn({
        let socket = socket.clone();
        async move {
            for command in ["up", "down", "select", "exit"] {
                control::send(&socket, command).await.unwrap();
            }
        }
    });

    let mut received = Vec::new();
    for _ in 0..4 {
        received.push(control::recv_command(&listener).await.unwrap());
    }
    sender.await.unwrap();
    assert_eq!(received, vec!["up", "down", "select", "exit"]);
}
