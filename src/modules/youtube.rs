//! # YouTube
//!
//! A submission page instead of a list: the module runs a small HTTP server
//! on the LAN, anyone can paste a media URL (and optional start time) into
//! the form, and the submission claims the screen via a registry event. URL
//! extraction from YouTube pages is the submitter's problem; whatever arrives
//! is handed to the player as-is.

use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::{Mutex, mpsc};

use crate::core::event::RegistryEvent;
use crate::core::module::{Module, ModuleInfo};
use crate::net;
use crate::player::streamer::Streamer;

const PICON_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/b/b8/YouTube_Logo_2017.svg/320px-YouTube_Logo_2017.svg.png";

const SUBMIT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <title>Infoscreen YouTube</title>
  </head>
  <body style="background-color: #000; color: #eee; font-family: sans-serif; text-align: center;">
    <h1>Play on the infoscreen</h1>
    <form action="/data" method="post">
      <p><input type="text" name="media_url" placeholder="Media URL" size="60"></p>
      <p><input type="text" name="start_time" placeholder="Start time (seconds)" size="20"></p>
      <p><button type="submit" style="font-size: 2em;">&#9654; Play</button></p>
    </form>
  </body>
</html>"#;

pub struct YouTube {
    port: u16,
    streamer: Arc<Mutex<Streamer>>,
    server: Option<thread::JoinHandle<()>>,
}

impl YouTube {
    pub const ID: &'static str = "youtube";

    /// Create the module and start its submission server. Submissions are
    /// forwarded to the dispatcher over `events`.
    pub fn new(
        port: u16,
        streamer: Arc<Mutex<Streamer>>,
        events: mpsc::Sender<RegistryEvent>,
    ) -> Self {
        let server = match tiny_http::Server::http(("0.0.0.0", port)) {
            Ok(server) => {
                info!("youtube: submission server on port {}", port);
                Some(thread::spawn(move || serve(server, events)))
            }
            Err(e) => {
                warn!("youtube: submission server failed to start: {}", e);
                None
            }
        };
        Self {
            port,
            streamer,
            server,
        }
    }

    pub fn server_running(&self) -> bool {
        self.server.as_ref().is_some_and(|h| !h.is_finished())
    }
}

#[async_trait]
impl Module for YouTube {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            subtitle: format!("http://{}:{}", net::primary_ip(), self.port),
            picon_url: Some(PICON_URL.to_string()),
            ..ModuleInfo::new(Self::ID, "YouTube")
        }
    }

    async fn on_visible(&mut self) {
        debug!("youtube: on_visible");
    }

    async fn on_exit(&mut self) {
        debug!("youtube: on_exit");
        self.streamer.lock().await.stop().await;
    }

    async fn on_terminate(&mut self) {
        debug!("youtube: terminate");
        self.streamer.lock().await.stop().await;
    }
}

/// Blocking accept loop on its own thread; tiny_http is synchronous and the
/// traffic is one request a week.
fn serve(server: tiny_http::Server, events: mpsc::Sender<RegistryEvent>) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        if method == tiny_http::Method::Get && url == "/" {
            let mut response = tiny_http::Response::from_string(SUBMIT_PAGE);
            if let Ok(header) =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..])
            {
                response = response.with_header(header);
            }
            respond(request, response);
        } else if method == tiny_http::Method::Post && url == "/data" {
            let body = match std::io::read_to_string(request.as_reader()) {
                Ok(body) => body,
                Err(_) => {
                    respond(
                        request,
                        tiny_http::Response::from_string("failed").with_status_code(400),
                    );
                    continue;
                }
            };
            match parse_submission(&body) {
                Some((url, start_time)) => {
                    info!("youtube: submitted {}", url);
                    if events
                        .blocking_send(RegistryEvent::PlaySubmitted { url, start_time })
                        .is_err()
                    {
                        // Dispatcher is gone; daemon is shutting down.
                        return;
                    }
                    respond(request, tiny_http::Response::from_string("success"));
                }
                None => respond(
                    request,
                    tiny_http::Response::from_string("failed").with_status_code(400),
                ),
            }
        } else {
            respond(
                request,
                tiny_http::Response::from_string("not found").with_status_code(404),
            );
        }
    }
}

fn respond<R: std::io::Read>(request: tiny_http::Request, response: tiny_http::Response<R>) {
    if let Err(e) = request.respond(response) {
        warn!("youtube: response failed: {}", e);
    }
}

/// Parse the urlencoded form body into `(url, start_time)`.
fn parse_submission(body: &str) -> Option<(String, Option<u32>)> {
    let mut url = None;
    let mut start_time = None;

    for pair in body.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        // '+' means space in form encoding; translate it before
        // percent-decoding so an encoded '+' (%2B) survives.
        let value = value.replace('+', " ");
        let Ok(value) = urlencoding::decode(&value) else {
            continue;
        };
        match key {
            "media_url" | "youtube_url" => {
                if value.trim().is_empty() {
                    return None;
                }
                url = Some(value.trim().to_string());
            }
            "start_time" => {
                // Empty or garbage start times degrade to "from the top".
                start_time = value.trim().parse::<u32>().ok();
            }
            _ => {}
        }
    }

    url.map(|u| (u, start_time))
}
