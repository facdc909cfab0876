//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars.
//!
//! Config lives at `~/.infoscreen/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options. The
//! built-in station/channel/program lists apply whenever the file does not
//! override them.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all scalar fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InfoscreenConfig {
    #[serde(default)]
    pub infoscreen: NotifySection,
    #[serde(default)]
    pub radio: RadioSection,
    #[serde(default)]
    pub selector: SelectorSection,
    #[serde(default)]
    pub player: PlayerSection,
    #[serde(default)]
    pub youtube: YoutubeSection,
    #[serde(default)]
    pub stations: Vec<StationEntry>,
    #[serde(default)]
    pub channels: Vec<ChannelEntry>,
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NotifySection {
    /// host:port the infoscreen display listens on (UDP and TCP).
    pub notify_addr: Option<String>,
    pub cache_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RadioSection {
    pub ctrl_socket: Option<String>,
    /// Player command; the stream URL is appended as the last argument.
    pub player: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SelectorSection {
    pub ctrl_socket: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlayerSection {
    /// Video player command; the media URL is appended as the last argument.
    pub command: Option<Vec<String>>,
    pub audio_device: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct YoutubeSection {
    pub port: Option<u16>,
}

/// A radio station: stream URL plus how to split its ICY `StreamTitle`
/// metadata into artist and title.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationEntry {
    pub name: String,
    pub short: String,
    pub stream: String,
    pub image: String,
    /// Separator between artist and title (default " - ").
    pub title_separator: Option<String>,
    /// Prefix stripped from the payload before splitting.
    pub strip_prefix: Option<String>,
    /// Payloads starting with this prefix are dropped entirely.
    pub reject_prefix: Option<String>,
}

/// A live TV channel.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelEntry {
    pub name: String,
    pub short: String,
    pub stream: String,
    pub picon: String,
}

/// A TV news program referenced from the EPG file by index.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgramEntry {
    pub name: String,
    pub short: String,
    pub picon: String,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NOTIFY_ADDR: &str = "127.0.0.1:4444";
pub const DEFAULT_RADIO_SOCKET: &str = "/tmp/radio.ctrl";
pub const DEFAULT_SELECTOR_SOCKET: &str = "/tmp/selector.ctrl";
pub const DEFAULT_YOUTUBE_PORT: u16 = 4999;
pub const DEFAULT_AUDIO_DEVICE: &str = "hw:CARD=Headphones";

fn default_radio_player() -> Vec<String> {
    vec!["mpg123".to_string()]
}

fn default_video_player(audio_device: &str) -> Vec<String> {
    vec![
        "cvlc".to_string(),
        "--play-and-exit".to_string(),
        "--no-video-title".to_string(),
        "--aout=alsa".to_string(),
        "--alsa-audio-device".to_string(),
        audio_device.to_string(),
    ]
}

pub fn default_stations() -> Vec<StationEntry> {
    let plain = |name: &str, short: &str, stream: &str, image: &str| StationEntry {
        name: name.to_string(),
        short: short.to_string(),
        stream: stream.to_string(),
        image: image.to_string(),
        title_separator: None,
        strip_prefix: None,
        reject_prefix: None,
    };

    vec![
        plain(
            "95.5 Charivari",
            "charivari",
            "http://rs5.stream24.net/stream",
            "https://www.charivari.de/assets/Uploads/_resampled/ScaleHeightWyI5NSJd/logo-955-charivari-webseite.png",
        ),
        StationEntry {
            strip_prefix: Some("Gong 96.3 - ".to_string()),
            ..plain(
                "Radio Gong 96.3",
                "gong",
                "http://mp3.radiogong963.c.nmdn.net/ps-radiogong963/livestream.mp3",
                "https://upload.wikimedia.org/wikipedia/commons/b/b7/Gong_96.3_Logo.jpg",
            )
        },
        plain(
            "top100station",
            "top100station",
            "http://195.201.81.101/top100station.mp3",
            "https://top100station.de/wp-content/uploads/2018/06/cropped-logo_hd.png",
        ),
        plain(
            "95.5 Charivari - PARTY-HIT-MIX",
            "charivari_party",
            "http://rs5.stream24.net:8000/stream",
            "http://static.radio.de/images/broadcasts/d5/ce/5369/2/c175.png",
        ),
        StationEntry {
            title_separator: Some(": ".to_string()),
            reject_prefix: Some("Studio-Hotline".to_string()),
            ..plain(
                "BAYERN 3",
                "bayern3",
                "http://br-br3-live.cast.addradio.de/br/br3/live/mp3/128/stream.mp3",
                "https://upload.wikimedia.org/wikipedia/commons/thumb/d/de/Bayern3_logo_2015.svg/220px-Bayern3_logo_2015.svg.png",
            )
        },
        plain(
            "95.5 Charivari - LOUNGE",
            "charivari_lounge",
            "http://rs24.stream24.net:80/lounge",
            "http://static.radio.de/images/broadcasts/d0/53/20961/3/c175.png",
        ),
    ]
}

pub fn default_channels() -> Vec<ChannelEntry> {
    vec![
        ChannelEntry {
            name: "Das Erste HD".to_string(),
            short: "daserste".to_string(),
            stream: "https://mcdn.daserste.de/daserste/de/master.m3u8".to_string(),
            picon: "https://upload.wikimedia.org/wikipedia/commons/thumb/c/ca/Das_Erste_2014.svg/320px-Das_Erste_2014.svg.png".to_string(),
        },
        ChannelEntry {
            name: "ZDF HD".to_string(),
            short: "zdf".to_string(),
            stream: "https://zdf-hls-15.akamaized.net/hls/live/2016498/de/high/master.m3u8".to_string(),
            picon: "https://upload.wikimedia.org/wikipedia/commons/thumb/c/c1/ZDF_logo.svg/320px-ZDF_logo.svg.png".to_string(),
        },
    ]
}

pub fn default_programs() -> Vec<ProgramEntry> {
    let program = |name: &str, short: &str, picon: &str| ProgramEntry {
        name: name.to_string(),
        short: short.to_string(),
        picon: picon.to_string(),
    };

    vec![
        program(
            "Tagesschau in 100 Sekunden",
            "tagesschau100",
            "https://img.ardmediathek.de/standard/00/52/14/95/00/-1774185891/16x9/704?mandant=ard",
        ),
        program(
            "Tagesthemen",
            "tagesthemen",
            "https://img.ardmediathek.de/standard/00/00/00/39/22/67648717/16x9/704?mandant=ard",
        ),
        program(
            "Tagesschau",
            "tagesschau",
            "https://img.ardmediathek.de/standard/00/07/64/05/74/2121327408/16x9/384?mandant=ard",
        ),
        program(
            "heute Xpress",
            "heutexpress",
            "https://www.zdf.de/assets/der-schnelle-nachrichtenueberblick-heute-xpress-100~768x432?cb=1507802000508",
        ),
        program(
            "heute journal",
            "heutejournal",
            "https://img.selocon.com/media/resources/slotPreview/previewBig498_14d7af2a83b.jpg",
        ),
    ]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub notify_addr: SocketAddr,
    pub cache_dir: PathBuf,
    pub radio_socket: PathBuf,
    pub radio_player: Vec<String>,
    pub selector_socket: PathBuf,
    pub video_player: Vec<String>,
    pub youtube_port: u16,
    pub stations: Vec<StationEntry>,
    pub channels: Vec<ChannelEntry>,
    pub programs: Vec<ProgramEntry>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    BadAddr(std::net::AddrParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::BadAddr(e) => write!(f, "config bad notify address: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.infoscreen/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".infoscreen").join("config.toml"))
}

/// Returns the default cache dir, `~/.infoscreen/cache`.
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".infoscreen").join("cache"))
        .unwrap_or_else(|| PathBuf::from("/tmp/infoscreen-cache"))
}

/// Load config from `~/.infoscreen/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `InfoscreenConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<InfoscreenConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(InfoscreenConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(InfoscreenConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: InfoscreenConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Infoscreen Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars.

# [infoscreen]
# notify_addr = "127.0.0.1:4444"     # display process (UDP + TCP)
# cache_dir = "/home/pi/.infoscreen/cache"

# [radio]
# ctrl_socket = "/tmp/radio.ctrl"
# player = ["mpg123"]                # stream URL appended as last argument

# [selector]
# ctrl_socket = "/tmp/selector.ctrl"

# [player]
# command = ["cvlc", "--play-and-exit", "--no-video-title"]
# audio_device = "hw:CARD=Headphones"

# [youtube]
# port = 4999

# Overriding [[stations]], [[channels]] or [[programs]] replaces the
# built-in list entirely.

# [[stations]]
# name = "95.5 Charivari"
# short = "charivari"
# stream = "http://rs5.stream24.net/stream"
# image = "https://example.org/charivari.png"
# title_separator = " - "

# [[channels]]
# name = "Das Erste HD"
# short = "daserste"
# stream = "https://mcdn.daserste.de/daserste/de/master.m3u8"
# picon = "https://example.org/daserste.png"

# [[programs]]
# name = "Tagesschau"
# short = "tagesschau"
# picon = "https://example.org/tagesschau.png"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars.
pub fn resolve(config: &InfoscreenConfig) -> Result<ResolvedConfig, ConfigError> {
    // Notify address: env → config → default
    let notify_addr = std::env::var("INFOSCREEN_NOTIFY_ADDR")
        .ok()
        .or_else(|| config.infoscreen.notify_addr.clone())
        .unwrap_or_else(|| DEFAULT_NOTIFY_ADDR.to_string())
        .parse::<SocketAddr>()
        .map_err(ConfigError::BadAddr)?;

    let cache_dir = config
        .infoscreen
        .cache_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(default_cache_dir);

    // Control sockets: env → config → default
    let radio_socket = std::env::var("RADIO_CTRL_SOCKET")
        .ok()
        .or_else(|| config.radio.ctrl_socket.clone())
        .unwrap_or_else(|| DEFAULT_RADIO_SOCKET.to_string());
    let selector_socket = std::env::var("SELECTOR_CTRL_SOCKET")
        .ok()
        .or_else(|| config.selector.ctrl_socket.clone())
        .unwrap_or_else(|| DEFAULT_SELECTOR_SOCKET.to_string());

    let audio_device = config
        .player
        .audio_device
        .clone()
        .unwrap_or_else(|| DEFAULT_AUDIO_DEVICE.to_string());

    let video_player = config
        .player
        .command
        .clone()
        .unwrap_or_else(|| default_video_player(&audio_device));

    let radio_player = config
        .radio
        .player
        .clone()
        .unwrap_or_else(default_radio_player);

    let stations = if config.stations.is_empty() {
        default_stations()
    } else {
        config.stations.clone()
    };
    let channels = if config.channels.is_empty() {
        default_channels()
    } else {
        config.channels.clone()
    };
    let programs = if config.programs.is_empty() {
        default_programs()
    } else {
        config.programs.clone()
    };

    Ok(ResolvedConfig {
        notify_addr,
        cache_dir,
        radio_socket: PathBuf::from(radio_socket),
        radio_player,
        selector_socket: PathBuf::from(selector_socket),
        video_player,
        youtube_port: config.youtube.port.unwrap_or(DEFAULT_YOUTUBE_PORT),
        stations,
        channels,
        programs,
    })
}
