//! # ICY Metadata
//!
//! mpg123 echoes shoutcast metadata lines like
//! `ICY-META: StreamTitle='Artist - Title';` on stderr. Stations disagree on
//! how artist and title are joined, so each station configures a separator
//! plus optional prefix rules instead of a fixed pattern.

use crate::core::config::StationEntry;

pub const DEFAULT_SEPARATOR: &str = " - ";

/// How a station's `StreamTitle` payload splits into artist and title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFormat {
    pub separator: String,
    pub strip_prefix: Option<String>,
    pub reject_prefix: Option<String>,
}

impl Default for TitleFormat {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            strip_prefix: None,
            reject_prefix: None,
        }
    }
}

impl From<&StationEntry> for TitleFormat {
    fn from(station: &StationEntry) -> Self {
        Self {
            separator: station
                .title_separator
                .clone()
                .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
            strip_prefix: station.strip_prefix.clone(),
            reject_prefix: station.reject_prefix.clone(),
        }
    }
}

/// Extract `(artist, title)` from a stderr line carrying `StreamTitle='...';`.
///
/// Returns `None` for non-metadata lines, rejected payloads (station
/// jingles, hotline spots) and payloads without the separator.
pub fn parse_stream_title(line: &str, format: &TitleFormat) -> Option<(String, String)> {
    let start = line.find("StreamTitle='")? + "StreamTitle='".len();
    let rest = &line[start..];
    let end = rest.find("';")?;
    let mut payload = &rest[..end];

    if let Some(reject) = &format.reject_prefix
        && payload.starts_with(reject.as_str())
    {
        return None;
    }
    if let Some(prefix) = &format.strip_prefix {
        payload = payload.strip_prefix(prefix.as_str()).unwrap_or(payload);
    }

    // Artists may contain the separator themselves; the title is whatever
    // follows the last occurrence.
    let (artist, title) = payload.rsplit_once(&format.separator)?;
    let artist = artist.trim();
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some((artist.to_string(), title.to_string()))
}
