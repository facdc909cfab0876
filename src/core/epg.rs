//! # EPG Persistence
//!
//! The TV news module reads its programme guide from `epg.tvnews.json` in the
//! cache dir. The file is produced by an external fetcher; each entry points
//! at a configured program by index and carries the resolved video URL.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash
//! safety. A missing file is an empty EPG, not an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const EPG_FILENAME: &str = "epg.tvnews.json";

/// One available programme recording.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EpgEntry {
    /// Index into the configured program list.
    pub program_id: usize,
    /// Video URL or cached filename, handed to the player as-is.
    pub video: String,
    /// Publish time, unix seconds.
    pub published: i64,
    /// Duration in minutes.
    pub duration: i64,
}

pub fn epg_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(EPG_FILENAME)
}

/// Load the EPG from the cache dir. Missing file = empty list.
pub fn load(cache_dir: &Path) -> io::Result<Vec<EpgEntry>> {
    let path = epg_path(cache_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(&path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Atomically write the EPG to the cache dir (via `.tmp` + rename).
pub fn save(cache_dir: &Path, entries: &[EpgEntry]) -> io::Result<()> {
    fs::create_dir_all(cache_dir)?;
    let path = epg_path(cache_dir);
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string(entries)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
