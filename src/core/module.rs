//! # Module Contract
//!
//! Every menu entry on the infoscreen (radio, TV news, live TV, YouTube) is a
//! `Module`. The selector daemon owns one instance of each, registered once at
//! startup, and forwards navigation events to whichever module is active.
//!
//! ```text
//! Registry
//! ├── modules: Vec<Box<dyn Module>>   // registration order = menu order
//! └── active: Option<usize>           // None = selector menu in control
//! ```

use std::fmt;
use std::io;

use async_trait::async_trait;

/// Static metadata for a registered module, shown in the selector menu.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    /// Picon cache key (filename stem under the cache dir).
    pub picon: String,
    /// Where to fetch the picon from, if it is not pre-seeded.
    pub picon_url: Option<String>,
}

impl ModuleInfo {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: String::new(),
            picon: id.to_string(),
            picon_url: None,
        }
    }
}

/// Lightweight id + title listing of a module's current entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    pub id: String,
    pub title: String,
}

/// Errors a module can hit while refreshing its data.
#[derive(Debug)]
pub enum ModuleError {
    Io(io::Error),
    Http(reqwest::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::Io(e) => write!(f, "module I/O error: {e}"),
            ModuleError::Http(e) => write!(f, "module HTTP error: {e}"),
            ModuleError::Parse(e) => write!(f, "module parse error: {e}"),
        }
    }
}

impl std::error::Error for ModuleError {}

impl From<io::Error> for ModuleError {
    fn from(e: io::Error) -> Self {
        ModuleError::Io(e)
    }
}

impl From<reqwest::Error> for ModuleError {
    fn from(e: reqwest::Error) -> Self {
        ModuleError::Http(e)
    }
}

/// Uniform lifecycle contract for infoscreen modules.
///
/// `refresh` runs once at startup (and again on SIGUSR2) before the selector
/// menu is shown; the other hooks fire only while the module is active.
/// Optional hooks default to no-ops so simple modules stay small.
#[async_trait]
pub trait Module: Send {
    fn info(&self) -> ModuleInfo;

    /// Prefetch picons / reload data. Counted towards registry readiness
    /// whether it succeeds or fails.
    async fn refresh(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// The module was selected and now owns the screen.
    async fn on_visible(&mut self);

    /// Current entries as an id + title listing.
    fn entries(&self) -> Vec<EntryRef> {
        Vec::new()
    }

    async fn on_up(&mut self) {}

    async fn on_down(&mut self) {}

    async fn on_select(&mut self, _selection: Option<usize>) {}

    /// The user backed out; stop playback and release the screen.
    async fn on_exit(&mut self);

    /// Daemon shutdown. Best effort cleanup.
    async fn on_terminate(&mut self) {}
}
